//! # Animation 模块
//!
//! 单个属性动画实例。
//!
//! 除了按时间推进，还支持交互式转场需要的三种操作：
//! - `seek`: 暂停状态下把进度拨到指定比例
//! - `resume`: 从当前进度继续正向播放
//! - `reverse`: 从当前进度反向播放回起点

use super::EasingFunction;

/// 动画句柄，在所属 `AnimationSystem` 内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Playing,
    /// 时间不推进，进度只能通过 `seek` 改变
    Paused,
    Completed,
}

impl AnimationState {
    /// 播放中或暂停中
    pub fn is_active(&self) -> bool {
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        *self == Self::Completed
    }
}

/// 正向走向 `to`，反向退回 `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayDirection {
    #[default]
    Forward,
    Reverse,
}

/// 单个 `f32` 属性在 `duration` 秒内从 `from` 变到 `to`
#[derive(Debug, Clone)]
pub struct Animation {
    pub id: AnimationId,
    pub from: f32,
    pub to: f32,
    /// 秒
    pub duration: f32,
    pub easing: EasingFunction,
    pub state: AnimationState,
    pub direction: PlayDirection,
    /// 已缓动的进度
    pub progress: f32,
    elapsed: f32,
}

impl Animation {
    /// 非正时长的动画一创建就已完成，值停在 `to`
    pub fn new(id: AnimationId, from: f32, to: f32, duration: f32) -> Self {
        let finished = duration <= 0.0;
        Self {
            id,
            from,
            to,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            state: if finished {
                AnimationState::Completed
            } else {
                AnimationState::Playing
            },
            direction: PlayDirection::Forward,
            progress: if finished { 1.0 } else { 0.0 },
            elapsed: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 推进 `dt` 秒，返回动画是否仍未结束
    pub fn update(&mut self, dt: f32) -> bool {
        match self.state {
            AnimationState::Playing => {
                match self.direction {
                    PlayDirection::Forward => self.elapsed += dt,
                    PlayDirection::Reverse => self.elapsed -= dt,
                }
                self.apply_elapsed()
            }
            AnimationState::Paused => true,
            AnimationState::Completed => false,
        }
    }

    fn apply_elapsed(&mut self) -> bool {
        let raw = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };

        match self.direction {
            PlayDirection::Forward if raw >= 1.0 => {
                self.elapsed = self.duration;
                self.progress = 1.0;
                self.state = AnimationState::Completed;
                false
            }
            PlayDirection::Reverse if raw <= 0.0 => {
                self.elapsed = 0.0;
                self.progress = 0.0;
                self.state = AnimationState::Completed;
                false
            }
            _ => {
                self.progress = self.easing.apply(raw);
                true
            }
        }
    }

    /// 把进度拨到 `fraction`（未缓动的时间比例）
    pub fn seek(&mut self, fraction: f32) {
        if self.state.is_finished() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        self.elapsed = fraction * self.duration;
        self.progress = self.easing.apply(fraction);
    }

    pub fn pause(&mut self) {
        if self.state == AnimationState::Playing {
            self.state = AnimationState::Paused;
        }
    }

    /// 从当前进度继续正向播放
    pub fn resume(&mut self) {
        if self.state.is_active() {
            self.direction = PlayDirection::Forward;
            self.state = AnimationState::Playing;
        }
    }

    /// 从当前进度反向播放回起点
    pub fn reverse(&mut self) {
        if self.state.is_active() {
            self.direction = PlayDirection::Reverse;
            self.state = AnimationState::Playing;
        }
    }

    /// 未缓动的时间比例
    pub fn fraction(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn current_value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_animation() -> Animation {
        Animation::new(AnimationId::new(1), 0.0, 1.0, 1.0).with_easing(EasingFunction::Linear)
    }

    #[test]
    fn test_animation_update() {
        let mut anim = linear_animation();
        assert_eq!(anim.state, AnimationState::Playing);

        assert!(anim.update(0.4));
        assert!((anim.current_value() - 0.4).abs() < 1e-5);

        assert!(!anim.update(0.7));
        assert_eq!(anim.state, AnimationState::Completed);
        assert_eq!(anim.current_value(), 1.0);
    }

    #[test]
    fn test_zero_duration() {
        let anim = Animation::new(AnimationId::new(1), 0.0, 1.0, 0.0);
        assert!(anim.is_finished());
        assert_eq!(anim.current_value(), 1.0);
    }

    #[test]
    fn test_paused_seek() {
        let mut anim = linear_animation();
        anim.pause();

        // 暂停时时间不推进
        assert!(anim.update(0.5));
        assert_eq!(anim.progress, 0.0);

        anim.seek(0.3);
        assert!((anim.current_value() - 0.3).abs() < 1e-5);
        assert_eq!(anim.state, AnimationState::Paused);
    }

    #[test]
    fn test_resume_plays_remainder() {
        let mut anim = linear_animation();
        anim.pause();
        anim.seek(0.6);
        anim.resume();

        assert!(anim.update(0.2));
        assert!((anim.current_value() - 0.8).abs() < 1e-5);
        assert!(!anim.update(0.3));
        assert_eq!(anim.current_value(), 1.0);
    }

    #[test]
    fn test_reverse_returns_to_start() {
        let mut anim = linear_animation();
        anim.pause();
        anim.seek(0.5);
        anim.reverse();

        assert!(anim.update(0.2));
        assert!((anim.current_value() - 0.3).abs() < 1e-5);
        assert!(!anim.update(0.5));
        assert!(anim.is_finished());
        assert_eq!(anim.current_value(), 0.0);
    }
}
