//! # Interactive 模块
//!
//! 把水平拖动手势转换为交互式 pop 的进度信号。
//!
//! ## 状态
//!
//! 会话状态是 `Option<InteractiveSession>`：同一导航栈任意时刻至多一个会话，
//! 会话进行中收到的 `began` 会被忽略，不排队。

use tracing::{debug, info};

use crate::config::TransitionConfig;
use crate::driver::DriverId;

/// 手势阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// 手势事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    /// 相对起点的水平位移
    pub translation_x: f32,
    /// 触点在容器中的水平位置
    pub location_x: f32,
}

impl GestureEvent {
    pub fn new(phase: GesturePhase, translation_x: f32, location_x: f32) -> Self {
        Self {
            phase,
            translation_x,
            location_x,
        }
    }

    pub fn began(location_x: f32) -> Self {
        Self::new(GesturePhase::Began, 0.0, location_x)
    }

    pub fn changed(translation_x: f32, location_x: f32) -> Self {
        Self::new(GesturePhase::Changed, translation_x, location_x)
    }

    pub fn ended(translation_x: f32, location_x: f32) -> Self {
        Self::new(GesturePhase::Ended, translation_x, location_x)
    }

    pub fn cancelled() -> Self {
        Self::new(GesturePhase::Cancelled, 0.0, 0.0)
    }
}

/// 协调器对手势事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// 不产生任何效果
    Ignored,
    /// 已创建会话，宿主应发起 pop
    BeginPop,
    /// 把驱动器拨到指定进度
    Update(f32),
    /// 剩余部分正向播放
    Finish,
    /// 剩余部分反向播放
    Cancel,
}

/// 进行中的交互会话
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractiveSession {
    /// 会话绑定的驱动器，pop 发起前为 `None`
    pub driver: Option<DriverId>,
    /// 最近一次进度
    pub percent: f32,
}

/// 手势协调器
#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    edge_hit_width: f32,
    finish_distance: f32,
    session: Option<InteractiveSession>,
}

impl GestureCoordinator {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            edge_hit_width: config.edge_hit_width,
            finish_distance: config.finish_distance,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&InteractiveSession> {
        self.session.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.session.is_some()
    }

    /// 把会话绑定到驱动器，没有会话时返回 `None`
    pub fn bind_driver(&mut self, driver: DriverId) -> Option<&InteractiveSession> {
        let session = self.session.as_mut()?;
        session.driver = Some(driver);
        debug!(driver = %driver, "交互会话绑定驱动器");
        Some(&*session)
    }

    pub fn clear_session(&mut self) {
        if self.session.take().is_some() {
            debug!("交互会话已清除");
        }
    }

    /// 拖动进度
    ///
    /// 容器宽度不为正时进度为 0。
    pub fn progress(&self, translation_x: f32, surface_width: f32) -> f32 {
        if surface_width <= 0.0 {
            return 0.0;
        }
        translation_x.abs() / surface_width
    }

    /// 判定为完成的最小进度
    pub fn finish_threshold(&self, surface_width: f32) -> f32 {
        if surface_width <= 0.0 {
            return f32::INFINITY;
        }
        self.finish_distance / surface_width
    }

    /// 处理一个手势事件
    pub fn handle(
        &mut self,
        event: &GestureEvent,
        screen_count: usize,
        surface_width: f32,
    ) -> GestureAction {
        match event.phase {
            GesturePhase::Began => {
                if self.session.is_some() {
                    debug!("已有交互会话，忽略 began");
                    return GestureAction::Ignored;
                }
                if event.location_x > self.edge_hit_width || screen_count <= 1 {
                    debug!(
                        location_x = event.location_x,
                        edge_hit_width = self.edge_hit_width,
                        screen_count = screen_count,
                        "手势不满足交互式返回条件"
                    );
                    return GestureAction::Ignored;
                }
                self.session = Some(InteractiveSession::default());
                info!(location_x = event.location_x, "交互会话开始");
                GestureAction::BeginPop
            }
            GesturePhase::Changed => {
                let percent = self
                    .progress(event.translation_x, surface_width)
                    .min(1.0);
                match self.session.as_mut() {
                    Some(session) => {
                        session.percent = percent;
                        GestureAction::Update(percent)
                    }
                    None => GestureAction::Ignored,
                }
            }
            GesturePhase::Ended => {
                if self.session.take().is_none() {
                    return GestureAction::Ignored;
                }
                let progress = self.progress(event.translation_x, surface_width);
                let threshold = self.finish_threshold(surface_width);
                let action = if progress >= threshold {
                    GestureAction::Finish
                } else {
                    GestureAction::Cancel
                };
                info!(
                    progress = progress,
                    threshold = threshold,
                    action = ?action,
                    "交互会话结束"
                );
                action
            }
            GesturePhase::Cancelled | GesturePhase::Failed => {
                if self.session.take().is_none() {
                    return GestureAction::Ignored;
                }
                info!(phase = ?event.phase, "交互会话取消");
                GestureAction::Cancel
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> GestureCoordinator {
        GestureCoordinator::new(&TransitionConfig::default())
    }

    #[test]
    fn test_began_eligibility() {
        let mut c = coordinator();

        // 离边缘太远
        assert_eq!(
            c.handle(&GestureEvent::began(90.0), 2, 1000.0),
            GestureAction::Ignored
        );
        assert!(!c.is_interactive());

        // 只有一个页面
        assert_eq!(
            c.handle(&GestureEvent::began(10.0), 1, 1000.0),
            GestureAction::Ignored
        );

        // 边界值可以触发
        assert_eq!(
            c.handle(&GestureEvent::began(80.0), 2, 1000.0),
            GestureAction::BeginPop
        );
        assert!(c.is_interactive());
    }

    #[test]
    fn test_second_began_is_ignored() {
        let mut c = coordinator();
        assert_eq!(
            c.handle(&GestureEvent::began(10.0), 3, 1000.0),
            GestureAction::BeginPop
        );
        let driver = DriverId::next();
        c.bind_driver(driver);

        assert_eq!(
            c.handle(&GestureEvent::began(5.0), 3, 1000.0),
            GestureAction::Ignored
        );
        assert_eq!(c.session().unwrap().driver, Some(driver));
    }

    #[test]
    fn test_changed_reports_progress() {
        let mut c = coordinator();
        assert_eq!(
            c.handle(&GestureEvent::changed(100.0, 150.0), 2, 1000.0),
            GestureAction::Ignored
        );

        c.handle(&GestureEvent::began(10.0), 2, 1000.0);
        assert_eq!(
            c.handle(&GestureEvent::changed(-250.0, 260.0), 2, 1000.0),
            GestureAction::Update(0.25)
        );
        assert_eq!(c.session().unwrap().percent, 0.25);

        assert_eq!(
            c.handle(&GestureEvent::changed(1500.0, 1000.0), 2, 1000.0),
            GestureAction::Update(1.0)
        );
    }

    #[test]
    fn test_ended_finish_or_cancel() {
        let mut c = coordinator();

        c.handle(&GestureEvent::began(10.0), 2, 1000.0);
        assert_eq!(
            c.handle(&GestureEvent::ended(100.0, 110.0), 2, 1000.0),
            GestureAction::Finish
        );
        assert!(!c.is_interactive());

        c.handle(&GestureEvent::began(10.0), 2, 1000.0);
        assert_eq!(
            c.handle(&GestureEvent::ended(60.0, 70.0), 2, 1000.0),
            GestureAction::Cancel
        );
        assert!(!c.is_interactive());
    }

    #[test]
    fn test_cancelled_always_cancels() {
        let mut c = coordinator();
        c.handle(&GestureEvent::began(10.0), 2, 1000.0);
        c.handle(&GestureEvent::changed(900.0, 910.0), 2, 1000.0);

        assert_eq!(
            c.handle(&GestureEvent::cancelled(), 2, 1000.0),
            GestureAction::Cancel
        );
        assert!(!c.is_interactive());

        // 没有会话时 cancelled 无效果
        assert_eq!(
            c.handle(&GestureEvent::cancelled(), 2, 1000.0),
            GestureAction::Ignored
        );
    }

    #[test]
    fn test_zero_width_surface() {
        let c = coordinator();
        assert_eq!(c.progress(100.0, 0.0), 0.0);
        assert!(c.progress(100.0, 0.0) < c.finish_threshold(0.0));
    }
}
