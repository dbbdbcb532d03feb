//! # Policy 模块
//!
//! 页面声明的转场策略。
//!
//! 策略可以通过两种方式提供：
//! - 实现 [`Screen`](crate::screen::Screen) 的能力查询方法（可依据对方页面动态决定）
//! - 以数据形式声明 [`ScreenPolicies`]，交给 [`DeclaredScreen`](crate::screen::DeclaredScreen)
//!   在构造时一次性确定

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// push / pop 动画类型
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// 宿主默认过渡（不创建自定义驱动器）
    #[default]
    System,
    /// 整体缩放
    UniformScale,
    /// 圆形遮罩展开 / 收起
    RadialMask {
        /// 遮罩起点矩形，未指定时以目标页面中心为圆心
        #[serde(default)]
        origin: Option<Rect>,
    },
    /// 页面自定义
    Custom,
}

impl AnimationKind {
    pub fn is_system(&self) -> bool {
        matches!(self, AnimationKind::System)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::System => "system",
            AnimationKind::UniformScale => "uniform_scale",
            AnimationKind::RadialMask { .. } => "radial_mask",
            AnimationKind::Custom => "custom",
        }
    }
}

/// 交互式 pop 动画类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractiveAnimationKind {
    /// 水平滑动
    #[default]
    System,
    /// 整体缩放
    UniformScale,
    /// 页面自定义
    Custom,
}

impl InteractiveAnimationKind {
    pub fn name(&self) -> &'static str {
        match self {
            InteractiveAnimationKind::System => "system",
            InteractiveAnimationKind::UniformScale => "uniform_scale",
            InteractiveAnimationKind::Custom => "custom",
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// push 策略（声明在被 push 的页面上）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushPolicy {
    /// 缺省时使用配置中的 `default_duration`
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub kind: AnimationKind,
}

/// pop 策略（声明在被 pop 的页面上）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopPolicy {
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub kind: AnimationKind,
}

/// 交互式 pop 策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractivePolicy {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub kind: InteractiveAnimationKind,
}

impl Default for InteractivePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: None,
            kind: InteractiveAnimationKind::System,
        }
    }
}

/// 单个页面的全部策略声明
///
/// 每一项都是可选的，缺省即宿主默认行为。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPolicies {
    #[serde(default)]
    pub push: Option<PushPolicy>,
    #[serde(default)]
    pub pop: Option<PopPolicy>,
    #[serde(default)]
    pub interactive: Option<InteractivePolicy>,
}

impl ScreenPolicies {
    pub fn with_push(mut self, kind: AnimationKind, duration: f32) -> Self {
        self.push = Some(PushPolicy {
            duration: Some(duration),
            kind,
        });
        self
    }

    pub fn with_pop(mut self, kind: AnimationKind, duration: f32) -> Self {
        self.pop = Some(PopPolicy {
            duration: Some(duration),
            kind,
        });
        self
    }

    pub fn with_interactive(mut self, kind: InteractiveAnimationKind, duration: f32) -> Self {
        self.interactive = Some(InteractivePolicy {
            enabled: true,
            duration: Some(duration),
            kind,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies_from_json() {
        let json = r#"{
            "push": { "kind": { "radial_mask": { "origin": null } } },
            "pop": { "duration": 0.35, "kind": "uniform_scale" },
            "interactive": { "kind": "custom" }
        }"#;
        let policies: ScreenPolicies = serde_json::from_str(json).unwrap();

        let push = policies.push.unwrap();
        assert_eq!(push.kind, AnimationKind::RadialMask { origin: None });
        assert_eq!(push.duration, None);

        let pop = policies.pop.unwrap();
        assert_eq!(pop.kind, AnimationKind::UniformScale);
        assert_eq!(pop.duration, Some(0.35));

        let interactive = policies.interactive.unwrap();
        assert!(interactive.enabled);
        assert_eq!(interactive.kind, InteractiveAnimationKind::Custom);
    }

    #[test]
    fn test_empty_policies() {
        let policies: ScreenPolicies = serde_json::from_str("{}").unwrap();
        assert_eq!(policies, ScreenPolicies::default());
    }

    #[test]
    fn test_mask_origin_rect() {
        let json = r#"{ "radial_mask": { "origin": { "origin": { "x": 13.0, "y": 144.0 }, "size": { "width": 134.0, "height": 192.0 } } } }"#;
        let kind: AnimationKind = serde_json::from_str(json).unwrap();
        assert_eq!(
            kind,
            AnimationKind::RadialMask {
                origin: Some(Rect::new(13.0, 144.0, 134.0, 192.0))
            }
        );
        assert_eq!(kind.name(), "radial_mask");
    }
}
