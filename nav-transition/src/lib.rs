//! # Nav Transition
//!
//! 导航栈自定义转场的编排引擎。
//!
//! ## 架构概述
//!
//! `nav-transition` 不依赖任何渲染引擎。宿主把一次导航操作交给驱动器，
//! 驱动器通过转场上下文驱动页面视觉状态，结束时调用 `complete_transition`
//! 交还控制权：
//!
//! ```text
//! Host (NavigationController)         Core
//!   │                                   │
//!   │── push / pop ───────────────────►│ TransitionResolver::resolve()
//!   │◄── Option<TransitionDriver> ─────│
//!   │── execute(ctx) ─────────────────►│ 分派到执行器
//!   │── update(dt) ───────────────────►│ 动画推进 / 收尾
//!   │◄── ctx.complete_transition() ────│
//!   │                                   │
//! ```
//!
//! 交互式 pop 由 [`GestureCoordinator`] 把拖动手势转换为进度，
//! 驱动器暂停动画并按进度拨动，结束时继续播放或反向播放。
//!
//! ## 核心类型
//!
//! - [`Screen`]：页面与其转场能力查询
//! - [`TransitionContext`]：单次转场的外部状态
//! - [`TransitionDriver`]：单次转场的状态机
//! - [`TransitionResolver`]：决定是否创建自定义驱动器
//! - [`NavigationController`]：持有页面栈的参考宿主
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut nav = NavigationController::new(TransitionConfig::default(), Size::new(400.0, 800.0));
//! nav.push_screen(root)?;
//! nav.push_screen(detail)?;
//!
//! // 主循环
//! loop {
//!     if let Some(event) = poll_gesture() {
//!         nav.handle_gesture(event)?;
//!     }
//!     nav.update(dt)?;
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`geometry`]：几何类型与遮罩半径计算
//! - [`animation`]：属性动画引擎
//! - [`policy`]：页面转场策略声明
//! - [`screen`]：页面抽象与页面视觉状态
//! - [`context`]：转场上下文
//! - [`executor`]：滑动 / 缩放 / 遮罩执行器
//! - [`driver`]：转场驱动器
//! - [`resolver`]：策略解析
//! - [`interactive`]：手势协调
//! - [`navigation`]：导航栈宿主
//! - [`config`]：转场配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod executor;
pub mod geometry;
pub mod interactive;
pub mod navigation;
pub mod policy;
pub mod resolver;
pub mod screen;

// 重导出核心类型
pub use animation::{
    AnimPropertyKey, Animatable, Animation, AnimationEvent, AnimationId, AnimationState,
    AnimationSystem, EasingFunction, ObjectId, PlayDirection,
};
pub use config::{DEFAULT_TRANSITION_DURATION, TransitionConfig};
pub use context::{ContainerSurface, Operation, StackTransitionContext, TransitionContext};
pub use driver::{DriverId, DriverState, TransitionDriver};
pub use error::{AnimationError, ConfigError, ScreenRole, TransitionError, TransitionResult};
pub use executor::{Continuation, MaskExecutor, ScaleExecutor, SlideExecutor, TransitionExecutor};
pub use geometry::{MaskRadii, Point, Quadrant, Rect, Size, mask_radii};
pub use interactive::{
    GestureAction, GestureCoordinator, GestureEvent, GesturePhase, InteractiveSession,
};
pub use navigation::NavigationController;
pub use policy::{
    AnimationKind, InteractiveAnimationKind, InteractivePolicy, PopPolicy, PushPolicy,
    ScreenPolicies,
};
pub use resolver::TransitionResolver;
pub use screen::{CircleMask, DeclaredScreen, Screen, ScreenId, ScreenVisual, VisualData};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _config = TransitionConfig::default();
        let _kind = AnimationKind::RadialMask { origin: None };
        let _event = GestureEvent::began(10.0);
        let _nav = NavigationController::new(TransitionConfig::default(), Size::new(1.0, 1.0));
    }
}
