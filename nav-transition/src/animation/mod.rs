//! # Animation 模块
//!
//! 转场使用的动画引擎。
//!
//! 引擎只管时间轴：某个对象的某个属性要在多长时间内从哪里变到哪里。
//! 对象通过 `Animatable` 按名称读写属性，引擎不关心它是页面视觉还是封面。
//!
//! 执行器注册动画后立即返回，驱动器在引擎报告全部结束后才收尾，
//! 完成时机始终跟随动画本身，而不是独立的定时器。

mod animation;
mod easing;
mod system;
mod traits;

pub use animation::{Animation, AnimationId, AnimationState, PlayDirection};
pub use easing::EasingFunction;
pub use system::AnimationSystem;
pub use traits::{AnimPropertyKey, Animatable, ObjectId};

/// 动画事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// 动画开始
    Started(AnimationId),
    /// 动画正向播放完成
    Completed(AnimationId),
    /// 动画反向播放回起点
    Reversed(AnimationId),
}
