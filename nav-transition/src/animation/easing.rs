//! # Easing 模块
//!
//! 转场动画的时间曲线。只保留转场实际用到的三条。

use serde::{Deserialize, Serialize};

/// 时间曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 匀速，交互式拖动时进度与手指位移一一对应
    Linear,
    /// 二次缓出
    EaseOut,
    /// 三次缓入缓出
    #[default]
    EaseInOut,
}

impl EasingFunction {
    /// 把时间比例映射为进度，输入先被限制在 `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOut => t * (2.0 - t),
            EasingFunction::EaseInOut if t < 0.5 => 4.0 * t.powi(3),
            EasingFunction::EaseInOut => {
                let u = 2.0 * t - 2.0;
                0.5 * u.powi(3) + 1.0
            }
        }
    }
}
