//! # Config 模块
//!
//! 每个导航栈一份的转场配置，构造后不再变化。
//!
//! ## 配置优先级
//!
//! 1. 配置文件（JSON）
//! 2. 默认值

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::animation::EasingFunction;
use crate::error::ConfigError;

/// 页面未声明时长时使用的默认时长（秒）
pub const DEFAULT_TRANSITION_DURATION: f32 = 0.25;

/// 转场配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 默认转场时长（秒）
    #[serde(default = "default_duration")]
    pub default_duration: f32,

    /// 交互式返回手势的左边缘判定宽度
    #[serde(default = "default_edge_hit_width")]
    pub edge_hit_width: f32,

    /// 手势结束时判定为“完成”的最小水平位移
    #[serde(default = "default_finish_distance")]
    pub finish_distance: f32,

    /// 遮罩未指定起点矩形时，默认正方形的边长
    #[serde(default = "default_mask_origin_size")]
    pub mask_origin_size: f32,

    /// 缩放转场的最小缩放比例
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,

    /// 转场动画缓动
    #[serde(default)]
    pub easing: EasingFunction,
}

fn default_duration() -> f32 {
    DEFAULT_TRANSITION_DURATION
}

fn default_edge_hit_width() -> f32 {
    80.0
}

fn default_finish_distance() -> f32 {
    80.0
}

fn default_mask_origin_size() -> f32 {
    10.0
}

fn default_min_scale() -> f32 {
    0.1
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            edge_hit_width: default_edge_hit_width(),
            finish_distance: default_finish_distance(),
            mask_origin_size: default_mask_origin_size(),
            min_scale: default_min_scale(),
            easing: EasingFunction::default(),
        }
    }
}

impl TransitionConfig {
    /// 加载配置文件
    ///
    /// 文件不存在、解析失败或校验失败时返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::try_load(path) {
            Ok(config) => {
                info!(path = ?path, "转场配置加载成功");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "转场配置加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载并校验配置文件
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析并校验
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_duration < 0.0 {
            return Err(ConfigError::Invalid {
                field: "default_duration",
                message: format!("时长不能为负: {}", self.default_duration),
            });
        }

        if self.edge_hit_width < 0.0 {
            return Err(ConfigError::Invalid {
                field: "edge_hit_width",
                message: format!("边缘宽度不能为负: {}", self.edge_hit_width),
            });
        }

        if self.finish_distance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "finish_distance",
                message: format!("完成距离不能为负: {}", self.finish_distance),
            });
        }

        if self.mask_origin_size < 0.0 {
            return Err(ConfigError::Invalid {
                field: "mask_origin_size",
                message: format!("遮罩边长不能为负: {}", self.mask_origin_size),
            });
        }

        if self.min_scale <= 0.0 || self.min_scale > 1.0 {
            return Err(ConfigError::Invalid {
                field: "min_scale",
                message: format!("缩放比例必须在 (0.0, 1.0] 之间: {}", self.min_scale),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TransitionConfig::default();
        assert_eq!(config.default_duration, 0.25);
        assert_eq!(config.edge_hit_width, 80.0);
        assert_eq!(config.finish_distance, 80.0);
        assert_eq!(config.mask_origin_size, 10.0);
        assert_eq!(config.min_scale, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TransitionConfig::from_json(r#"{ "edge_hit_width": 40.0 }"#).unwrap();
        assert_eq!(config.edge_hit_width, 40.0);
        assert_eq!(config.finish_distance, 80.0);
        assert_eq!(config.easing, EasingFunction::EaseInOut);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TransitionConfig::from_json(r#"{ "min_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "min_scale",
                ..
            }
        ));

        let err = TransitionConfig::from_json(r#"{ "default_duration": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "default_duration",
                ..
            }
        ));

        assert!(matches!(
            TransitionConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "finish_distance": 120.0, "easing": "linear" }}"#).unwrap();

        let config = TransitionConfig::load(file.path());
        assert_eq!(config.finish_distance, 120.0);
        assert_eq!(config.easing, EasingFunction::Linear);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(matches!(
            TransitionConfig::try_load(&path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(TransitionConfig::load(&path), TransitionConfig::default());
    }
}
