//! # Error 模块
//!
//! 定义转场引擎中使用的错误类型。

use thiserror::Error;

use crate::animation::ObjectId;
use crate::context::Operation;
use crate::driver::DriverId;

/// 动画系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// 对象未注册
    #[error("对象 {object} 未注册")]
    NotRegistered { object: ObjectId },

    /// 对象类型不匹配
    #[error("对象 {object} 类型不匹配")]
    TypeMismatch { object: ObjectId },

    /// 属性不存在
    #[error("对象 {object} 上不存在属性 '{property}'")]
    UnknownProperty {
        object: ObjectId,
        property: &'static str,
    },
}

/// 转场上下文中缺失的页面角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenRole {
    /// 离开的页面
    From,
    /// 进入的页面
    To,
}

impl std::fmt::Display for ScreenRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenRole::From => write!(f, "from"),
            ScreenRole::To => write!(f, "to"),
        }
    }
}

/// 转场错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// 驱动器状态不允许此操作（重复 execute 或重复完成）
    #[error("驱动器 {driver} 状态无效：{operation} 转场当前{state}")]
    InvalidState {
        driver: DriverId,
        operation: Operation,
        state: &'static str,
    },

    /// 上下文缺少必需的页面
    #[error("转场上下文缺少 {role} 页面")]
    MissingContext { role: ScreenRole },

    /// 页面未声明可用的转场策略
    #[error("页面 '{screen}' 未声明转场策略，使用宿主默认过渡")]
    UnresolvedPolicy { screen: String },

    /// 已有转场占用容器
    #[error("已有转场正在进行")]
    TransitionInProgress,

    /// 动画系统错误
    #[error("动画错误: {0}")]
    Animation(#[from] AnimationError),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读取失败
    #[error("读取配置文件 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 验证失败
    #[error("配置项 {field} 无效: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
