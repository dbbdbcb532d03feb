//! # Resolver 模块
//!
//! 转场策略解析：决定一次导航操作是否需要自定义驱动器。
//!
//! - push：询问被 push 的页面
//! - pop：交互会话进行中时总是创建交互式驱动器，否则询问被 pop 的页面
//!
//! 返回 `None` 表示交给宿主默认过渡处理。

use tracing::debug;

use crate::config::TransitionConfig;
use crate::context::Operation;
use crate::driver::TransitionDriver;
use crate::error::TransitionError;
use crate::screen::Screen;

/// 转场策略解析器
#[derive(Debug, Clone, Default)]
pub struct TransitionResolver {
    config: TransitionConfig,
}

impl TransitionResolver {
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// 解析一次导航操作
    pub fn resolve(
        &self,
        operation: Operation,
        from: &dyn Screen,
        to: &dyn Screen,
        interactive_session_active: bool,
    ) -> Option<TransitionDriver> {
        let (declaring, kind) = match operation {
            Operation::Push => (to, to.push_kind(from)),
            Operation::Pop => {
                if interactive_session_active {
                    let driver = TransitionDriver::new(operation, true, self.config.clone());
                    debug!(
                        driver = %driver.id(),
                        from = from.name(),
                        to = to.name(),
                        "交互会话进行中，创建交互式驱动器"
                    );
                    return Some(driver);
                }
                (from, from.pop_kind(to))
            }
        };

        if kind.is_system() {
            let reason = TransitionError::UnresolvedPolicy {
                screen: declaring.name().to_string(),
            };
            debug!(operation = %operation, reason = %reason, "使用宿主默认过渡");
            return None;
        }

        let driver = TransitionDriver::new(operation, false, self.config.clone());
        debug!(
            driver = %driver.id(),
            operation = %operation,
            kind = kind.name(),
            from = from.name(),
            to = to.name(),
            "创建自定义驱动器"
        );
        Some(driver)
    }
}
