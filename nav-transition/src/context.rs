//! # Context 模块
//!
//! 转场上下文：宿主交给驱动器的“一次转场”的全部外部状态。
//!
//! - 两个页面（from / to）
//! - 合成两者视觉的容器
//! - 取消标记与完成回调
//!
//! `complete_transition` 每次转场必须且只能调用一次，之后控制权回到宿主。

use std::rc::Rc;

use tracing::warn;

use crate::geometry::{Rect, Size};
use crate::screen::{Screen, ScreenId};

/// 导航操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Push,
    Pop,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Push => write!(f, "push"),
            Operation::Pop => write!(f, "pop"),
        }
    }
}

/// 容器表面
///
/// 按 z 序记录当前参与合成的页面，末尾在最上层。
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSurface {
    size: Size,
    layers: Vec<ScreenId>,
}

impl ContainerSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// 加入图层，已存在时移到最上层
    pub fn add_layer(&mut self, id: ScreenId) {
        self.layers.retain(|layer| *layer != id);
        self.layers.push(id);
    }

    pub fn remove_layer(&mut self, id: ScreenId) {
        self.layers.retain(|layer| *layer != id);
    }

    pub fn layers(&self) -> &[ScreenId] {
        &self.layers
    }

    pub fn topmost(&self) -> Option<ScreenId> {
        self.layers.last().copied()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.layers.contains(&id)
    }
}

/// 转场上下文接口
pub trait TransitionContext {
    fn from_screen(&self) -> Option<Rc<dyn Screen>>;

    fn to_screen(&self) -> Option<Rc<dyn Screen>>;

    fn container(&mut self) -> &mut ContainerSurface;

    /// 页面在转场结束时的布局矩形
    fn final_frame(&self, screen: &dyn Screen) -> Rect;

    fn was_cancelled(&self) -> bool;

    /// 交互式转场被取消时由宿主调用，之后 `was_cancelled` 返回 `true`
    fn cancel_interactive_transition(&mut self);

    /// 交还控制权
    fn complete_transition(&mut self, finished: bool);
}

/// 导航栈提供的转场上下文
pub struct StackTransitionContext {
    from: Option<Rc<dyn Screen>>,
    to: Option<Rc<dyn Screen>>,
    container: ContainerSurface,
    cancelled: bool,
    completion: Option<bool>,
    completion_count: u32,
}

impl StackTransitionContext {
    pub fn new(
        from: Option<Rc<dyn Screen>>,
        to: Option<Rc<dyn Screen>>,
        surface_size: Size,
    ) -> Self {
        Self {
            from,
            to,
            container: ContainerSurface::new(surface_size),
            cancelled: false,
            completion: None,
            completion_count: 0,
        }
    }

    /// 完成结果，未完成时为 `None`
    pub fn completion(&self) -> Option<bool> {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    /// `complete_transition` 被调用的次数
    pub fn completion_count(&self) -> u32 {
        self.completion_count
    }

    pub fn surface(&self) -> &ContainerSurface {
        &self.container
    }
}

impl std::fmt::Debug for StackTransitionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackTransitionContext")
            .field("from", &self.from.as_ref().map(|s| s.name().to_string()))
            .field("to", &self.to.as_ref().map(|s| s.name().to_string()))
            .field("container", &self.container)
            .field("cancelled", &self.cancelled)
            .field("completion", &self.completion)
            .finish()
    }
}

impl TransitionContext for StackTransitionContext {
    fn from_screen(&self) -> Option<Rc<dyn Screen>> {
        self.from.clone()
    }

    fn to_screen(&self) -> Option<Rc<dyn Screen>> {
        self.to.clone()
    }

    fn container(&mut self) -> &mut ContainerSurface {
        &mut self.container
    }

    fn final_frame(&self, _screen: &dyn Screen) -> Rect {
        Rect::from_size(self.container.size())
    }

    fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn cancel_interactive_transition(&mut self) {
        self.cancelled = true;
    }

    fn complete_transition(&mut self, finished: bool) {
        self.completion_count += 1;
        if self.completion.is_some() {
            warn!(finished = finished, "转场上下文被重复完成");
            return;
        }
        self.completion = Some(finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_layers() {
        let mut container = ContainerSurface::new(Size::new(400.0, 800.0));
        let a = ScreenId::next();
        let b = ScreenId::next();

        container.add_layer(a);
        container.add_layer(b);
        assert_eq!(container.layers(), &[a, b]);

        // 重复加入会移到最上层
        container.add_layer(a);
        assert_eq!(container.layers(), &[b, a]);
        assert_eq!(container.topmost(), Some(a));

        container.remove_layer(a);
        assert!(!container.contains(a));
    }

    #[test]
    fn test_context_completion_recorded_once() {
        let mut ctx = StackTransitionContext::new(None, None, Size::new(400.0, 800.0));
        assert!(!ctx.is_complete());

        ctx.cancel_interactive_transition();
        assert!(ctx.was_cancelled());

        ctx.complete_transition(false);
        ctx.complete_transition(true);
        assert_eq!(ctx.completion(), Some(false));
        assert_eq!(ctx.completion_count(), 2);
    }
}
