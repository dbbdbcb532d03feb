//! # Navigation 模块
//!
//! 导航栈宿主：持有页面栈并把转场交给驱动器。
//!
//! ## 状态划分
//!
//! - 不可变：策略解析器（持有配置）
//! - 可变：手势会话（`Option<InteractiveSession>`）与当前转场（`Option<ActiveTransition>`）
//!
//! 同一时刻至多一个转场占用容器，转场进行中再次 push / pop 会返回
//! [`TransitionError::TransitionInProgress`]。
//!
//! 页面栈只在转场以 `finished = true` 完成时更新，取消的转场不改变栈。

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::TransitionConfig;
use crate::context::{Operation, StackTransitionContext, TransitionContext};
use crate::driver::{DriverId, TransitionDriver};
use crate::error::{TransitionError, TransitionResult};
use crate::geometry::Size;
use crate::interactive::{
    GestureAction, GestureCoordinator, GestureEvent, GesturePhase, InteractiveSession,
};
use crate::resolver::TransitionResolver;
use crate::screen::{Screen, ScreenId};

/// 转场完成后对页面栈的修改
enum StackChange {
    Push(Rc<dyn Screen>),
    Pop,
}

/// 进行中的转场
struct ActiveTransition {
    driver: TransitionDriver,
    context: StackTransitionContext,
    change: StackChange,
}

/// 导航栈控制器
pub struct NavigationController {
    screens: Vec<Rc<dyn Screen>>,
    resolver: TransitionResolver,
    gestures: GestureCoordinator,
    /// 已安装手势处理的页面
    gesture_screens: HashSet<ScreenId>,
    surface_size: Size,
    active: Option<ActiveTransition>,
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.screens.iter().map(|s| s.name()).collect();
        f.debug_struct("NavigationController")
            .field("screens", &names)
            .field("surface_size", &self.surface_size)
            .field("session", &self.gestures.session())
            .field("active", &self.active.as_ref().map(|a| a.driver.id()))
            .finish()
    }
}

impl NavigationController {
    pub fn new(config: TransitionConfig, surface_size: Size) -> Self {
        let gestures = GestureCoordinator::new(&config);
        Self {
            screens: Vec::new(),
            resolver: TransitionResolver::new(config),
            gestures,
            gesture_screens: HashSet::new(),
            surface_size,
            active: None,
        }
    }

    // ========== 查询 ==========

    pub fn current_screens(&self) -> &[Rc<dyn Screen>] {
        &self.screens
    }

    pub fn top_screen(&self) -> Option<&Rc<dyn Screen>> {
        self.screens.last()
    }

    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    pub fn config(&self) -> &TransitionConfig {
        self.resolver.config()
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_driver(&self) -> Option<&TransitionDriver> {
        self.active.as_ref().map(|a| &a.driver)
    }

    pub fn active_context(&self) -> Option<&StackTransitionContext> {
        self.active.as_ref().map(|a| &a.context)
    }

    pub fn session(&self) -> Option<&InteractiveSession> {
        self.gestures.session()
    }

    // ========== 驱动器提供 ==========

    /// 为一次导航操作提供驱动器，`None` 表示使用宿主默认过渡
    pub fn provide_animated_transitioning(
        &self,
        operation: Operation,
        from: &dyn Screen,
        to: &dyn Screen,
    ) -> Option<TransitionDriver> {
        self.resolver
            .resolve(operation, from, to, self.gestures.is_interactive())
    }

    /// 交互式驱动器绑定到当前手势会话
    pub fn provide_interactive_transitioning(
        &mut self,
        driver: &TransitionDriver,
    ) -> Option<&InteractiveSession> {
        if !driver.is_interactive() {
            return None;
        }
        self.gestures.bind_driver(driver.id())
    }

    // ========== 导航 ==========

    /// push 页面
    ///
    /// # 返回
    /// 创建了自定义驱动器时返回其 ID
    pub fn push_screen(&mut self, screen: Rc<dyn Screen>) -> TransitionResult<Option<DriverId>> {
        if self.active.is_some() {
            return Err(TransitionError::TransitionInProgress);
        }

        let Some(from) = self.screens.last().cloned() else {
            info!(screen = screen.name(), "设置根页面");
            screen.visual().reset();
            self.screens.push(screen);
            return Ok(None);
        };

        match self.provide_animated_transitioning(Operation::Push, &*from, &*screen) {
            Some(driver) => {
                let to = screen.clone();
                self.begin(driver, from, to, StackChange::Push(screen))
            }
            None => {
                info!(from = from.name(), to = screen.name(), "默认过渡 push");
                screen.visual().reset();
                self.screens.push(screen);
                Ok(None)
            }
        }
    }

    /// pop 栈顶页面
    ///
    /// 只剩根页面时不做任何事。
    pub fn pop_screen(&mut self) -> TransitionResult<Option<DriverId>> {
        if self.active.is_some() {
            return Err(TransitionError::TransitionInProgress);
        }

        let count = self.screens.len();
        if count < 2 {
            debug!(depth = count, "栈中没有可返回的页面");
            return Ok(None);
        }
        let from = self.screens[count - 1].clone();
        let to = self.screens[count - 2].clone();

        match self.provide_animated_transitioning(Operation::Pop, &*from, &*to) {
            Some(driver) => {
                self.provide_interactive_transitioning(&driver);
                self.begin(driver, from, to, StackChange::Pop)
            }
            None => {
                info!(from = from.name(), to = to.name(), "默认过渡 pop");
                self.screens.pop();
                self.gesture_screens.remove(&from.id());
                to.visual().reset();
                Ok(None)
            }
        }
    }

    fn begin(
        &mut self,
        mut driver: TransitionDriver,
        from: Rc<dyn Screen>,
        to: Rc<dyn Screen>,
        change: StackChange,
    ) -> TransitionResult<Option<DriverId>> {
        let id = driver.id();
        let mut context = StackTransitionContext::new(Some(from), Some(to), self.surface_size);
        let result = driver.execute(&mut context);

        let done = context.is_complete();
        self.active = Some(ActiveTransition {
            driver,
            context,
            change,
        });
        if done {
            self.finish_active();
        }

        result.map(|_| Some(id))
    }

    /// 推进当前转场
    pub fn update(&mut self, dt: f32) -> TransitionResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        let result = active.driver.update(dt, &mut active.context);
        if active.context.is_complete() {
            self.finish_active();
        }
        result.map(|_| ())
    }

    fn finish_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let finished = active.context.completion() == Some(true);

        if finished {
            match active.change {
                StackChange::Push(screen) => self.screens.push(screen),
                StackChange::Pop => {
                    if let Some(popped) = self.screens.pop() {
                        self.gesture_screens.remove(&popped.id());
                    }
                }
            }
        }

        for screen in [active.context.from_screen(), active.context.to_screen()]
            .into_iter()
            .flatten()
        {
            screen.visual().reset();
        }

        let driver_id = active.driver.id();
        if self
            .gestures
            .session()
            .is_some_and(|s| s.driver == Some(driver_id))
        {
            self.gestures.clear_session();
        }

        info!(
            driver = %driver_id,
            operation = %active.driver.operation(),
            finished = finished,
            depth = self.screens.len(),
            "导航栈更新"
        );
    }

    // ========== 手势 ==========

    /// 为页面安装手势处理，页面不支持交互式返回时返回 `false`
    pub fn attach_gesture_handling(&mut self, screen: &dyn Screen) -> bool {
        if !screen.interactive_enabled() {
            return false;
        }
        debug!(screen = screen.name(), "安装手势处理");
        self.gesture_screens.insert(screen.id());
        true
    }

    fn top_accepts_gesture(&self) -> bool {
        self.top_screen().is_some_and(|screen| {
            self.gesture_screens.contains(&screen.id()) && screen.interactive_enabled()
        })
    }

    /// 处理一个手势事件
    pub fn handle_gesture(&mut self, event: GestureEvent) -> TransitionResult<GestureAction> {
        if event.phase == GesturePhase::Began {
            if !self.top_accepts_gesture() {
                debug!("栈顶页面未安装手势处理");
                return Ok(GestureAction::Ignored);
            }
            if self.active.is_some() && !self.gestures.is_interactive() {
                debug!("非交互转场进行中，忽略手势");
                return Ok(GestureAction::Ignored);
            }
        }

        let action = self
            .gestures
            .handle(&event, self.screens.len(), self.surface_size.width);

        match action {
            GestureAction::Ignored => {}
            GestureAction::BeginPop => {
                let result = self.pop_screen();
                if result.is_err() || self.active.is_none() {
                    self.gestures.clear_session();
                }
                result?;
            }
            GestureAction::Update(percent) => {
                if let Some(active) = self.interactive_transition() {
                    active.driver.update_interactive(percent)?;
                }
            }
            GestureAction::Finish => {
                if let Some(active) = self.interactive_transition() {
                    active.driver.finish_interactive()?;
                }
            }
            GestureAction::Cancel => {
                if let Some(active) = self.interactive_transition() {
                    active.driver.cancel_interactive(&mut active.context)?;
                }
            }
        }

        Ok(action)
    }

    fn interactive_transition(&mut self) -> Option<&mut ActiveTransition> {
        self.active.as_mut().filter(|a| a.driver.is_interactive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::policy::{AnimationKind, InteractiveAnimationKind, ScreenPolicies};
    use crate::screen::DeclaredScreen;

    const SURFACE: Size = Size::new(400.0, 800.0);

    fn screen(name: &str, policies: ScreenPolicies) -> Rc<dyn Screen> {
        Rc::new(DeclaredScreen::new(name, Rect::from_size(SURFACE), policies))
    }

    fn controller() -> NavigationController {
        NavigationController::new(TransitionConfig::default(), SURFACE)
    }

    fn settle(nav: &mut NavigationController) {
        for _ in 0..200 {
            nav.update(1.0 / 60.0).unwrap();
            if !nav.is_transitioning() {
                return;
            }
        }
        panic!("转场未结束");
    }

    #[test]
    fn test_default_transitions_change_stack_immediately() {
        let mut nav = controller();
        assert_eq!(nav.push_screen(screen("root", ScreenPolicies::default())).unwrap(), None);
        assert_eq!(nav.push_screen(screen("next", ScreenPolicies::default())).unwrap(), None);
        assert_eq!(nav.depth(), 2);
        assert!(!nav.is_transitioning());

        assert_eq!(nav.pop_screen().unwrap(), None);
        assert_eq!(nav.depth(), 1);

        // 根页面不会被 pop
        assert_eq!(nav.pop_screen().unwrap(), None);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_custom_push_commits_on_completion() {
        let mut nav = controller();
        nav.push_screen(screen("root", ScreenPolicies::default()))
            .unwrap();
        let next = screen(
            "next",
            ScreenPolicies::default().with_push(AnimationKind::UniformScale, 0.25),
        );

        assert!(nav.push_screen(next.clone()).unwrap().is_some());
        assert!(nav.is_transitioning());
        assert_eq!(nav.depth(), 1);

        // 转场进行中拒绝新的导航
        assert_eq!(
            nav.pop_screen(),
            Err(TransitionError::TransitionInProgress)
        );

        settle(&mut nav);
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.top_screen().unwrap().id(), next.id());
        assert_eq!(next.visual().scale(), 1.0);
    }

    #[test]
    fn test_gesture_requires_attachment() {
        let mut nav = controller();
        let detail = screen(
            "detail",
            ScreenPolicies::default().with_interactive(InteractiveAnimationKind::System, 0.25),
        );
        nav.push_screen(screen("root", ScreenPolicies::default()))
            .unwrap();
        nav.push_screen(detail.clone()).unwrap();

        assert_eq!(
            nav.handle_gesture(GestureEvent::began(10.0)).unwrap(),
            GestureAction::Ignored
        );

        assert!(nav.attach_gesture_handling(&*detail));
        assert_eq!(
            nav.handle_gesture(GestureEvent::began(10.0)).unwrap(),
            GestureAction::BeginPop
        );
        assert!(nav.active_driver().unwrap().is_interactive());
    }

    #[test]
    fn test_attach_rejects_plain_screen() {
        let mut nav = controller();
        let plain = screen("plain", ScreenPolicies::default());
        assert!(!nav.attach_gesture_handling(&*plain));
    }
}
