//! # Driver 模块
//!
//! 单次转场的驱动器（状态机）。
//!
//! ## 生命周期
//!
//! ```text
//! Idle ──execute()──► Executing ──complete()──► Completed
//! ```
//!
//! 驱动器由策略解析器在导航操作开始时创建，只能 `execute` 一次，
//! `complete_transition` 被调用后即作废。重复 `execute` 或重复完成都会返回
//! [`TransitionError::InvalidState`]。
//!
//! 驱动器持有自己的动画系统：宿主每帧调用 [`TransitionDriver::update`]，
//! 动画全部结束后执行收尾步骤并完成转场。交互式转场时动画处于暂停状态，
//! 进度由手势通过 [`TransitionDriver::update_interactive`] 拨动。

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::animation::{Animatable, AnimationId, AnimationSystem, ObjectId};
use crate::config::TransitionConfig;
use crate::context::{Operation, TransitionContext};
use crate::error::{ScreenRole, TransitionError, TransitionResult};
use crate::executor::{
    Continuation, MaskExecutor, ScaleExecutor, Settle, SettleQueue, SlideExecutor,
    TransitionExecutor,
};
use crate::geometry::Rect;
use crate::policy::{AnimationKind, InteractiveAnimationKind};
use crate::screen::{Screen, ScreenId, ScreenVisual};

static NEXT_DRIVER_ID: AtomicU64 = AtomicU64::new(1);

/// 驱动器唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverId(u64);

impl DriverId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DRIVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DriverId({})", self.0)
    }
}

/// 驱动器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    #[default]
    Idle,
    Executing,
    Completed,
}

impl DriverState {
    fn label(&self) -> &'static str {
        match self {
            DriverState::Idle => "空闲",
            DriverState::Executing => "执行中",
            DriverState::Completed => "已完成",
        }
    }
}

/// 转场驱动器
pub struct TransitionDriver {
    id: DriverId,
    operation: Operation,
    interactive: bool,
    config: TransitionConfig,
    state: DriverState,
    animations: AnimationSystem,
    /// 已注册到动画系统的页面视觉
    registered: HashMap<ScreenId, ObjectId>,
    settles: SettleQueue,
    /// 交互进度（0.0 - 1.0）
    percent: f32,
    /// 交互式转场已启动、手势尚未结束
    awaiting_gesture: bool,
    completions: u32,
}

impl std::fmt::Debug for TransitionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionDriver")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("interactive", &self.interactive)
            .field("state", &self.state)
            .field("awaiting_gesture", &self.awaiting_gesture)
            .field("pending_settles", &self.settles)
            .field("completions", &self.completions)
            .finish()
    }
}

impl TransitionDriver {
    pub fn new(operation: Operation, interactive: bool, config: TransitionConfig) -> Self {
        Self {
            id: DriverId::next(),
            operation,
            interactive,
            config,
            state: DriverState::Idle,
            animations: AnimationSystem::new(),
            registered: HashMap::new(),
            settles: SettleQueue::new(),
            percent: 0.0,
            awaiting_gesture: false,
            completions: 0,
        }
    }

    pub fn id(&self) -> DriverId {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// `complete_transition` 经由本驱动器被调用的次数
    pub fn completion_count(&self) -> u32 {
        self.completions
    }

    /// 交互进度
    pub fn percent_complete(&self) -> f32 {
        self.percent
    }

    /// 转场时长
    ///
    /// 每次查询都从页面策略重新计算。页面未声明或上下文缺少页面时
    /// 使用配置的 `default_duration`。
    pub fn duration(&self, ctx: &dyn TransitionContext) -> f32 {
        let (Some(from), Some(to)) = (ctx.from_screen(), ctx.to_screen()) else {
            return self.config.default_duration;
        };

        let declared = if self.interactive {
            from.interactive_duration(&*to)
        } else {
            match self.operation {
                Operation::Push => to.push_duration(&*from),
                Operation::Pop => from.pop_duration(&*to),
            }
        };
        declared.unwrap_or(self.config.default_duration)
    }

    fn invalid_state(&self) -> TransitionError {
        TransitionError::InvalidState {
            driver: self.id,
            operation: self.operation,
            state: self.state.label(),
        }
    }

    // ========== 状态机 ==========

    /// 开始转场
    ///
    /// 根据 `(is_interactive, kind)` 分派到对应执行器。上下文缺少页面时
    /// 记录警告并直接完成，不视为失败。
    pub fn execute(&mut self, ctx: &mut dyn TransitionContext) -> TransitionResult<()> {
        if self.state != DriverState::Idle {
            return Err(self.invalid_state());
        }
        self.state = DriverState::Executing;

        let (from, to) = match (ctx.from_screen(), ctx.to_screen()) {
            (Some(from), Some(to)) => (from, to),
            (from, _) => {
                let role = if from.is_none() {
                    ScreenRole::From
                } else {
                    ScreenRole::To
                };
                let error = TransitionError::MissingContext { role };
                warn!(driver = %self.id, error = %error, "转场上下文不完整，直接完成");
                let finished = !ctx.was_cancelled();
                return self.complete(ctx, finished);
            }
        };

        info!(
            driver = %self.id,
            operation = %self.operation,
            interactive = self.interactive,
            from = from.name(),
            to = to.name(),
            "开始转场"
        );

        if let Err(e) = self.dispatch(&*from, &*to, ctx) {
            warn!(driver = %self.id, error = %e, "执行器启动失败，直接完成");
            if self.state == DriverState::Executing {
                let finished = !ctx.was_cancelled();
                self.complete(ctx, finished)?;
            }
            return Err(e);
        }

        if self.interactive && self.state == DriverState::Executing {
            self.animations.pause_all();
            self.awaiting_gesture = true;
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        from: &dyn Screen,
        to: &dyn Screen,
        ctx: &mut dyn TransitionContext,
    ) -> TransitionResult<()> {
        if self.interactive {
            let kind = from.interactive_kind(to);
            debug!(driver = %self.id, kind = kind.name(), "交互式执行器");
            return match kind {
                InteractiveAnimationKind::System => self.slide_animate(ctx),
                InteractiveAnimationKind::UniformScale => self.scale_animate(ctx),
                InteractiveAnimationKind::Custom => from.custom_interactive_pop(to, ctx, self),
            };
        }

        let kind = match self.operation {
            Operation::Push => to.push_kind(from),
            Operation::Pop => from.pop_kind(to),
        };
        debug!(driver = %self.id, kind = kind.name(), "执行器");

        match (self.operation, kind) {
            (_, AnimationKind::System) => self.slide_animate(ctx),
            (_, AnimationKind::UniformScale) => self.scale_animate(ctx),
            (_, AnimationKind::RadialMask { origin }) => self.mask_animate(ctx, origin),
            (Operation::Push, AnimationKind::Custom) => to.custom_push(from, ctx, self),
            (Operation::Pop, AnimationKind::Custom) => from.custom_pop(to, ctx, self),
        }
    }

    /// 推进动画
    ///
    /// 动画全部结束后依次执行收尾步骤；没有任何待执行步骤的驱动器会自行完成，
    /// 避免宿主一直等待。交互式转场在手势结束前只推进动画，不收尾。
    ///
    /// # 返回
    /// 驱动器是否已完成
    pub fn update(&mut self, dt: f32, ctx: &mut dyn TransitionContext) -> TransitionResult<bool> {
        if self.state != DriverState::Executing {
            return Ok(self.state == DriverState::Completed);
        }

        let events = self.animations.update(dt);
        if !events.is_empty() {
            debug!(driver = %self.id, events = ?events, "动画事件");
        }
        if self.awaiting_gesture {
            return Ok(false);
        }

        while self.state == DriverState::Executing && !self.animations.has_active_animations() {
            match self.settles.pop_front() {
                Some(settle) => settle.run(self, ctx)?,
                None => {
                    warn!(driver = %self.id, "没有待完成的动画，自动完成转场");
                    let finished = !ctx.was_cancelled();
                    self.complete(ctx, finished)?;
                }
            }
        }

        Ok(self.state == DriverState::Completed)
    }

    /// 完成转场，把控制权交还宿主
    pub fn complete(
        &mut self,
        ctx: &mut dyn TransitionContext,
        finished: bool,
    ) -> TransitionResult<()> {
        if self.state != DriverState::Executing {
            return Err(self.invalid_state());
        }

        self.state = DriverState::Completed;
        self.awaiting_gesture = false;
        self.completions += 1;
        self.settles.clear();
        self.animations.clear();

        info!(driver = %self.id, finished = finished, "转场完成");
        ctx.complete_transition(finished);
        Ok(())
    }

    // ========== 交互式进度 ==========

    fn ensure_interactive(&self) -> TransitionResult<()> {
        if self.interactive && self.state == DriverState::Executing {
            Ok(())
        } else {
            Err(self.invalid_state())
        }
    }

    /// 把动画拨到手势进度
    pub fn update_interactive(&mut self, percent: f32) -> TransitionResult<()> {
        self.ensure_interactive()?;
        self.percent = percent.clamp(0.0, 1.0);
        self.animations.seek_all(self.percent);
        Ok(())
    }

    /// 手势完成：剩余部分正向播放
    pub fn finish_interactive(&mut self) -> TransitionResult<()> {
        self.ensure_interactive()?;
        debug!(driver = %self.id, percent = self.percent, "交互式转场继续完成");
        self.awaiting_gesture = false;
        self.animations.resume_all();
        Ok(())
    }

    /// 手势取消：标记上下文已取消，剩余部分反向播放
    pub fn cancel_interactive(&mut self, ctx: &mut dyn TransitionContext) -> TransitionResult<()> {
        self.ensure_interactive()?;
        debug!(driver = %self.id, percent = self.percent, "交互式转场取消");
        ctx.cancel_interactive_transition();
        self.awaiting_gesture = false;
        self.animations.reverse_all();
        Ok(())
    }

    // ========== 自定义执行器可用的工具 ==========

    /// 滑动过渡
    pub fn slide_animate(&mut self, ctx: &mut dyn TransitionContext) -> TransitionResult<()> {
        let duration = self.duration(ctx);
        self.run_executor(&SlideExecutor, ctx, duration)
    }

    /// 整体缩放过渡
    pub fn scale_animate(&mut self, ctx: &mut dyn TransitionContext) -> TransitionResult<()> {
        let duration = self.duration(ctx);
        self.run_executor(&ScaleExecutor, ctx, duration)
    }

    /// 圆形遮罩过渡
    pub fn mask_animate(
        &mut self,
        ctx: &mut dyn TransitionContext,
        origin: Option<Rect>,
    ) -> TransitionResult<()> {
        let duration = self.duration(ctx);
        self.run_executor(&MaskExecutor::new(origin), ctx, duration)
    }

    fn run_executor(
        &mut self,
        executor: &dyn TransitionExecutor,
        ctx: &mut dyn TransitionContext,
        duration: f32,
    ) -> TransitionResult<()> {
        debug!(
            driver = %self.id,
            executor = executor.name(),
            duration = duration,
            "启动执行器"
        );
        executor.animate(self, ctx, duration)
    }

    /// 对任意可动画对象启动属性动画
    pub fn animate_property<T: Animatable>(
        &mut self,
        object: Rc<T>,
        property_id: &'static str,
        from: f32,
        to: f32,
        duration: f32,
    ) -> TransitionResult<AnimationId> {
        let object_id = self.animations.register(object);
        let id = self.animations.animate_object::<T>(
            object_id,
            property_id,
            from,
            to,
            duration,
            self.config.easing,
        )?;
        Ok(id)
    }

    /// 当前已启动的动画全部结束后执行 `continuation`
    pub fn then<F>(&mut self, continuation: F)
    where
        F: FnOnce(&mut TransitionDriver, &mut dyn TransitionContext) -> TransitionResult<()>
            + 'static,
    {
        let continuation: Continuation = Box::new(continuation);
        self.settles.push_back(Settle::Then(continuation));
    }

    pub(crate) fn animate_visual(
        &mut self,
        screen: &dyn Screen,
        property_id: &'static str,
        from: f32,
        to: f32,
        duration: f32,
    ) -> TransitionResult<AnimationId> {
        let animations = &mut self.animations;
        let object_id = *self
            .registered
            .entry(screen.id())
            .or_insert_with(|| animations.register(screen.visual().clone()));

        let id = self.animations.animate_object::<ScreenVisual>(
            object_id,
            property_id,
            from,
            to,
            duration,
            self.config.easing,
        )?;
        Ok(id)
    }

    pub(crate) fn push_settle(&mut self, settle: Settle) {
        self.settles.push_back(settle);
    }

    #[cfg(test)]
    pub(crate) fn start_for_test(&mut self) {
        self.state = DriverState::Executing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::context::StackTransitionContext;
    use crate::geometry::Size;
    use crate::policy::ScreenPolicies;
    use crate::screen::DeclaredScreen;

    const SURFACE: Size = Size::new(400.0, 800.0);

    fn screen(name: &str, policies: ScreenPolicies) -> Rc<dyn Screen> {
        Rc::new(DeclaredScreen::new(name, Rect::from_size(SURFACE), policies))
    }

    fn context(from: &Rc<dyn Screen>, to: &Rc<dyn Screen>) -> StackTransitionContext {
        StackTransitionContext::new(Some(from.clone()), Some(to.clone()), SURFACE)
    }

    fn run_to_end(driver: &mut TransitionDriver, ctx: &mut StackTransitionContext) {
        for _ in 0..200 {
            if driver.update(1.0 / 60.0, ctx).unwrap() {
                return;
            }
        }
        panic!("转场未结束");
    }

    #[test]
    fn test_execute_twice_is_invalid() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_push(AnimationKind::UniformScale, 0.25),
        );
        let mut ctx = context(&a, &b);
        let mut driver = TransitionDriver::new(Operation::Push, false, TransitionConfig::default());

        driver.execute(&mut ctx).unwrap();
        assert_eq!(driver.state(), DriverState::Executing);

        let err = driver.execute(&mut ctx).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { .. }));
    }

    #[test]
    fn test_complete_exactly_once() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_push(AnimationKind::UniformScale, 0.25),
        );
        let mut ctx = context(&a, &b);
        let mut driver = TransitionDriver::new(Operation::Push, false, TransitionConfig::default());

        driver.execute(&mut ctx).unwrap();
        run_to_end(&mut driver, &mut ctx);

        assert_eq!(driver.state(), DriverState::Completed);
        assert_eq!(driver.completion_count(), 1);
        assert_eq!(ctx.completion_count(), 1);

        // 再次完成是违规
        assert!(matches!(
            driver.complete(&mut ctx, true),
            Err(TransitionError::InvalidState { .. })
        ));
        assert_eq!(ctx.completion_count(), 1);

        // 完成后继续 update 不会再次完成
        assert!(driver.update(0.1, &mut ctx).unwrap());
        assert_eq!(ctx.completion_count(), 1);
    }

    #[test]
    fn test_missing_context_completes_silently() {
        let a = screen("a", ScreenPolicies::default());
        let mut ctx = StackTransitionContext::new(Some(a), None, SURFACE);
        let mut driver = TransitionDriver::new(Operation::Pop, false, TransitionConfig::default());

        assert!(driver.execute(&mut ctx).is_ok());
        assert_eq!(driver.state(), DriverState::Completed);
        assert_eq!(ctx.completion(), Some(true));
    }

    #[test]
    fn test_duration_per_operation() {
        let policies = ScreenPolicies::default()
            .with_push(AnimationKind::UniformScale, 0.35)
            .with_pop(AnimationKind::UniformScale, 0.4)
            .with_interactive(InteractiveAnimationKind::System, 0.3);
        let a = screen("a", ScreenPolicies::default());
        let b = screen("b", policies);
        let config = TransitionConfig::default();

        let push = TransitionDriver::new(Operation::Push, false, config.clone());
        assert_eq!(push.duration(&context(&a, &b)), 0.35);

        let pop = TransitionDriver::new(Operation::Pop, false, config.clone());
        assert_eq!(pop.duration(&context(&b, &a)), 0.4);

        let interactive = TransitionDriver::new(Operation::Pop, true, config.clone());
        assert_eq!(interactive.duration(&context(&b, &a)), 0.3);

        let empty = StackTransitionContext::new(None, None, SURFACE);
        assert_eq!(interactive.duration(&empty), config.default_duration);
    }

    #[test]
    fn test_undeclared_duration_uses_config() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen("b", ScreenPolicies::default());
        let slow = TransitionConfig {
            default_duration: 1.0,
            ..TransitionConfig::default()
        };

        for (operation, interactive) in [
            (Operation::Push, false),
            (Operation::Pop, false),
            (Operation::Pop, true),
        ] {
            let driver = TransitionDriver::new(operation, interactive, slow.clone());
            assert_eq!(driver.duration(&context(&a, &b)), 1.0, "{operation} {interactive}");
        }

        // 声明过的时长不受配置影响
        let declared = screen(
            "declared",
            ScreenPolicies::default().with_pop(AnimationKind::System, 0.4),
        );
        let pop = TransitionDriver::new(Operation::Pop, false, slow);
        assert_eq!(pop.duration(&context(&declared, &a)), 0.4);
    }

    #[test]
    fn test_interactive_seek_and_finish() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_interactive(InteractiveAnimationKind::System, 0.25),
        );
        let mut ctx = context(&b, &a);
        let config = TransitionConfig {
            easing: crate::animation::EasingFunction::Linear,
            ..TransitionConfig::default()
        };
        let mut driver = TransitionDriver::new(Operation::Pop, true, config);

        driver.execute(&mut ctx).unwrap();

        // 暂停中，时间推进不改变位置
        driver.update(1.0, &mut ctx).unwrap();
        assert_eq!(b.visual().offset_x(), 0.0);

        driver.update_interactive(0.5).unwrap();
        assert!((b.visual().offset_x() - 200.0).abs() < 1e-3);
        assert!((a.visual().offset_x() + 200.0).abs() < 1e-3);
        assert_eq!(driver.percent_complete(), 0.5);

        driver.finish_interactive().unwrap();
        run_to_end(&mut driver, &mut ctx);
        assert_eq!(a.visual().offset_x(), 0.0);
        assert_eq!(ctx.completion(), Some(true));
    }

    #[test]
    fn test_interactive_cancel_reverses() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_interactive(InteractiveAnimationKind::UniformScale, 0.25),
        );
        let mut ctx = context(&b, &a);
        let mut driver = TransitionDriver::new(Operation::Pop, true, TransitionConfig::default());

        driver.execute(&mut ctx).unwrap();
        driver.update_interactive(0.3).unwrap();
        driver.cancel_interactive(&mut ctx).unwrap();
        assert!(ctx.was_cancelled());

        run_to_end(&mut driver, &mut ctx);
        assert_eq!(b.visual().scale(), 1.0);
        assert_eq!(a.visual().scale(), 1.0);
        assert_eq!(ctx.completion(), Some(false));
    }

    #[test]
    fn test_interactive_calls_rejected_on_plain_driver() {
        let mut driver = TransitionDriver::new(Operation::Pop, false, TransitionConfig::default());
        assert!(matches!(
            driver.update_interactive(0.5),
            Err(TransitionError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_custom_without_override_falls_back_to_slide() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_pop(AnimationKind::Custom, 0.25),
        );
        let mut ctx = context(&b, &a);
        let mut driver = TransitionDriver::new(Operation::Pop, false, TransitionConfig::default());

        driver.execute(&mut ctx).unwrap();
        assert_eq!(a.visual().offset_x(), -400.0);

        run_to_end(&mut driver, &mut ctx);
        assert_eq!(b.visual().offset_x(), 400.0);
        assert_eq!(ctx.completion(), Some(true));
    }

    struct Gauge {
        value: Cell<f32>,
    }

    impl Animatable for Gauge {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            (property_id == "value").then(|| self.value.get())
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            if property_id == "value" {
                self.value.set(value);
                true
            } else {
                false
            }
        }

        fn property_list(&self) -> &'static [&'static str] {
            &["value"]
        }
    }

    #[test]
    fn test_then_runs_after_animations() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen("b", ScreenPolicies::default());
        let mut ctx = context(&b, &a);
        let mut driver = TransitionDriver::new(Operation::Pop, false, TransitionConfig::default());
        driver.start_for_test();

        let gauge = Rc::new(Gauge {
            value: Cell::new(0.0),
        });
        driver
            .animate_property(gauge.clone(), "value", 0.0, 10.0, 0.2)
            .unwrap();

        let observed = Rc::new(Cell::new(-1.0));
        let seen = observed.clone();
        let watched = gauge.clone();
        driver.then(move |driver, ctx| {
            seen.set(watched.value.get());
            driver.mask_animate(ctx, None)
        });

        driver.update(0.1, &mut ctx).unwrap();
        assert_eq!(observed.get(), -1.0);

        run_to_end(&mut driver, &mut ctx);
        assert_eq!(observed.get(), 10.0);
        assert!(b.visual().mask().is_some());
        assert_eq!(ctx.completion(), Some(true));
        assert_eq!(driver.completion_count(), 1);
    }

    #[test]
    fn test_zero_duration_interactive_waits_for_gesture() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen(
            "b",
            ScreenPolicies::default().with_interactive(InteractiveAnimationKind::System, 0.0),
        );
        let mut ctx = context(&b, &a);
        let mut driver = TransitionDriver::new(Operation::Pop, true, TransitionConfig::default());

        driver.execute(&mut ctx).unwrap();
        for _ in 0..10 {
            assert!(!driver.update(1.0 / 60.0, &mut ctx).unwrap());
        }
        assert_eq!(ctx.completion(), None);
        assert_eq!(driver.state(), DriverState::Executing);

        driver.cancel_interactive(&mut ctx).unwrap();
        run_to_end(&mut driver, &mut ctx);
        assert_eq!(ctx.completion(), Some(false));
        assert_eq!(driver.completion_count(), 1);
    }

    #[test]
    fn test_watchdog_completes_idle_execution() {
        let a = screen("a", ScreenPolicies::default());
        let b = screen("b", ScreenPolicies::default());
        let mut ctx = context(&b, &a);
        let mut driver = TransitionDriver::new(Operation::Pop, false, TransitionConfig::default());
        driver.start_for_test();

        assert!(driver.update(0.016, &mut ctx).unwrap());
        assert_eq!(ctx.completion(), Some(true));
    }
}
