//! # Screen 模块
//!
//! 页面抽象与页面视觉状态。
//!
//! ## 设计说明
//!
//! - [`Screen`] 的能力查询全部带有默认实现，默认即“使用宿主默认过渡”，
//!   页面只覆盖自己关心的那几项
//! - [`ScreenVisual`] 实现 `Animatable`，执行器通过动画系统驱动它的
//!   `offset_x` / `scale` / `mask_radius` 属性
//! - [`DeclaredScreen`] 以数据形式持有策略，适合从配置构造的页面

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::Animatable;
use crate::context::TransitionContext;
use crate::driver::TransitionDriver;
use crate::error::TransitionResult;
use crate::geometry::{Point, Rect};
use crate::policy::{AnimationKind, InteractiveAnimationKind, ScreenPolicies};

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(1);

/// 页面唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(u64);

impl ScreenId {
    /// 分配新的页面 ID
    pub fn next() -> Self {
        Self(NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScreenId({})", self.0)
    }
}

/// 圆形遮罩
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMask {
    pub center: Point,
    pub radius: f32,
}

/// 页面视觉状态的内部数据
#[derive(Debug, Clone, PartialEq)]
pub struct VisualData {
    /// 页面在容器中的布局矩形
    pub frame: Rect,
    /// 水平偏移（滑动转场）
    pub offset_x: f32,
    /// 整体缩放
    pub scale: f32,
    /// 圆形遮罩，`None` 表示不裁剪
    pub mask: Option<CircleMask>,
}

impl VisualData {
    fn resting(frame: Rect) -> Self {
        Self {
            frame,
            offset_x: 0.0,
            scale: 1.0,
            mask: None,
        }
    }
}

/// 可动画的页面视觉状态
///
/// ## 支持的属性
///
/// - `"offset_x"`: 水平偏移
/// - `"scale"`: 整体缩放
/// - `"mask_radius"`: 遮罩半径（仅在已安装遮罩时可用）
#[derive(Debug)]
pub struct ScreenVisual {
    inner: RefCell<VisualData>,
}

impl ScreenVisual {
    pub const PROPERTIES: &'static [&'static str] = &["offset_x", "scale", "mask_radius"];

    pub fn new(frame: Rect) -> Self {
        Self {
            inner: RefCell::new(VisualData::resting(frame)),
        }
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> VisualData {
        self.inner.borrow().clone()
    }

    pub fn frame(&self) -> Rect {
        self.inner.borrow().frame
    }

    pub fn set_frame(&self, frame: Rect) {
        self.inner.borrow_mut().frame = frame;
    }

    /// 布局中心（不含偏移与缩放）
    pub fn center(&self) -> Point {
        self.inner.borrow().frame.center()
    }

    pub fn offset_x(&self) -> f32 {
        self.inner.borrow().offset_x
    }

    pub fn set_offset_x(&self, value: f32) {
        self.inner.borrow_mut().offset_x = value;
    }

    pub fn scale(&self) -> f32 {
        self.inner.borrow().scale
    }

    pub fn set_scale(&self, value: f32) {
        self.inner.borrow_mut().scale = value;
    }

    pub fn mask(&self) -> Option<CircleMask> {
        self.inner.borrow().mask
    }

    /// 安装圆形遮罩
    pub fn set_mask(&self, center: Point, radius: f32) {
        self.inner.borrow_mut().mask = Some(CircleMask { center, radius });
    }

    /// 移除遮罩
    pub fn clear_mask(&self) {
        self.inner.borrow_mut().mask = None;
    }

    /// 恢复到静止状态（无偏移、无缩放、无遮罩）
    pub fn reset(&self) {
        let mut data = self.inner.borrow_mut();
        let frame = data.frame;
        *data = VisualData::resting(frame);
    }
}

impl Animatable for ScreenVisual {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        let data = self.inner.borrow();
        match property_id {
            "offset_x" => Some(data.offset_x),
            "scale" => Some(data.scale),
            "mask_radius" => data.mask.map(|m| m.radius),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        let mut data = self.inner.borrow_mut();
        match property_id {
            "offset_x" => {
                data.offset_x = value;
                true
            }
            "scale" => {
                data.scale = value;
                true
            }
            "mask_radius" => match data.mask.as_mut() {
                Some(mask) => {
                    mask.radius = value.max(0.0);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }
}

/// 导航栈中的页面
///
/// 能力查询分三组：
/// - push：声明在被 push 的页面上，参数为来源页面
/// - pop：声明在被 pop 的页面上，参数为目标页面
/// - 交互式 pop：同样声明在被 pop 的页面上
///
/// 时长查询返回 `None` 表示未声明，由驱动器取配置中的 `default_duration`。
/// 自定义钩子的默认实现退化为滑动过渡，保证转场总能完成。
pub trait Screen {
    fn id(&self) -> ScreenId;

    /// 页面名称（用于日志）
    fn name(&self) -> &str;

    fn visual(&self) -> &Rc<ScreenVisual>;

    fn push_duration(&self, _from: &dyn Screen) -> Option<f32> {
        None
    }

    fn push_kind(&self, _from: &dyn Screen) -> AnimationKind {
        AnimationKind::System
    }

    fn custom_push(
        &self,
        _from: &dyn Screen,
        ctx: &mut dyn TransitionContext,
        driver: &mut TransitionDriver,
    ) -> TransitionResult<()> {
        driver.slide_animate(ctx)
    }

    fn pop_duration(&self, _to: &dyn Screen) -> Option<f32> {
        None
    }

    fn pop_kind(&self, _to: &dyn Screen) -> AnimationKind {
        AnimationKind::System
    }

    fn custom_pop(
        &self,
        _to: &dyn Screen,
        ctx: &mut dyn TransitionContext,
        driver: &mut TransitionDriver,
    ) -> TransitionResult<()> {
        driver.slide_animate(ctx)
    }

    fn interactive_enabled(&self) -> bool {
        false
    }

    fn interactive_duration(&self, _to: &dyn Screen) -> Option<f32> {
        None
    }

    fn interactive_kind(&self, _to: &dyn Screen) -> InteractiveAnimationKind {
        InteractiveAnimationKind::System
    }

    fn custom_interactive_pop(
        &self,
        _to: &dyn Screen,
        ctx: &mut dyn TransitionContext,
        driver: &mut TransitionDriver,
    ) -> TransitionResult<()> {
        driver.slide_animate(ctx)
    }
}

/// 以数据形式声明策略的页面
///
/// 策略在构造时确定，不依赖对方页面。
#[derive(Debug)]
pub struct DeclaredScreen {
    id: ScreenId,
    name: String,
    visual: Rc<ScreenVisual>,
    policies: ScreenPolicies,
}

impl DeclaredScreen {
    pub fn new(name: impl Into<String>, frame: Rect, policies: ScreenPolicies) -> Self {
        Self {
            id: ScreenId::next(),
            name: name.into(),
            visual: Rc::new(ScreenVisual::new(frame)),
            policies,
        }
    }

    pub fn policies(&self) -> &ScreenPolicies {
        &self.policies
    }
}

impl Screen for DeclaredScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn visual(&self) -> &Rc<ScreenVisual> {
        &self.visual
    }

    fn push_duration(&self, _from: &dyn Screen) -> Option<f32> {
        self.policies.push.and_then(|p| p.duration)
    }

    fn push_kind(&self, _from: &dyn Screen) -> AnimationKind {
        self.policies.push.map(|p| p.kind).unwrap_or_default()
    }

    fn pop_duration(&self, _to: &dyn Screen) -> Option<f32> {
        self.policies.pop.and_then(|p| p.duration)
    }

    fn pop_kind(&self, _to: &dyn Screen) -> AnimationKind {
        self.policies.pop.map(|p| p.kind).unwrap_or_default()
    }

    fn interactive_enabled(&self) -> bool {
        self.policies.interactive.is_some_and(|p| p.enabled)
    }

    fn interactive_duration(&self, _to: &dyn Screen) -> Option<f32> {
        self.policies.interactive.and_then(|p| p.duration)
    }

    fn interactive_kind(&self, _to: &dyn Screen) -> InteractiveAnimationKind {
        self.policies.interactive.map(|p| p.kind).unwrap_or_default()
    }
}
