//! 演示用页面
//!
//! - 首页：不声明任何策略
//! - 封面详情页：从首页 push 时整体缩放，支持交互式缩放返回
//! - 大图页：以封面区域为起点遮罩展开；返回详情页时封面先归位再收起遮罩，
//!   再次 push 时封面回到大图中的位置

use std::cell::Cell;
use std::rc::Rc;

use nav_transition::{
    Animatable, AnimationKind, InteractiveAnimationKind, Point, Rect, Screen, ScreenId,
    ScreenVisual, Size, TransitionContext, TransitionDriver, TransitionResult,
};
use tracing::debug;

pub const HOME: &str = "home";
pub const DETAIL: &str = "detail";
pub const LARGE_IMAGE: &str = "large_image";

/// 封面尺寸
pub const COVER_SIZE: Size = Size::new(134.0, 192.0);
/// 封面在详情页中的中心
pub const DETAIL_COVER_CENTER: Point = Point::new(200.0, 300.0);
/// 封面在大图页中的中心
pub const LARGE_COVER_CENTER: Point = Point::new(80.0, 240.0);

/// 可移动的封面
#[derive(Debug)]
pub struct Cover {
    center_x: Cell<f32>,
    center_y: Cell<f32>,
}

impl Cover {
    pub fn new(center: Point) -> Self {
        Self {
            center_x: Cell::new(center.x),
            center_y: Cell::new(center.y),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x.get(), self.center_y.get())
    }

    pub fn frame(&self) -> Rect {
        Rect::centered_at(self.center(), COVER_SIZE)
    }

    pub fn move_to(&self, center: Point) {
        self.center_x.set(center.x);
        self.center_y.set(center.y);
    }
}

impl Animatable for Cover {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "center_x" => Some(self.center_x.get()),
            "center_y" => Some(self.center_y.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "center_x" => {
                self.center_x.set(value);
                true
            }
            "center_y" => {
                self.center_y.set(value);
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["center_x", "center_y"]
    }
}

/// 首页
pub struct HomeScreen {
    id: ScreenId,
    visual: Rc<ScreenVisual>,
}

impl HomeScreen {
    pub fn new(frame: Rect) -> Self {
        Self {
            id: ScreenId::next(),
            visual: Rc::new(ScreenVisual::new(frame)),
        }
    }
}

impl Screen for HomeScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn name(&self) -> &str {
        HOME
    }

    fn visual(&self) -> &Rc<ScreenVisual> {
        &self.visual
    }
}

/// 封面详情页
pub struct DetailScreen {
    id: ScreenId,
    visual: Rc<ScreenVisual>,
    cover: Rc<Cover>,
}

impl DetailScreen {
    pub fn new(frame: Rect) -> Self {
        Self {
            id: ScreenId::next(),
            visual: Rc::new(ScreenVisual::new(frame)),
            cover: Rc::new(Cover::new(DETAIL_COVER_CENTER)),
        }
    }

    pub fn cover(&self) -> &Rc<Cover> {
        &self.cover
    }
}

impl Screen for DetailScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn name(&self) -> &str {
        DETAIL
    }

    fn visual(&self) -> &Rc<ScreenVisual> {
        &self.visual
    }

    fn push_duration(&self, from: &dyn Screen) -> Option<f32> {
        (from.name() == HOME).then_some(0.35)
    }

    fn push_kind(&self, from: &dyn Screen) -> AnimationKind {
        if from.name() == HOME {
            AnimationKind::UniformScale
        } else {
            AnimationKind::System
        }
    }

    fn interactive_enabled(&self) -> bool {
        true
    }

    fn interactive_kind(&self, _to: &dyn Screen) -> InteractiveAnimationKind {
        InteractiveAnimationKind::UniformScale
    }
}

/// 大图页
pub struct LargeImageScreen {
    id: ScreenId,
    visual: Rc<ScreenVisual>,
    cover: Rc<Cover>,
}

impl LargeImageScreen {
    pub fn new(frame: Rect) -> Self {
        Self {
            id: ScreenId::next(),
            visual: Rc::new(ScreenVisual::new(frame)),
            cover: Rc::new(Cover::new(LARGE_COVER_CENTER)),
        }
    }

    pub fn cover(&self) -> &Rc<Cover> {
        &self.cover
    }
}

impl Screen for LargeImageScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn name(&self) -> &str {
        LARGE_IMAGE
    }

    fn visual(&self) -> &Rc<ScreenVisual> {
        &self.visual
    }

    fn push_kind(&self, _from: &dyn Screen) -> AnimationKind {
        AnimationKind::Custom
    }

    fn custom_push(
        &self,
        _from: &dyn Screen,
        ctx: &mut dyn TransitionContext,
        driver: &mut TransitionDriver,
    ) -> TransitionResult<()> {
        // 上一次 pop 把封面留在了详情页的位置
        self.cover.move_to(LARGE_COVER_CENTER);
        driver.mask_animate(ctx, Some(self.cover.frame()))
    }

    fn pop_duration(&self, to: &dyn Screen) -> Option<f32> {
        (to.name() == DETAIL).then_some(0.35)
    }

    fn pop_kind(&self, to: &dyn Screen) -> AnimationKind {
        if to.name() == DETAIL {
            AnimationKind::Custom
        } else {
            AnimationKind::System
        }
    }

    fn custom_pop(
        &self,
        _to: &dyn Screen,
        _ctx: &mut dyn TransitionContext,
        driver: &mut TransitionDriver,
    ) -> TransitionResult<()> {
        let cover = self.cover.clone();
        let start = cover.center();

        // 封面先移回详情页中的位置
        driver.animate_property(cover.clone(), "center_x", start.x, DETAIL_COVER_CENTER.x, 0.25)?;
        driver.animate_property(cover.clone(), "center_y", start.y, DETAIL_COVER_CENTER.y, 0.25)?;

        driver.then(move |driver, ctx| {
            if ctx.was_cancelled() {
                cover.move_to(LARGE_COVER_CENTER);
                return driver.complete(ctx, false);
            }
            debug!(cover = ?cover.center(), "封面归位，开始收起遮罩");
            driver.mask_animate(ctx, Some(cover.frame()))
        });
        Ok(())
    }

    fn interactive_enabled(&self) -> bool {
        true
    }
}
