//! # Executor 模块
//!
//! 三种可互换的转场动画执行器：滑动、整体缩放、圆形遮罩。
//!
//! 执行器只负责把动画注册到驱动器的动画系统并登记一个收尾步骤（[`Settle`]），
//! 随即返回。动画系统报告全部动画结束后，驱动器执行收尾步骤并调用
//! `complete_transition`。

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::context::{Operation, TransitionContext};
use crate::driver::TransitionDriver;
use crate::error::{ScreenRole, TransitionError, TransitionResult};
use crate::geometry::{Rect, Size, mask_radii};
use crate::screen::{Screen, ScreenVisual};

/// 转场动画执行器
pub trait TransitionExecutor {
    /// 执行器名称（用于日志）
    fn name(&self) -> &'static str;

    /// 启动动画
    ///
    /// 返回时动画尚未结束，完成由驱动器在动画结束后统一处理。
    fn animate(
        &self,
        driver: &mut TransitionDriver,
        ctx: &mut dyn TransitionContext,
        duration: f32,
    ) -> TransitionResult<()>;
}

/// 从上下文取出两个页面
pub(crate) fn context_screens(
    ctx: &dyn TransitionContext,
) -> TransitionResult<(Rc<dyn Screen>, Rc<dyn Screen>)> {
    let from = ctx.from_screen().ok_or(TransitionError::MissingContext {
        role: ScreenRole::From,
    })?;
    let to = ctx.to_screen().ok_or(TransitionError::MissingContext {
        role: ScreenRole::To,
    })?;
    Ok((from, to))
}

/// 水平滑动（宿主默认过渡）
///
/// - push：新页面从右侧滑入，旧页面向左滑出
/// - pop：旧页面向右滑出，下层页面从左侧滑入
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideExecutor;

impl TransitionExecutor for SlideExecutor {
    fn name(&self) -> &'static str {
        "slide"
    }

    fn animate(
        &self,
        driver: &mut TransitionDriver,
        ctx: &mut dyn TransitionContext,
        duration: f32,
    ) -> TransitionResult<()> {
        let (from, to) = context_screens(ctx)?;
        let width = ctx.container().size().width;
        let operation = driver.operation();

        stack_layers(ctx, operation, &*from, &*to);
        let (to_start, from_end) = match operation {
            Operation::Push => (width, -width),
            Operation::Pop => (-width, width),
        };

        driver.animate_visual(&*to, "offset_x", to_start, 0.0, duration)?;
        driver.animate_visual(&*from, "offset_x", 0.0, from_end, duration)?;
        driver.push_settle(Settle::Slide {
            from: from.visual().clone(),
            to: to.visual().clone(),
        });
        Ok(())
    }
}

/// push 时新页面在上，pop 时旧页面在上
fn stack_layers(
    ctx: &mut dyn TransitionContext,
    operation: Operation,
    from: &dyn Screen,
    to: &dyn Screen,
) {
    let (below, above) = match operation {
        Operation::Push => (from.id(), to.id()),
        Operation::Pop => (to.id(), from.id()),
    };
    let container = ctx.container();
    container.add_layer(below);
    container.add_layer(above);
}

/// 整体缩放
///
/// 进入的页面从最小比例放大到 1，离开的页面从 1 缩小到最小比例。
/// 层级与滑动一致：pop 时离开的页面在上层缩小。
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleExecutor;

impl TransitionExecutor for ScaleExecutor {
    fn name(&self) -> &'static str {
        "uniform_scale"
    }

    fn animate(
        &self,
        driver: &mut TransitionDriver,
        ctx: &mut dyn TransitionContext,
        duration: f32,
    ) -> TransitionResult<()> {
        let (from, to) = context_screens(ctx)?;
        let min_scale = driver.config().min_scale;
        stack_layers(ctx, driver.operation(), &*from, &*to);

        driver.animate_visual(&*to, "scale", min_scale, 1.0, duration)?;
        driver.animate_visual(&*from, "scale", 1.0, min_scale, duration)?;
        driver.push_settle(Settle::Scale {
            from: from.visual().clone(),
            to: to.visual().clone(),
        });
        Ok(())
    }
}

/// 圆形遮罩
///
/// push 时在新页面上展开遮罩（min → max），pop 时在旧页面上收起遮罩（max → min）。
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskExecutor {
    /// 遮罩起点矩形，`None` 时以目标页面中心为圆心
    pub origin: Option<Rect>,
}

impl MaskExecutor {
    pub fn new(origin: Option<Rect>) -> Self {
        Self { origin }
    }
}

impl TransitionExecutor for MaskExecutor {
    fn name(&self) -> &'static str {
        "radial_mask"
    }

    fn animate(
        &self,
        driver: &mut TransitionDriver,
        ctx: &mut dyn TransitionContext,
        duration: f32,
    ) -> TransitionResult<()> {
        let (from, to) = context_screens(ctx)?;
        let operation = driver.operation();

        let view_center = to.visual().center();
        let side = driver.config().mask_origin_size;
        let origin = self
            .origin
            .unwrap_or_else(|| Rect::centered_at(view_center, Size::new(side, side)));

        let target = match operation {
            Operation::Push => to.clone(),
            Operation::Pop => from.clone(),
        };
        let bounds = ctx.final_frame(&*target).size;
        let radii = mask_radii(origin, view_center, bounds);
        let arc_center = origin.center();

        debug!(
            driver = %driver.id(),
            operation = %operation,
            min = radii.min,
            max = radii.max,
            "遮罩半径"
        );

        let container = ctx.container();
        match operation {
            Operation::Push => {
                container.add_layer(from.id());
                container.add_layer(to.id());
            }
            Operation::Pop => {
                container.add_layer(to.id());
                container.add_layer(from.id());
            }
        }

        let (start, end) = match operation {
            Operation::Push => (radii.min, radii.max),
            Operation::Pop => (radii.max, radii.min),
        };

        target.visual().set_mask(arc_center, start);
        driver.animate_visual(&*target, "mask_radius", start, end, duration)?;
        driver.push_settle(Settle::Mask {
            target: target.visual().clone(),
            clear: operation == Operation::Push,
            pin_radius: radii.max,
        });
        Ok(())
    }
}

/// 动画结束后的延续步骤
pub type Continuation =
    Box<dyn FnOnce(&mut TransitionDriver, &mut dyn TransitionContext) -> TransitionResult<()>>;

/// 动画全部结束后依次执行的收尾步骤
pub(crate) enum Settle {
    /// 滑动收尾：取消时恢复旧页面位置，否则新页面归位
    Slide {
        from: Rc<ScreenVisual>,
        to: Rc<ScreenVisual>,
    },
    /// 缩放收尾：取消时两者恢复为 1，否则新页面定格为 1
    Scale {
        from: Rc<ScreenVisual>,
        to: Rc<ScreenVisual>,
    },
    /// 遮罩收尾：清除遮罩或把半径固定，始终以完成结束
    Mask {
        target: Rc<ScreenVisual>,
        clear: bool,
        pin_radius: f32,
    },
    /// 页面自定义的延续步骤
    Then(Continuation),
}

impl std::fmt::Debug for Settle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Settle::Slide { .. } => write!(f, "Settle::Slide"),
            Settle::Scale { .. } => write!(f, "Settle::Scale"),
            Settle::Mask { clear, .. } => write!(f, "Settle::Mask {{ clear: {clear} }}"),
            Settle::Then(_) => write!(f, "Settle::Then"),
        }
    }
}

impl Settle {
    pub(crate) fn run(
        self,
        driver: &mut TransitionDriver,
        ctx: &mut dyn TransitionContext,
    ) -> TransitionResult<()> {
        let cancelled = ctx.was_cancelled();
        match self {
            Settle::Slide { from, to } => {
                if cancelled {
                    from.set_offset_x(0.0);
                } else {
                    to.set_offset_x(0.0);
                }
                driver.complete(ctx, !cancelled)
            }
            Settle::Scale { from, to } => {
                if cancelled {
                    from.set_scale(1.0);
                    to.set_scale(1.0);
                } else {
                    to.set_scale(1.0);
                }
                driver.complete(ctx, !cancelled)
            }
            Settle::Mask {
                target,
                clear,
                pin_radius,
            } => {
                if clear {
                    target.clear_mask();
                } else if let Some(mask) = target.mask() {
                    target.set_mask(mask.center, pin_radius);
                }
                driver.complete(ctx, true)
            }
            Settle::Then(continuation) => continuation(driver, ctx),
        }
    }
}

/// 收尾步骤队列
pub(crate) type SettleQueue = VecDeque<Settle>;
