//! # Nav Demo
//!
//! 无窗口的转场演示宿主，以固定帧步长驱动导航栈并记录每一次转场。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p nav-demo
//! cargo run -p nav-demo -- --config config/transition.json --fps 30 --verbose
//! ```
//!
//! ## 演示流程
//!
//! 1. 首页 → 详情页（整体缩放）
//! 2. 详情页 → 大图页（以封面为起点的遮罩展开）
//! 3. 大图页上短距离拖动（交互式返回被取消）
//! 4. 大图页 → 详情页（封面归位后收起遮罩）
//! 5. 详情页上长距离拖动（交互式缩放返回完成）

mod screens;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use nav_transition::{GestureEvent, NavigationController, Rect, Size, TransitionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use screens::{DetailScreen, HomeScreen, LargeImageScreen};

/// 单次转场允许的最长模拟时间（秒）
const MAX_TRANSITION_SECONDS: f32 = 10.0;
/// 拖动手势拆分的帧数
const SWIPE_FRAMES: u32 = 12;
/// 手势起点（靠近左边缘）
const SWIPE_START_X: f32 = 12.0;

#[derive(Parser, Debug)]
#[command(name = "nav-demo")]
#[command(about = "导航转场演示 - 以固定帧步长运行 push / pop / 交互式返回")]
#[command(version)]
struct Args {
    /// 转场配置文件（JSON），缺省使用默认配置
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 容器宽度
    #[arg(long, default_value_t = 400.0)]
    width: f32,

    /// 容器高度
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// 模拟帧率
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// 输出 debug 级别日志
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.width <= 0.0 || args.height <= 0.0 {
        anyhow::bail!("容器尺寸必须为正: {}x{}", args.width, args.height);
    }

    let config = match &args.config {
        Some(path) => TransitionConfig::load(path),
        None => TransitionConfig::default(),
    };
    let surface = Size::new(args.width, args.height);
    let frame = Rect::from_size(surface);
    let dt = 1.0 / args.fps.max(1) as f32;

    info!(width = surface.width, height = surface.height, fps = args.fps, "演示开始");

    let mut nav = NavigationController::new(config, surface);
    nav.push_screen(Rc::new(HomeScreen::new(frame)))?;

    let detail = Rc::new(DetailScreen::new(frame));
    nav.push_screen(detail.clone())?;
    nav.attach_gesture_handling(&*detail);
    run_until_idle(&mut nav, dt).context("push 详情页")?;
    report(&nav, "首页 → 详情页");

    let large = Rc::new(LargeImageScreen::new(frame));
    nav.push_screen(large.clone())?;
    nav.attach_gesture_handling(&*large);
    run_until_idle(&mut nav, dt).context("push 大图页")?;
    report(&nav, "详情页 → 大图页");

    swipe(&mut nav, dt, surface.width * 0.05)?;
    run_until_idle(&mut nav, dt).context("取消交互式返回")?;
    report(&nav, "短距离拖动");

    nav.pop_screen()?;
    run_until_idle(&mut nav, dt).context("pop 大图页")?;
    info!(
        cover = ?large.cover().center(),
        detail_cover = ?detail.cover().center(),
        "封面位置"
    );
    report(&nav, "大图页 → 详情页");

    swipe(&mut nav, dt, surface.width * 0.6)?;
    run_until_idle(&mut nav, dt).context("完成交互式返回")?;
    report(&nav, "长距离拖动");

    info!("演示结束");
    Ok(())
}

/// 推进帧直到没有进行中的转场
fn run_until_idle(nav: &mut NavigationController, dt: f32) -> anyhow::Result<u32> {
    let max_frames = (MAX_TRANSITION_SECONDS / dt).ceil() as u32;
    let mut frames = 0;

    while nav.is_transitioning() {
        if frames >= max_frames {
            anyhow::bail!("转场超过 {MAX_TRANSITION_SECONDS} 秒仍未结束");
        }
        nav.update(dt)?;
        frames += 1;
    }

    Ok(frames)
}

/// 模拟一次从左边缘开始的拖动
fn swipe(nav: &mut NavigationController, dt: f32, distance: f32) -> anyhow::Result<()> {
    let action = nav.handle_gesture(GestureEvent::began(SWIPE_START_X))?;
    info!(action = ?action, distance = distance, "拖动开始");

    for frame in 1..=SWIPE_FRAMES {
        let translation = distance * frame as f32 / SWIPE_FRAMES as f32;
        nav.handle_gesture(GestureEvent::changed(translation, SWIPE_START_X + translation))?;
        nav.update(dt)?;
    }

    let action = nav.handle_gesture(GestureEvent::ended(distance, SWIPE_START_X + distance))?;
    info!(action = ?action, "拖动结束");
    Ok(())
}

fn report(nav: &NavigationController, step: &str) {
    let names: Vec<&str> = nav.current_screens().iter().map(|s| s.name()).collect();
    info!(step = step, stack = ?names, "导航栈");
}
