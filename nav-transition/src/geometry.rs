//! # Geometry 模块
//!
//! 几何类型与圆形遮罩半径求解。
//!
//! 遮罩动画需要两个半径：
//! - `min`: 起点圆（与原点矩形同尺度的小圆）
//! - `max`: 能完整覆盖视图的大圆
//!
//! 求解按 `arc_center` 相对 `view_center` 所在象限选取角点：
//!
//! ```text
//! 象限 1: min → (0, 0)   max → (w, h)
//! 象限 2: min → (w, 0)   max → (0, h)
//! 象限 3: min → (0, h)   max → (w, 0)
//! 象限 4: min → (w, h)   max → (0, 0)
//! ```

use serde::{Deserialize, Serialize};

/// 二维点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 到另一点的欧氏距离
    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 尺寸
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 矩形（原点 + 尺寸）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// 以 `center` 为中心构造矩形
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self {
            origin: Point::new(
                center.x - size.width / 2.0,
                center.y - size.height / 2.0,
            ),
            size,
        }
    }

    /// 铺满 `size` 的矩形
    pub fn from_size(size: Size) -> Self {
        Self {
            origin: Point::default(),
            size,
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }
}

/// `arc_center` 相对视图中心所在的象限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// 左上（含边界）
    First,
    /// 右上
    Second,
    /// 左下
    Third,
    /// 其余位置
    Fourth,
}

impl Quadrant {
    /// 判定象限
    ///
    /// 判定顺序固定：1 → 2 → 3 → 4，边界点落入先命中的象限。
    pub fn locate(arc_center: Point, view_center: Point) -> Self {
        let (x, y) = (arc_center.x, arc_center.y);
        let (cx, cy) = (view_center.x, view_center.y);

        if x <= cx && y <= cy {
            Quadrant::First
        } else if x > cx && y < cy {
            Quadrant::Second
        } else if x < cx && y > cy {
            Quadrant::Third
        } else {
            Quadrant::Fourth
        }
    }

    /// 最近角点与最远角点（相对 bounds 左上角）
    fn corners(self, bounds: Size) -> (Point, Point) {
        let (w, h) = (bounds.width, bounds.height);
        match self {
            Quadrant::First => (Point::new(0.0, 0.0), Point::new(w, h)),
            Quadrant::Second => (Point::new(w, 0.0), Point::new(0.0, h)),
            Quadrant::Third => (Point::new(0.0, h), Point::new(w, 0.0)),
            Quadrant::Fourth => (Point::new(w, h), Point::new(0.0, 0.0)),
        }
    }
}

/// 遮罩动画的两个半径
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskRadii {
    pub min: f32,
    pub max: f32,
}

/// 计算圆形遮罩的最小 / 最大半径
///
/// # 参数
/// - `origin`: 遮罩起点矩形，圆心取其中点
/// - `view_center`: 目标视图中心，用于判定象限
/// - `bounds`: 被遮罩视图的尺寸
pub fn mask_radii(origin: Rect, view_center: Point, bounds: Size) -> MaskRadii {
    let arc_center = origin.center();
    let (near, far) = Quadrant::locate(arc_center, view_center).corners(bounds);

    let max = arc_center.distance_to(far);
    let min = arc_center
        .distance_to(near)
        .min(origin.width() / 2.0)
        .min(origin.height() / 2.0)
        .min(max)
        .max(0.0);

    MaskRadii { min, max }
}
