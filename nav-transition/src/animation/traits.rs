//! # Traits 模块
//!
//! 动画系统与被动画对象之间的接口。

/// 已注册对象的句柄，由 `AnimationSystem::register` 分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 动画槽位：对象句柄 + 属性名
///
/// 同一槽位上启动新动画会顶替旧动画。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimPropertyKey {
    pub object_id: ObjectId,
    pub property_id: &'static str,
}

impl AnimPropertyKey {
    pub fn new(object_id: ObjectId, property_id: &'static str) -> Self {
        Self {
            object_id,
            property_id,
        }
    }
}

impl std::fmt::Display for AnimPropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.object_id, self.property_id)
    }
}

/// 可被动画驱动的对象
///
/// 属性以名称寻址、值均为 `f32`。动画系统只持有共享引用，
/// 实现方用 `Cell` / `RefCell` 保存可变状态。
///
/// 页面视觉（`ScreenVisual`）与演示中的封面都实现此接口。
pub trait Animatable: 'static {
    /// 属性不存在时返回 `None`
    fn get_property(&self, property_id: &str) -> Option<f32>;

    /// 属性不存在或当前不可写时返回 `false`
    fn set_property(&self, property_id: &str, value: f32) -> bool;

    fn property_list(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_identity() {
        let a = ObjectId::new(3);
        let b = ObjectId::new(4);

        assert_eq!(AnimPropertyKey::new(a, "scale"), AnimPropertyKey::new(a, "scale"));
        assert_ne!(AnimPropertyKey::new(a, "scale"), AnimPropertyKey::new(b, "scale"));
        assert_ne!(AnimPropertyKey::new(a, "scale"), AnimPropertyKey::new(a, "offset_x"));
        assert_eq!(AnimPropertyKey::new(a, "mask_radius").to_string(), "#3.mask_radius");
    }
}
