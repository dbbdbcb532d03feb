//! # System 模块
//!
//! 每个转场驱动器持有一个独立的 `AnimationSystem`，按帧推进并把插值写回对象。
//!
//! ```rust,ignore
//! let handle = system.register(visual.clone());
//! system.animate_object::<ScreenVisual>(handle, "scale", 0.1, 1.0, 0.25, easing)?;
//! system.update(dt);
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

use super::traits::{AnimPropertyKey, Animatable, ObjectId};
use super::{Animation, AnimationEvent, AnimationId, EasingFunction, PlayDirection};
use crate::error::AnimationError;

struct Entry {
    object: Rc<dyn Animatable>,
    type_id: TypeId,
}

/// 转场时间轴
///
/// 交互式转场期间整组动画一起暂停、拨动、继续或倒放，
/// 所以这里的控制接口都是面向全体的。
#[derive(Default)]
pub struct AnimationSystem {
    registry: HashMap<ObjectId, Entry>,
    /// 每个槽位最多一条动画
    tracks: HashMap<AnimPropertyKey, Animation>,
    /// 对象句柄与动画句柄共用
    last_id: u64,
    /// 下一次 `update` 一并返回
    pending: Vec<AnimationEvent>,
}

impl std::fmt::Debug for AnimationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSystem")
            .field("registered", &self.registry.len())
            .field("tracks", &self.tracks.len())
            .finish_non_exhaustive()
    }
}

impl AnimationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// 注册对象，同一对象重复注册会得到不同句柄
    pub fn register<T: Animatable>(&mut self, object: Rc<T>) -> ObjectId {
        let handle = ObjectId::new(self.bump_id());
        let entry = Entry {
            object,
            type_id: TypeId::of::<T>(),
        };
        self.registry.insert(handle, entry);
        handle
    }

    /// 在对象属性上启动动画
    ///
    /// `T` 必须与注册时的类型一致。起始值立即写回，
    /// 同一槽位上的旧动画被直接替换，不产生事件。
    pub fn animate_object<T: 'static>(
        &mut self,
        object_id: ObjectId,
        property_id: &'static str,
        from: f32,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> Result<AnimationId, AnimationError> {
        let Some(entry) = self.registry.get(&object_id) else {
            return Err(AnimationError::NotRegistered { object: object_id });
        };
        if entry.type_id != TypeId::of::<T>() {
            return Err(AnimationError::TypeMismatch { object: object_id });
        }
        if !entry.object.set_property(property_id, from) {
            return Err(AnimationError::UnknownProperty {
                object: object_id,
                property: property_id,
            });
        }

        let id = AnimationId::new(self.bump_id());
        self.tracks.insert(
            AnimPropertyKey::new(object_id, property_id),
            Animation::new(id, from, to, duration).with_easing(easing),
        );
        self.pending.push(AnimationEvent::Started(id));
        Ok(id)
    }

    /// 推进一帧，返回自上次调用以来积累的事件
    ///
    /// 结束的动画在同一帧内写回终值后移除。
    pub fn update(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let registry = &self.registry;
        let pending = &mut self.pending;

        self.tracks.retain(|key, animation| {
            animation.update(dt);
            apply(registry, key, animation);
            if !animation.is_finished() {
                return true;
            }
            pending.push(match animation.direction {
                PlayDirection::Forward => AnimationEvent::Completed(animation.id),
                PlayDirection::Reverse => AnimationEvent::Reversed(animation.id),
            });
            false
        });

        std::mem::take(&mut self.pending)
    }

    pub fn pause_all(&mut self) {
        self.tracks.values_mut().for_each(Animation::pause);
    }

    /// 把所有动画拨到同一时间比例，并立即写回对象
    pub fn seek_all(&mut self, fraction: f32) {
        for (key, animation) in self.tracks.iter_mut() {
            animation.seek(fraction);
            apply(&self.registry, key, animation);
        }
    }

    /// 从当前进度继续正向播放
    pub fn resume_all(&mut self) {
        self.tracks.values_mut().for_each(Animation::resume);
    }

    /// 从当前进度倒放回起点
    pub fn reverse_all(&mut self) {
        self.tracks.values_mut().for_each(Animation::reverse);
    }

    /// 暂停中的动画也算
    pub fn has_active_animations(&self) -> bool {
        self.tracks.values().any(Animation::is_active)
    }

    /// 丢弃全部动画与未取走的事件，注册表保留
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.pending.clear();
    }
}

fn apply(registry: &HashMap<ObjectId, Entry>, key: &AnimPropertyKey, animation: &Animation) {
    if let Some(entry) = registry.get(&key.object_id) {
        entry
            .object
            .set_property(key.property_id, animation.current_value());
    }
}
