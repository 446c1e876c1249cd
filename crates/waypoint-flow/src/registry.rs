#![forbid(unsafe_code)]

//! Target frame registry.
//!
//! The host reports each target's on-screen rectangle on every layout pass.
//! Registration is an upsert: the last write for a key wins and nothing is
//! merged. Re-registering an existing key reuses its stored string, so the
//! steady state performs no allocation. Change detection compares bit
//! patterns, so a frame holding NaN is unchanged when re-registered as is.

use ahash::AHashMap;
use waypoint_geometry::Rect;

#[derive(Debug, Clone, Default)]
pub struct FrameRegistry {
    frames: AHashMap<String, Rect>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rect` for `key`. Returns `true` when the stored value changed.
    pub fn upsert(&mut self, key: &str, rect: Rect) -> bool {
        if let Some(slot) = self.frames.get_mut(key) {
            if same_bits(slot, &rect) {
                return false;
            }
            *slot = rect;
            return true;
        }
        self.frames.insert(key.to_owned(), rect);
        true
    }

    pub fn get(&self, key: &str) -> Option<Rect> {
        self.frames.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.frames.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Rect> {
        self.frames.remove(key)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.frames.iter().map(|(key, rect)| (key.as_str(), *rect))
    }
}

fn same_bits(a: &Rect, b: &Rect) -> bool {
    a.x.to_bits() == b.x.to_bits()
        && a.y.to_bits() == b.y.to_bits()
        && a.width.to_bits() == b.width.to_bits()
        && a.height.to_bits() == b.height.to_bits()
}
