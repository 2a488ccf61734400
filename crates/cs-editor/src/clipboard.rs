//! In-memory clipboard with cascading paste.

use cs_core::{DrawableObject, SceneDocument};

/// Distance each paste is shifted from the previous one.
pub const PASTE_OFFSET: f64 = 10.0;

#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    slot: Vec<DrawableObject>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with copies of `objects`.
    pub fn copy<'a>(&mut self, objects: impl IntoIterator<Item = &'a DrawableObject>) {
        self.slot = objects.into_iter().cloned().collect();
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    /// Clones of the slot, each offset one step further than the last paste
    /// and given an id unused in `doc`.
    pub fn paste(&mut self, doc: &SceneDocument) -> Vec<DrawableObject> {
        self.slot
            .iter_mut()
            .map(|obj| {
                obj.left += PASTE_OFFSET;
                obj.top += PASTE_OFFSET;
                let mut clone = obj.clone();
                clone.id = doc.fresh_id(obj.kind.type_name());
                clone
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{ObjectId, ObjectKind};

    #[test]
    fn pastes_cascade() {
        let doc = SceneDocument::default();
        let mut original = DrawableObject::new(
            ObjectId::intern("clip_src"),
            ObjectKind::Rect {
                width: 10.0,
                height: 10.0,
            },
        );
        original.left = 100.0;
        original.top = 50.0;

        let mut clipboard = Clipboard::new();
        assert!(clipboard.paste(&doc).is_empty());
        clipboard.copy([&original]);

        let first = clipboard.paste(&doc);
        let second = clipboard.paste(&doc);
        assert_eq!((first[0].left, first[0].top), (110.0, 60.0));
        assert_eq!((second[0].left, second[0].top), (120.0, 70.0));
        assert_ne!(first[0].id, original.id);
        assert_ne!(first[0].id, second[0].id);
    }
}
