//! Selection tracking.
//!
//! Mirrors the renderer's selection events: *created* and *updated* replace
//! the set, *cleared* empties it and fires the clear callback the host
//! registered (the UI uses it to close selection-dependent panels).

use cs_core::{ObjectId, SceneDocument};
use smallvec::SmallVec;
use std::fmt;

pub type ClearCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Created(Vec<ObjectId>),
    Updated(Vec<ObjectId>),
    Cleared,
}

#[derive(Default)]
pub struct Selection {
    ids: SmallVec<[ObjectId; 4]>,
    on_clear: Option<ClearCallback>,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("ids", &self.ids)
            .field("on_clear", &self.on_clear.is_some())
            .finish()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clear_callback(&mut self, callback: ClearCallback) {
        self.on_clear = Some(callback);
    }

    pub fn handle(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::Created(ids) | SelectionEvent::Updated(ids) => self.replace(ids),
            SelectionEvent::Cleared => self.clear(),
        }
    }

    /// Replace the selection, dropping duplicate ids.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Empty the selection and fire the clear callback.
    pub fn clear(&mut self) {
        self.ids.clear();
        if let Some(cb) = self.on_clear.as_mut() {
            cb();
        }
    }

    /// Drop ids that no longer name a selectable object in `doc`. Fires
    /// the clear callback if this empties a non-empty selection.
    pub fn retain_existing(&mut self, doc: &SceneDocument) {
        if self.ids.is_empty() {
            return;
        }
        self.ids
            .retain(|id| doc.get(*id).is_some_and(|obj| obj.selectable));
        if self.ids.is_empty() {
            self.clear();
        }
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn first(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
