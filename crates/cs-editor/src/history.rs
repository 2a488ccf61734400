//! Undo/redo history.
//!
//! An append-only log of whole-document snapshots with a cursor pointing
//! at the entry that matches the live document. Undo and redo move the
//! cursor and hand back the snapshot to load; the caller replaces the
//! document wholesale.
//!
//! The log is **linear**: saving while the cursor sits before the last
//! entry discards the redo-future first.
//!
//! A command that emits several scene events runs inside a batch
//! (`begin_batch` / `end_batch`) so the whole command becomes one entry.
//! While a snapshot is being loaded the log is *suppressed*: the scene
//! events produced by the load must not be recorded as new edits.

/// Default number of entries kept before the oldest are trimmed.
pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
    max_depth: usize,
    suppressed: bool,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Whether the document changed during the current batch.
    batch_dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_depth: max_depth.max(1),
            suppressed: false,
            batch_depth: 0,
            batch_dirty: false,
        }
    }

    /// Drop every entry and start over from `snapshot`.
    pub fn reseed(&mut self, snapshot: String) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.cursor = 0;
        self.batch_dirty = false;
    }

    /// Append a snapshot and move the cursor to it.
    ///
    /// Does nothing when `skip` is set or the log is suppressed. Returns
    /// whether an entry was recorded.
    pub fn save(&mut self, snapshot: String, skip: bool) -> bool {
        if skip || self.suppressed {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        log::trace!("history: saved entry {} of {}", self.cursor, self.entries.len());
        true
    }

    // ─── Batching ────────────────────────────────────────────────────────

    /// Start grouping document changes into one entry.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// Close a batch. Returns true when the outermost batch closes after
    /// the document changed; the caller then saves one snapshot.
    pub fn end_batch(&mut self) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        std::mem::take(&mut self.batch_dirty)
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Note that the document changed. Returns true when the change should
    /// be saved right away, false when a batch will save it or the log is
    /// suppressed.
    pub fn note_change(&mut self) -> bool {
        if self.suppressed {
            return false;
        }
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return false;
        }
        true
    }

    // ─── Suppression ─────────────────────────────────────────────────────

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot `undo` would load, without moving the cursor.
    pub fn peek_undo(&self) -> Option<&str> {
        self.can_undo().then(|| self.entries[self.cursor - 1].as_str())
    }

    /// The snapshot `redo` would load, without moving the cursor.
    pub fn peek_redo(&self) -> Option<&str> {
        self.can_redo().then(|| self.entries[self.cursor + 1].as_str())
    }

    /// Step the cursor back and return the snapshot to load.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step the cursor forward and return the snapshot to load.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// The entry matching the live document.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
