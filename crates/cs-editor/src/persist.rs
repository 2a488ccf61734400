//! Debounced persistence.
//!
//! Saves are coalesced: every `schedule` replaces the pending payload and
//! re-arms the deadline, so a burst of edits produces one write after the
//! quiet period. The host drives time by calling `poll` (the editor's
//! `tick`) with the current clock reading.

use cs_core::SceneDocument;
use serde::Serialize;
use std::cell::{Cell, OnceCell};
use std::rc::Rc;
use std::time::Instant;

/// Default quiet period before a scheduled save fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

// ─── Clock ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from the first reading.
///
/// The start instant is taken on first use. `Instant` is unavailable on
/// `wasm32-unknown-unknown`; hosts there install their own clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    start: OnceCell<Instant>,
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.get_or_init(Instant::now).elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ─── Payload & sink ──────────────────────────────────────────────────────

/// What the persistence callback receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload {
    pub json: String,
    pub height: f64,
    pub width: f64,
}

impl SavePayload {
    pub fn from_document(doc: &SceneDocument) -> Result<Self, serde_json::Error> {
        Ok(Self::with_json(cs_core::to_json(doc)?, doc))
    }

    /// Build a payload around an already-encoded snapshot of `doc`.
    pub fn with_json(json: String, doc: &SceneDocument) -> Self {
        let size = doc.workspace().kind.size();
        Self {
            json,
            height: size.height,
            width: size.width,
        }
    }
}

pub trait SaveSink {
    fn save(&mut self, payload: SavePayload);
}

impl<F: FnMut(SavePayload)> SaveSink for F {
    fn save(&mut self, payload: SavePayload) {
        self(payload)
    }
}

// ─── Debouncer ───────────────────────────────────────────────────────────

pub struct DebouncedSaver {
    delay_ms: u64,
    pending: Option<(u64, SavePayload)>,
    sink: Box<dyn SaveSink>,
}

impl DebouncedSaver {
    pub fn new(delay_ms: u64, sink: Box<dyn SaveSink>) -> Self {
        Self {
            delay_ms,
            pending: None,
            sink,
        }
    }

    /// Replace any pending payload and push the deadline to `now + delay`.
    pub fn schedule(&mut self, payload: SavePayload, now: u64) {
        self.pending = Some((now + self.delay_ms, payload));
    }

    /// Fire the pending save if its deadline has passed.
    pub fn poll(&mut self, now: u64) -> bool {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.flush()
        } else {
            false
        }
    }

    /// Fire the pending save immediately.
    pub fn flush(&mut self) -> bool {
        let Some((_, payload)) = self.pending.take() else {
            return false;
        };
        log::debug!("persisting document ({} bytes)", payload.json.len());
        self.sink.save(payload);
        true
    }

    /// Drop the pending save. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(d, _)| *d)
    }

    pub fn set_sink(&mut self, sink: Box<dyn SaveSink>) {
        self.sink = sink;
    }
}

impl Default for DebouncedSaver {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS, Box::new(|_: SavePayload| {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn payload(json: &str) -> SavePayload {
        SavePayload {
            json: json.into(),
            height: 1200.0,
            width: 900.0,
        }
    }

    fn recording() -> (DebouncedSaver, Rc<RefCell<Vec<String>>>) {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&saved);
        let saver = DebouncedSaver::new(
            500,
            Box::new(move |p: SavePayload| sink.borrow_mut().push(p.json)),
        );
        (saver, saved)
    }

    #[test]
    fn burst_coalesces_into_last_payload() {
        let (mut saver, saved) = recording();
        saver.schedule(payload("a"), 0);
        saver.schedule(payload("b"), 300);
        assert!(!saver.poll(700));
        saver.schedule(payload("c"), 700);
        assert!(!saver.poll(1100));
        assert!(saver.poll(1200));
        assert_eq!(*saved.borrow(), ["c"]);
        assert!(!saver.is_pending());
    }

    #[test]
    fn flush_and_cancel() {
        let (mut saver, saved) = recording();
        saver.schedule(payload("a"), 0);
        assert!(saver.cancel());
        assert!(!saver.flush());
        saver.schedule(payload("b"), 0);
        assert_eq!(saver.deadline(), Some(500));
        assert!(saver.flush());
        assert_eq!(*saved.borrow(), ["b"]);
    }

    #[test]
    fn payload_reports_workspace_size() {
        let doc = SceneDocument::new(640.0, 480.0, cs_core::Color::WHITE);
        let p = SavePayload::from_document(&doc).unwrap();
        assert_eq!((p.width, p.height), (640.0, 480.0));
        assert!(p.json.contains("\"clip\""));
    }

    #[test]
    fn manual_clock_is_shared() {
        let clock = ManualClock::new();
        let view = clock.clone();
        clock.advance(250);
        assert_eq!(view.now_ms(), 250);
    }
}
