//! Object identifiers.
//!
//! Ids are interned in one process-wide table, so an `ObjectId` is `Copy`
//! and compares as an integer. Generated ids read `{type}_{serial}`; the
//! serial belongs to the document handing them out
//! (`SceneDocument::fresh_id`), not to the process.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::LazyLock;

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of a drawable object, written as the `id` string of the
/// document encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub struct ObjectId(Spur);

impl ObjectId {
    pub fn intern(s: &str) -> Self {
        ObjectId(IDS.get_or_intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        IDS.resolve(&self.0)
    }

    /// `{prefix}_{serial}`, e.g. `circle_4`.
    pub fn numbered(prefix: &str, serial: u64) -> Self {
        Self::intern(&format!("{prefix}_{serial}"))
    }

    /// The serial of a `{prefix}_{n}` id, if this is one.
    pub fn serial(&self, prefix: &str) -> Option<u64> {
        self.as_str()
            .strip_prefix(prefix)?
            .strip_prefix('_')?
            .parse()
            .ok()
    }

    /// Placeholder for objects decoded without an id.
    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        ObjectId::intern(&s)
    }
}

impl From<ObjectId> for &'static str {
    fn from(id: ObjectId) -> Self {
        id.as_str()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last serial a document handed out.
///
/// Bookkeeping only: two documents with the same content are equal
/// whatever their serials.
#[derive(Debug, Clone, Default)]
pub struct IdSerial(Cell<u64>);

impl IdSerial {
    pub fn next(&self) -> u64 {
        let n = self.0.get() + 1;
        self.0.set(n);
        n
    }

    /// Make sure later serials stay above `floor`.
    pub fn raise_to(&self, floor: u64) {
        if self.0.get() < floor {
            self.0.set(floor);
        }
    }
}

impl PartialEq for IdSerial {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
