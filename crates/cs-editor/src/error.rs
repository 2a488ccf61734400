use cs_core::DecodeError;

/// Errors surfaced by the editor's command surface.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A document handed to `load_json` / `restore_json` could not be used.
    /// The live document is left untouched.
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] DecodeError),
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    /// The render surface could not capture pixels for an export.
    #[error("capture failed: {0}")]
    Capture(String),
    /// `finish_image_load` was called with a handle that is not pending.
    #[error("no pending image load with handle {0}")]
    UnknownImageRequest(u64),
}

/// Why an image could not be loaded. Reported by the host; the editor
/// logs it and adds nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetLoadError {
    #[error("network error: {0}")]
    Network(String),
    #[error("image could not be decoded")]
    Decode,
    #[error("cross-origin access denied")]
    CrossOrigin,
}
