//! Lint diagnostics for scene documents.
//!
//! Reports suspicious content without modifying the document. The editor
//! logs findings after a document is loaded.

use crate::id::ObjectId;
use crate::model::{DrawableObject, ObjectKind, SceneDocument};
use std::collections::HashSet;
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for an object.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub object_id: ObjectId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "empty-text", "opacity-range").
    pub rule: &'static str,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &SceneDocument) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(doc, &mut diags);
    for obj in doc.objects() {
        lint_opacity(obj, &mut diags);
        lint_empty_text(obj, &mut diags);
        lint_zero_size(obj, &mut diags);
        lint_image_source(obj, &mut diags);
    }
    lint_off_workspace(doc, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn push(
    diags: &mut Vec<LintDiagnostic>,
    obj: &DrawableObject,
    rule: &'static str,
    severity: LintSeverity,
    message: String,
) {
    diags.push(LintDiagnostic {
        object_id: obj.id,
        message,
        severity,
        rule,
    });
}

/// Two objects sharing an id makes selection ambiguous.
fn lint_duplicate_ids(doc: &SceneDocument, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    seen.insert(doc.workspace().id);
    for obj in doc.objects() {
        if !seen.insert(obj.id) {
            push(
                diags,
                obj,
                "duplicate-id",
                LintSeverity::Warning,
                format!("Id `{}` is used by more than one object.", obj.id),
            );
        }
    }
}

fn lint_opacity(obj: &DrawableObject, diags: &mut Vec<LintDiagnostic>) {
    if !(0.0..=1.0).contains(&obj.opacity) {
        push(
            diags,
            obj,
            "opacity-range",
            LintSeverity::Warning,
            format!("`{}` has opacity {} outside 0..1.", obj.id, obj.opacity),
        );
    }
}

fn lint_empty_text(obj: &DrawableObject, diags: &mut Vec<LintDiagnostic>) {
    if let ObjectKind::Textbox { text, .. } = &obj.kind
        && text.trim().is_empty()
    {
        push(
            diags,
            obj,
            "empty-text",
            LintSeverity::Info,
            format!("Text box `{}` has no visible text.", obj.id),
        );
    }
}

fn lint_zero_size(obj: &DrawableObject, diags: &mut Vec<LintDiagnostic>) {
    // Paths are measured from their commands; an empty one is caught here too.
    let size = obj.scaled_size();
    if size.width <= 0.0 || size.height <= 0.0 {
        push(
            diags,
            obj,
            "zero-size",
            LintSeverity::Warning,
            format!("`{}` has no visible area.", obj.id),
        );
    }
}

fn lint_image_source(obj: &DrawableObject, diags: &mut Vec<LintDiagnostic>) {
    if let ObjectKind::Image { src, .. } = &obj.kind
        && src.trim().is_empty()
    {
        push(
            diags,
            obj,
            "image-src-empty",
            LintSeverity::Warning,
            format!("Image `{}` has an empty source.", obj.id),
        );
    }
}

/// Objects entirely outside the workspace are clipped away on export.
fn lint_off_workspace(doc: &SceneDocument, diags: &mut Vec<LintDiagnostic>) {
    let ws = doc.workspace_rect();
    for obj in doc.objects() {
        if obj.bounds().intersect(ws).area() <= 0.0 && obj.scaled_size().area() > 0.0 {
            push(
                diags,
                obj,
                "off-workspace",
                LintSeverity::Info,
                format!("`{}` lies outside the workspace and will not be exported.", obj.id),
            );
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
