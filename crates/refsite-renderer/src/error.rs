//! Render errors.

/// Non-fatal rendering problem.
///
/// Rendering always produces a document; these are collected as warnings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No grammar for the language tag; the code was rendered as plain text.
    #[error("Unknown language \"{tag}\", rendered as plain text")]
    UnknownLanguage { tag: String },
}
