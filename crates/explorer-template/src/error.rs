/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template loading and rendering.

use thiserror::Error;

/// Errors that can occur while loading or rendering a template.
///
/// None of these escape [`TemplateRenderer::render`](crate::TemplateRenderer::render);
/// they surface only through the fallible `try_*` entry points and
/// [`TemplateStore::load`](crate::TemplateStore::load).
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The backing store could not produce the template source.
    #[error("Template not found: {name}")]
    TemplateNotFound {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A `for` loop names a collection that is not in the render context.
    #[error("Missing iterable in render context: {name}")]
    MissingIterable { name: String },

    /// A `for` loop names a collection that is bound to a scalar.
    #[error("Render context value is not a sequence: {name}")]
    NotIterable { name: String },

    /// A placeholder could not be resolved while rendering in strict mode.
    #[error("Unresolved variable: {name}")]
    UnresolvedVariable { name: String },

    /// The render context could not be built from the supplied data.
    #[error("Invalid render context: {message}")]
    InvalidContext { message: String },
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
