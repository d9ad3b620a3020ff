/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template rendering engine for the block explorer web front end.
//!
//! The template language is deliberately small:
//!
//! - Single-level inheritance: `{% extends "base" %}` in a child template,
//!   with `{% block name %}...{% endblock %}` regions overridden by name
//! - Loops over sequences of records: `{% for tx in txs %}...{% endfor %}`,
//!   with `{{ tx.hash }}` referring to a property of the current record
//! - Variable interpolation: `{{ name }}`
//!
//! There are no expressions, filters or escaping. Markup that does not match
//! the grammar is copied to the output as written, and placeholders that
//! cannot be resolved are left in place unless [`RenderOptions::strict`] is
//! set.
//!
//! # Architecture
//!
//! Each render runs a fixed pipeline over template text, with every stage
//! working from the same [`lexer`] token stream:
//!
//! 1. [`TemplateStore`] loads (and caches) the named template
//! 2. [`inherit`] resolves `extends` and merges blocks into the base
//! 3. [`expand`] materializes `for` loops
//! 4. [`interpolate`](mod@interpolate) substitutes scalar variables
//!
//! # Example
//!
//! ```ignore
//! use explorer_template::{FileSystemLoader, TemplateContext, TemplateRenderer, TemplateStore};
//!
//! let renderer = TemplateRenderer::new(TemplateStore::new(FileSystemLoader::new("templates")));
//!
//! let ctx = TemplateContext::new().with("title", "Latest blocks");
//! let html = renderer.render("index", &ctx);
//! ```

pub mod context;
pub mod error;
pub mod expand;
pub mod inherit;
pub mod interpolate;
pub mod lexer;
pub mod loader;
pub mod options;
pub mod renderer;

// Re-export main types at crate root
pub use context::{Record, TemplateContext, TemplateValue};
pub use error::{TemplateError, TemplateResult};
pub use inherit::BlockTable;
pub use loader::{FileSystemLoader, MemoryLoader, TemplateLoader, TemplateStore};
pub use options::RenderOptions;
pub use renderer::{TemplateRenderer, fallback_html};
