/*
 * renderer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The render pipeline.
//!
//! ```text
//! load(child) -> [extends? load(base) -> extract blocks -> merge]
//!             -> expand loops -> interpolate
//! ```
//!
//! [`TemplateRenderer::render`] is the recovery boundary for the web front
//! end: any error from the pipeline is logged and turned into a small HTML
//! fragment naming the template, so a broken template never takes down the
//! request that asked for it.

use std::borrow::Cow;

use tracing::{debug, error};

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::expand::expand_loops;
use crate::inherit::{extract_blocks, find_extends, merge_blocks};
use crate::interpolate::interpolate;
use crate::loader::TemplateStore;
use crate::options::RenderOptions;

/// Renders named templates from a [`TemplateStore`].
///
/// The renderer is `Send + Sync`; wrap it in an `Arc` to share one cache
/// between concurrent requests.
#[derive(Debug)]
pub struct TemplateRenderer {
    store: TemplateStore,
    options: RenderOptions,
}

impl TemplateRenderer {
    /// Create a renderer with default (lenient) options.
    pub fn new(store: TemplateStore) -> Self {
        Self {
            store,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The underlying template cache.
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Render `name` with `context`, falling back to [`fallback_html`] on
    /// any error.
    pub fn render(&self, name: &str, context: &TemplateContext) -> String {
        self.try_render(name, context)
            .unwrap_or_else(|err| recover(name, &err))
    }

    /// Run the full pipeline: inheritance, loops, then variables.
    pub fn try_render(&self, name: &str, context: &TemplateContext) -> TemplateResult<String> {
        let source = self.store.load(name)?;

        let merged = match find_extends(&source) {
            Some(base_name) => {
                debug!(template = name, base = base_name, "merging into base template");
                let base = self.store.load(base_name)?;
                let blocks = extract_blocks(&source);
                Cow::Owned(merge_blocks(&base, &blocks))
            }
            None => Cow::Borrowed(&*source),
        };

        let expanded = expand_loops(&merged, context, &self.options)?;
        interpolate(&expanded, context, &self.options)
    }

    /// Render `name` with variable interpolation only.
    ///
    /// `extends`, `block` and `for` markup is left untouched. Falls back to
    /// [`fallback_html`] on any error.
    pub fn render_direct(&self, name: &str, context: &TemplateContext) -> String {
        self.try_render_direct(name, context)
            .unwrap_or_else(|err| recover(name, &err))
    }

    pub fn try_render_direct(
        &self,
        name: &str,
        context: &TemplateContext,
    ) -> TemplateResult<String> {
        let source = self.store.load(name)?;
        interpolate(&source, context, &self.options)
    }
}

/// The fragment returned in place of a template that failed to render.
pub fn fallback_html(name: &str) -> String {
    format!("<h1>Template Error</h1><p>Could not render template: {name}</p>")
}

fn recover(name: &str, err: &TemplateError) -> String {
    error!(template = name, error = %err, "failed to render template");
    fallback_html(name)
}
