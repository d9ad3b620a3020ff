/*
 * interpolate.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable interpolation.
//!
//! Replaces `{{ name }}` placeholders with scalar values from the render
//! context. Placeholders that cannot be resolved (unbound names, names bound
//! to sequences, dotted paths outside a loop) are left in the output as they
//! were written, unless strict mode is on.

use tracing::trace;

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::lexer::{TokenKind, tokenize};
use crate::options::RenderOptions;

/// Substitute every resolvable `{{ name }}` in `text`.
///
/// # Errors
/// [`TemplateError::UnresolvedVariable`] in strict mode, for the first
/// placeholder that cannot be resolved.
pub fn interpolate(
    text: &str,
    context: &TemplateContext,
    options: &RenderOptions,
) -> TemplateResult<String> {
    let mut output = String::with_capacity(text.len());

    for token in tokenize(text) {
        let TokenKind::Variable { name, property } = token.kind else {
            output.push_str(token.raw);
            continue;
        };

        match (property, context.scalar(name)) {
            (None, Some(value)) => output.push_str(value),
            _ if options.strict => {
                let name = match property {
                    Some(property) => format!("{name}.{property}"),
                    None => name.to_string(),
                };
                return Err(TemplateError::UnresolvedVariable { name });
            }
            _ => {
                trace!(placeholder = token.raw, "leaving unresolved placeholder");
                output.push_str(token.raw);
            }
        }
    }

    Ok(output)
}
