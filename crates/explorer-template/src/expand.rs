/*
 * expand.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `for` loop expansion.
//!
//! Each `{% for item in collection %}...{% endfor %}` region is replaced by
//! its body repeated once per record of `collection`, in order, with every
//! `{{ item.property }}` substituted from the current record. Anything else
//! in the body is copied through for the interpolation stage. Loops inside a
//! loop body are copied through unexpanded, and inserted text is never
//! scanned again.

use tracing::trace;

use crate::context::{Record, TemplateContext, TemplateValue};
use crate::error::{TemplateError, TemplateResult};
use crate::lexer::{Token, TokenKind, matching_close, tokenize};
use crate::options::RenderOptions;

/// Expand every top-level `for` region in `text`.
///
/// # Errors
/// - [`TemplateError::MissingIterable`] if a loop's collection is not bound.
/// - [`TemplateError::NotIterable`] if it is bound to a scalar.
/// - [`TemplateError::UnresolvedVariable`] in strict mode, for an item
///   property missing from a record.
pub fn expand_loops(
    text: &str,
    context: &TemplateContext,
    options: &RenderOptions,
) -> TemplateResult<String> {
    let tokens = tokenize(text);
    let mut output = String::with_capacity(text.len());
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        if let TokenKind::ForOpen { item, collection } = token.kind {
            if let Some(close) = matching_close(&tokens, index) {
                let records = match context.get(collection) {
                    Some(TemplateValue::Sequence(records)) => records,
                    Some(TemplateValue::Scalar(_)) => {
                        return Err(TemplateError::NotIterable {
                            name: collection.to_string(),
                        });
                    }
                    None => {
                        return Err(TemplateError::MissingIterable {
                            name: collection.to_string(),
                        });
                    }
                };

                trace!(item, collection, count = records.len(), "expanding loop");
                let body = &tokens[index + 1..close];
                for record in records {
                    expand_body(&mut output, body, item, record, options)?;
                }
                index = close + 1;
                continue;
            }
        }
        output.push_str(token.raw);
        index += 1;
    }

    Ok(output)
}

fn expand_body(
    output: &mut String,
    body: &[Token<'_>],
    item: &str,
    record: &Record,
    options: &RenderOptions,
) -> TemplateResult<()> {
    for token in body {
        match token.kind {
            TokenKind::Variable {
                name,
                property: Some(property),
            } if name == item => match record.get(property) {
                Some(value) => output.push_str(value),
                None if options.strict => {
                    return Err(TemplateError::UnresolvedVariable {
                        name: format!("{name}.{property}"),
                    });
                }
                None => {}
            },
            _ => output.push_str(token.raw),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn items() -> TemplateContext {
        TemplateContext::new().with(
            "items",
            vec![record(&[("name", "a")]), record(&[("name", "b")])],
        )
    }

    fn expand(text: &str, ctx: &TemplateContext) -> TemplateResult<String> {
        expand_loops(text, ctx, &RenderOptions::default())
    }

    #[test]
    fn test_expands_in_order() {
        assert_eq!(
            expand("{% for x in items %}[{{ x.name }}]{% endfor %}", &items()).unwrap(),
            "[a][b]"
        );
    }

    #[test]
    fn test_empty_sequence() {
        let ctx = TemplateContext::new().with("items", Vec::<Record>::new());
        assert_eq!(
            expand("<ul>{% for x in items %}<li/>{% endfor %}</ul>", &ctx).unwrap(),
            "<ul></ul>"
        );
    }

    #[test]
    fn test_missing_property_is_blank() {
        let ctx = TemplateContext::new().with(
            "txs",
            vec![record(&[("hash", "ab"), ("fee", "1")]), record(&[("hash", "cd")])],
        );
        assert_eq!(
            expand("{% for tx in txs %}{{ tx.hash }}:{{ tx.fee }};{% endfor %}", &ctx).unwrap(),
            "ab:1;cd:;"
        );
    }

    #[test]
    fn test_missing_property_strict() {
        let ctx = TemplateContext::new().with("txs", vec![record(&[("hash", "ab")])]);
        let err = expand_loops(
            "{% for tx in txs %}{{ tx.fee }}{% endfor %}",
            &ctx,
            &RenderOptions::new().with_strict(true),
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::UnresolvedVariable { ref name } if name == "tx.fee"));
    }

    #[test]
    fn test_missing_iterable() {
        let err = expand("{% for x in nothing %}{% endfor %}", &items()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingIterable { ref name } if name == "nothing"));
    }

    #[test]
    fn test_scalar_is_not_iterable() {
        let ctx = TemplateContext::new().with("height", 10u64);
        let err = expand("{% for x in height %}{% endfor %}", &ctx).unwrap_err();
        assert!(matches!(err, TemplateError::NotIterable { .. }));
    }

    #[test]
    fn test_other_placeholders_pass_through() {
        let ctx = items().with("title", "T");
        assert_eq!(
            expand(
                "{% for x in items %}{{ title }}{{ y.name }}{{ x.name }}{% endfor %}",
                &ctx
            )
            .unwrap(),
            "{{ title }}{{ y.name }}a{{ title }}{{ y.name }}b"
        );
    }

    #[test]
    fn test_multiple_loops() {
        let ctx = items().with("more", vec![record(&[("id", "1")])]);
        assert_eq!(
            expand(
                "{% for x in items %}{{ x.name }}{% endfor %}-{% for m in more %}{{ m.id }}{% endfor %}",
                &ctx
            )
            .unwrap(),
            "ab-1"
        );
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let ctx = TemplateContext::new().with(
            "items",
            vec![record(&[("name", "{% for x in items %}{{ x.name }}{% endfor %}")])],
        );
        assert_eq!(
            expand("{% for x in items %}{{ x.name }}{% endfor %}", &ctx).unwrap(),
            "{% for x in items %}{{ x.name }}{% endfor %}"
        );
    }

    #[test]
    fn test_unbalanced_for_is_literal() {
        let text = "{% for x in missing %}never closed";
        assert_eq!(expand(text, &TemplateContext::new()).unwrap(), text);
    }
}
