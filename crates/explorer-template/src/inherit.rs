/*
 * inherit.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Single-level template inheritance.
//!
//! A child template names its base with `{% extends "base" %}` and overrides
//! regions of the base declared as `{% block name %}...{% endblock %}`. The
//! rendered result is the base text with every block replaced by the child's
//! version of it, or removed when the child does not define that block. Text
//! in the child outside of its blocks is not part of the output.

use std::collections::HashMap;

use tracing::trace;

use crate::lexer::{TokenKind, matching_close, tokenize};

/// The base template named by the first `{% extends "..." %}` directive.
///
/// Malformed directives are not recognized and stay in the text as literals.
pub fn find_extends(source: &str) -> Option<&str> {
    tokenize(source).into_iter().find_map(|token| match token.kind {
        TokenKind::Extends { name } => Some(name),
        _ => None,
    })
}

/// Block bodies declared by a child template, keyed by block name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTable {
    blocks: HashMap<String, String>,
}

impl BlockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body for `name`, replacing any earlier declaration.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.blocks.insert(name.into(), body.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.blocks.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Collect every balanced `{% block %}` region in `source`.
///
/// Bodies are stored raw and trimmed. When a name is declared more than once
/// the declaration that opens last wins.
pub fn extract_blocks(source: &str) -> BlockTable {
    let tokens = tokenize(source);
    let mut table = BlockTable::new();

    for (index, token) in tokens.iter().enumerate() {
        let TokenKind::BlockOpen { name } = token.kind else {
            continue;
        };
        if let Some(close) = matching_close(&tokens, index) {
            let body = &source[token.end()..tokens[close].offset];
            table.insert(name, body.trim());
        }
    }

    table
}

/// Replace every top-level block region of `base` with its override.
///
/// Blocks the table does not define are removed along with their default
/// content. Block markup inside an override is resolved against the same
/// table, so no `{% block %}` tags survive a merge. Unbalanced block tags are
/// left as literal text.
pub fn merge_blocks(base: &str, blocks: &BlockTable) -> String {
    let mut output = String::with_capacity(base.len());
    merge_into(&mut output, base, blocks, &mut Vec::new());
    output
}

/// `active` holds the names whose bodies are being merged; a nested block
/// with one of those names is dropped, which bounds the recursion for any
/// table.
fn merge_into<'a>(
    output: &mut String,
    text: &'a str,
    blocks: &'a BlockTable,
    active: &mut Vec<&'a str>,
) {
    let tokens = tokenize(text);
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        if let TokenKind::BlockOpen { name } = token.kind {
            if let Some(close) = matching_close(&tokens, index) {
                match blocks.get(name) {
                    Some(body) if !active.contains(&name) => {
                        active.push(name);
                        merge_into(output, body, blocks, active);
                        active.pop();
                    }
                    Some(_) => trace!(block = name, "dropping recursive block"),
                    None => {}
                }
                index = close + 1;
                continue;
            }
        }
        output.push_str(token.raw);
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_extends() {
        assert_eq!(
            find_extends(r#"{% extends "base" %}{% block a %}{% endblock %}"#),
            Some("base")
        );
        assert_eq!(find_extends("<p>no inheritance</p>"), None);
    }

    #[test]
    fn test_first_extends_wins() {
        assert_eq!(
            find_extends(r#"{% extends "one" %}{% extends "two" %}"#),
            Some("one")
        );
    }

    #[test]
    fn test_malformed_extends_is_absent() {
        assert_eq!(find_extends(r#"{% extends "base %}"#), None);
        assert_eq!(find_extends(r#"{% extends 'base' %}"#), None);
    }

    #[test]
    fn test_extract_blocks_trims_bodies() {
        let table = extract_blocks(
            "{% block title %}  Custom  {% endblock %}\n{% block content %}\n<p>{{ body }}</p>\n{% endblock %}",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("title"), Some("Custom"));
        assert_eq!(table.get("content"), Some("<p>{{ body }}</p>"));
    }

    #[test]
    fn test_extract_blocks_last_declaration_wins() {
        let table = extract_blocks("{% block a %}first{% endblock %}{% block a %}second{% endblock %}");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a"), Some("second"));
    }

    #[test]
    fn test_extract_nested_blocks_balances_tags() {
        let table =
            extract_blocks("{% block outer %}a{% block inner %}b{% endblock %}c{% endblock %}");
        assert_eq!(
            table.get("outer"),
            Some("a{% block inner %}b{% endblock %}c")
        );
        assert_eq!(table.get("inner"), Some("b"));
    }

    #[test]
    fn test_merge_replaces_and_removes() {
        let base = "<title>{% block title %}Default{% endblock %}</title>\
                    <main>{% block content %}{% endblock %}</main>\
                    <aside>{% block sidebar %}Sidebar{% endblock %}</aside>";
        let mut table = BlockTable::new();
        table.insert("title", "Custom");
        table.insert("content", "<p>body</p>");

        assert_eq!(
            merge_blocks(base, &table),
            "<title>Custom</title><main><p>body</p></main><aside></aside>"
        );
    }

    #[test]
    fn test_merge_replaces_every_occurrence() {
        let base = "{% block title %}x{% endblock %}|{% block title %}y{% endblock %}";
        let mut table = BlockTable::new();
        table.insert("title", "T");
        assert_eq!(merge_blocks(base, &table), "T|T");
    }

    #[test]
    fn test_merge_resolves_nested_markup_in_override() {
        let base = "[{% block outer %}{% endblock %}]";
        let table =
            extract_blocks("{% block outer %}a{% block inner %}b{% endblock %}c{% endblock %}");
        assert_eq!(merge_blocks(base, &table), "[abc]");
    }

    #[test]
    fn test_merge_keeps_unbalanced_tags() {
        let base = "a{% block open %}b";
        assert_eq!(merge_blocks(base, &BlockTable::new()), base);
    }

    #[test]
    fn test_merge_leaves_other_markup() {
        let base = "{{ title }}{% for b in blocks %}{{ b.height }}{% endfor %}";
        assert_eq!(merge_blocks(base, &BlockTable::new()), base);
    }

    #[test]
    fn test_merge_self_referential_table() {
        let mut table = BlockTable::new();
        table.insert("a", "{% block a %}x{% endblock %}");
        assert_eq!(merge_blocks("[{% block a %}{% endblock %}]", &table), "[]");

        table.insert("a", "<{% block b %}{% endblock %}>");
        table.insert("b", "b{% block a %}again{% endblock %}");
        assert_eq!(merge_blocks("{% block a %}{% endblock %}", &table), "<b>");
    }
}
