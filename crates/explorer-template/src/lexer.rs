/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template tokenizer.
//!
//! Splits template text into a flat list of [`Token`]s over `{% ... %}` tags
//! and `{{ ... }}` placeholders. Every token keeps the exact source text it was
//! produced from, so a stage that does not care about a token can copy it to
//! its output unchanged. Tags and placeholders that do not match the grammar
//! become [`TokenKind::Text`]; the tokenizer itself never fails.
//!
//! Recognized forms. Tags must be written exactly as shown, with single
//! spaces; placeholders allow any whitespace inside the braces:
//!
//! ```text
//! {% extends "name" %}
//! {% block ident %} ... {% endblock %}
//! {% for ident in ident %} ... {% endfor %}
//! {{ ident }}  {{ ident.ident }}
//! ```

const TAG_OPEN: &str = "{%";
const TAG_CLOSE: &str = "%}";
const VAR_OPEN: &str = "{{";
const VAR_CLOSE: &str = "}}";

/// What a token means to the rendering stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Literal text, including unrecognized or malformed markup.
    Text,
    /// `{% extends "name" %}`
    Extends { name: &'a str },
    /// `{% block name %}`
    BlockOpen { name: &'a str },
    /// `{% endblock %}`
    BlockClose,
    /// `{% for item in collection %}`
    ForOpen { item: &'a str, collection: &'a str },
    /// `{% endfor %}`
    ForClose,
    /// `{{ name }}` or `{{ name.property }}`
    Variable {
        name: &'a str,
        property: Option<&'a str>,
    },
}

/// A token together with the source text it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// The exact source text of this token.
    pub raw: &'a str,
    /// Byte offset of `raw` in the tokenized source.
    pub offset: usize,
}

impl Token<'_> {
    /// Byte offset just past the end of this token.
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }
}

/// Tokenize template source.
///
/// Concatenating the `raw` text of the returned tokens reproduces `source`.
/// A delimiter whose contents do not match the grammar is not markup; the
/// scan resumes one byte after it, so `{{{ x }}}` yields `{`, `{{ x }}`, `}`.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // Start of text not yet emitted, and where the next delimiter search begins.
    let mut pos = 0;
    let mut scan = 0;

    while let Some((found, open, close)) = next_delimiter(&source[scan..]) {
        let start = scan + found;
        let Some(token) = delimited(source, start, open, close) else {
            scan = start + 1;
            continue;
        };

        if start > pos {
            tokens.push(text(source, pos, start));
        }
        pos = token.end();
        scan = pos;
        tokens.push(token);
    }

    if pos < source.len() {
        tokens.push(text(source, pos, source.len()));
    }
    tokens
}

/// Find the index of the closing token matching the opening token at `open`.
///
/// Only `BlockOpen` and `ForOpen` have closers; same-kind tags in between are
/// balanced by depth. Returns `None` for any other token or when the tag is
/// never closed.
pub fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let block = match tokens.get(open)?.kind {
        TokenKind::BlockOpen { .. } => true,
        TokenKind::ForOpen { .. } => false,
        _ => return None,
    };

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match (block, token.kind) {
            (true, TokenKind::BlockOpen { .. }) | (false, TokenKind::ForOpen { .. }) => depth += 1,
            (true, TokenKind::BlockClose) | (false, TokenKind::ForClose) => {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Is `s` a `\w+` identifier?
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn text(source: &str, start: usize, end: usize) -> Token<'_> {
    Token {
        kind: TokenKind::Text,
        raw: &source[start..end],
        offset: start,
    }
}

/// The tag or placeholder opening at `start`, if it is terminated and well formed.
fn delimited<'a>(source: &'a str, start: usize, open: &str, close: &str) -> Option<Token<'a>> {
    let inner_start = start + open.len();
    let inner_len = source[inner_start..].find(close)?;
    let inner = &source[inner_start..inner_start + inner_len];

    let kind = if open == TAG_OPEN {
        classify_tag(inner)
    } else {
        classify_variable(inner)
    };
    if matches!(kind, TokenKind::Text) {
        return None;
    }

    let end = inner_start + inner_len + close.len();
    Some(Token {
        kind,
        raw: &source[start..end],
        offset: start,
    })
}

/// Earliest `{%` or `{{` in `s`, with its delimiter pair.
fn next_delimiter(s: &str) -> Option<(usize, &'static str, &'static str)> {
    let tag = s.find(TAG_OPEN).map(|i| (i, TAG_OPEN, TAG_CLOSE));
    let var = s.find(VAR_OPEN).map(|i| (i, VAR_OPEN, VAR_CLOSE));
    match (tag, var) {
        (Some(t), Some(v)) => Some(if t.0 <= v.0 { t } else { v }),
        (t, v) => t.or(v),
    }
}

/// Tags are matched literally: one space after `{%`, one between words and
/// one before `%}`.
fn classify_tag(inner: &str) -> TokenKind<'_> {
    let Some(body) = inner.strip_prefix(' ').and_then(|s| s.strip_suffix(' ')) else {
        return TokenKind::Text;
    };
    if let Some(name) = parse_extends(body) {
        return TokenKind::Extends { name };
    }

    let words: Vec<&str> = body.split(' ').collect();
    match *words.as_slice() {
        ["block", name] if is_identifier(name) => TokenKind::BlockOpen { name },
        ["endblock"] => TokenKind::BlockClose,
        ["for", item, "in", collection] if is_identifier(item) && is_identifier(collection) => {
            TokenKind::ForOpen { item, collection }
        }
        ["endfor"] => TokenKind::ForClose,
        _ => TokenKind::Text,
    }
}

/// `extends "name"` with a non-empty, quote-free name.
fn parse_extends(body: &str) -> Option<&str> {
    let name = body.strip_prefix("extends \"")?.strip_suffix('"')?;
    (!name.is_empty() && !name.contains('"')).then_some(name)
}

fn classify_variable(inner: &str) -> TokenKind<'_> {
    let trimmed = inner.trim();
    match trimmed.split_once('.') {
        None if is_identifier(trimmed) => TokenKind::Variable {
            name: trimmed,
            property: None,
        },
        Some((name, property)) if is_identifier(name) && is_identifier(property) => {
            TokenKind::Variable {
                name,
                property: Some(property),
            }
        }
        _ => TokenKind::Text,
    }
}
