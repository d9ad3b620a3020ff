/*
 * context_file.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading a render context from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use explorer_template::TemplateContext;

/// Read a JSON object from `path` and convert it to a render context.
pub fn load(path: &Path) -> Result<TemplateContext> {
    let text =
        fs::read_to_string(path).context(format!("Failed to read context file: {:?}", path))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .context(format!("Context file is not valid JSON: {:?}", path))?;
    TemplateContext::try_from(value).context(format!("Unusable context file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_context_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{ "title": "Blocks", "blocks": [{ "height": 7 }] }"#).unwrap();

        let ctx = load(&path).unwrap();
        assert_eq!(ctx.scalar("title"), Some("Blocks"));
        assert_eq!(ctx.get("blocks").and_then(|v| v.as_sequence()).map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_load_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        assert!(load(&dir.path().join("missing.json")).is_err());

        let not_json = dir.path().join("bad.json");
        fs::write(&not_json, "{ title: ").unwrap();
        assert!(load(&not_json).is_err());

        let array = dir.path().join("array.json");
        fs::write(&array, r#"[{ "hash": "ab" }]"#).unwrap();
        let err = load(&array).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid render context"));
    }

    #[test]
    fn test_load_skips_nested_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        fs::write(&path, r#"{ "title": "Tx", "tx": { "hash": "ab" } }"#).unwrap();

        let ctx = load(&path).unwrap();
        assert_eq!(ctx.scalar("title"), Some("Tx"));
        assert!(ctx.get("tx").is_none());
    }
}
