/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering configuration.

/// Options that control how lenient rendering is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Strict mode: unresolved placeholders are errors instead of being left
    /// as literal text (or blanked, for missing loop item properties).
    pub strict: bool,
}

impl RenderOptions {
    /// Default options: lenient rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert!(!RenderOptions::new().strict);
        assert!(RenderOptions::new().with_strict(true).strict);
    }
}
