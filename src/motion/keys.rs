// SYNOID Motion Keys
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Composite lookup keys for learned rules. Extraction (writer) and
// enforcement/preferences (readers) must both go through these.

use crate::motion::spec::Size;

/// `"{element_type}_{width}x{height}"`, e.g. `text_block_800x200`.
pub fn element_key(element_type: &str, size: Size) -> String {
    format!("{}_{}x{}", element_type, size.width, size.height)
}

/// `"{from}_to_{to}"`, e.g. `intro_to_features`.
pub fn transition_key(from: &str, to: &str) -> String {
    format!("{}_to_{}", from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_key_format() {
        assert_eq!(
            element_key("text_block", Size::new(800, 200)),
            "text_block_800x200"
        );
        assert_eq!(element_key("code_editor", Size::new(1, 1)), "code_editor_1x1");
    }

    #[test]
    fn test_transition_key_format() {
        assert_eq!(transition_key("intro", "demo"), "intro_to_demo");
    }
}
