//! Diagnostic dump of a document tree, one line per node:
//!
//! ```text
//! <Root>
//! ├── <plain 0..4 "aaaa">
//! └── <comment 4..9 "%bbbb">
//!     └── <plain 5..9 "bbbb">
//! ```

use super::{DocumentTree, NodeId};

const PREVIEW_CHARS: usize = 30;

impl DocumentTree {
    /// Renders the tree structure with box-drawing connectors.
    pub fn render_structure(&self) -> String {
        let mut lines = Vec::new();
        // Per ancestor below the root: was it the last of its siblings
        let mut last_flags: Vec<bool> = Vec::new();

        for (id, depth) in self.preorder() {
            if depth == 0 {
                lines.push(self.label(id));
                continue;
            }
            last_flags.truncate(depth - 1);
            let is_last = self.is_last_child(id);

            let mut line: String = last_flags
                .iter()
                .map(|&last| if last { "    " } else { "│   " })
                .collect();
            line.push_str(if is_last { "└── " } else { "├── " });
            line.push_str(&self.label(id));
            lines.push(line);

            last_flags.push(is_last);
        }
        lines.join("\n")
    }

    fn is_last_child(&self, id: NodeId) -> bool {
        self.node(id)
            .parent()
            .is_none_or(|parent| self.node(parent).children().last() == Some(&id))
    }

    fn label(&self, id: NodeId) -> String {
        match self.block(id) {
            None => "<Root>".to_string(),
            Some(block) => {
                let text = block.raw_text(self.text_of(block));
                format!("<{block} \"{}\">", preview(text, PREVIEW_CHARS))
            }
        }
    }
}

/// Escapes newlines and truncates to `max_chars` with a "..." suffix.
fn preview(s: &str, max_chars: usize) -> String {
    let escaped = s.replace('\n', "\\n");
    if escaped.chars().count() > max_chars {
        let mut truncated: String = escaped.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn empty_tree_is_just_the_root() {
        assert_eq!(DocumentTree::new("").render_structure(), "<Root>");
    }

    #[test]
    fn comment_closed_by_eof() {
        let tree = presets::latex().interpret("aaaa%bbbb").unwrap();
        insta::assert_snapshot!(tree.render_structure(), @r#"
        <Root>
        ├── <plain 0..4 "aaaa">
        └── <comment 4..9 "%bbbb">
            └── <plain 5..9 "bbbb">
        "#);
    }

    #[test]
    fn nested_blocks_draw_continuation_lines() {
        let tree = presets::latex()
            .interpret("\\cite{a{b}%c\nd}e")
            .unwrap();
        insta::assert_snapshot!(tree.render_structure(), @r#"
        <Root>
        ├── <cite 0..15 "\cite{a{b}%c\nd}">
        │   ├── <plain 6..7 "a">
        │   ├── <bracket 7..10 "{b}">
        │   │   └── <plain 8..9 "b">
        │   ├── <comment 10..13 "%c\n">
        │   │   └── <plain 11..12 "c">
        │   └── <plain 13..14 "d">
        └── <plain 15..16 "e">
        "#);
    }

    #[test]
    fn siblings_after_a_deep_branch_reset_the_prefix() {
        let tree = presets::latex().interpret("{{{a}}}{b}").unwrap();
        insta::assert_snapshot!(tree.render_structure(), @r#"
        <Root>
        ├── <bracket 0..7 "{{{a}}}">
        │   └── <bracket 1..6 "{{a}}">
        │       └── <bracket 2..5 "{a}">
        │           └── <plain 3..4 "a">
        └── <bracket 7..10 "{b}">
            └── <plain 8..9 "b">
        "#);
    }

    #[test]
    fn deeply_nested_tree_renders_without_recursion() {
        let depth = 4_000;
        let text = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        let tree = presets::latex().interpret(&text).unwrap();

        let structure = tree.render_structure();
        assert_eq!(structure.lines().count(), depth + 1);
        let deepest = structure.lines().last().unwrap();
        assert!(deepest.ends_with(&format!("<bracket {}..{} \"{{}}\">", depth - 1, depth + 1)));
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("a\nb", 10), "a\\nb");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
