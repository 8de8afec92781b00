//! Help text rendering from the static shape of the tree.

use std::fmt;

use crate::node::{FlagAction, Node, NodeId, NodeKind};
use crate::options::HelpLayout;
use crate::parser::Parser;
use crate::tree::ROOT;

/// Number of displayed characters, counting UTF-8 scalar values.
pub fn glyphs(text: &str) -> usize {
    text.chars().count()
}

/// Greedy word wrap. Existing line breaks are kept; the first line may have
/// its own width (0 means the same as `width`).
pub fn wrap(text: &str, width: usize, first_line_width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current_width = if first_line_width == 0 {
        width
    } else {
        first_line_width
    };
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_size = 0;
        for word in paragraph.split_whitespace() {
            let word_size = glyphs(word);
            if line_size > 0 && line_size + 1 + word_size > current_width {
                out.push(std::mem::take(&mut line));
                line_size = 0;
                current_width = width;
            }
            if line_size > 0 {
                line.push(' ');
                line_size += 1;
            }
            line.push_str(word);
            line_size += word_size;
        }
        if line_size > 0 {
            out.push(line);
            current_width = width;
        }
    }
    out
}

/// Display name of an argument: spaces and dashes become underscores.
fn arg_name(name: &str) -> String {
    name.replace([' ', '-'], "_")
}

impl Parser {
    pub fn help(&self) -> String {
        self.help_with(&HelpLayout::default())
    }

    pub fn help_with(&self, layout: &HelpLayout) -> String {
        let mut out = String::new();

        let has_options = self.tree.has_flag(ROOT);
        let mut usage = self.prog.clone();
        if has_options {
            usage.push_str(" {OPTIONS}");
        }
        let positionals = self.positional_names(ROOT);
        for name in &positionals {
            usage.push_str(&format!(" [{name}]"));
        }
        let usage_lines = wrap(
            usage.trim_start(),
            layout.width.saturating_sub(layout.prog_indent + 4),
            layout.width.saturating_sub(layout.prog_indent),
        );
        for (i, line) in usage_lines.iter().enumerate() {
            let indent = if i == 0 {
                layout.prog_indent
            } else {
                layout.prog_indent + 4
            };
            out.push_str(&format!("{:indent$}{line}\n", ""));
        }
        out.push('\n');

        let text_width = layout.width.saturating_sub(layout.description_indent);
        for line in wrap(&self.description, text_width, 0) {
            out.push_str(&format!("{:1$}{line}\n", "", layout.description_indent));
        }
        out.push('\n');

        out.push_str(&format!("{:1$}OPTIONS:\n\n", "", layout.prog_indent));
        let help_width = layout.width.saturating_sub(layout.help_indent);
        for (left, help) in self.descriptions(ROOT) {
            out.push_str(&format!("{:1$}{left}", "", layout.flag_indent));
            let info = wrap(&help, help_width, 0);
            let mut info = info.iter();
            let left_end = layout.flag_indent + glyphs(&left);
            if left_end + layout.gutter > layout.help_indent {
                out.push('\n');
            } else if let Some(first) = info.next() {
                out.push_str(&format!("{:1$}{first}\n", "", layout.help_indent - left_end));
            } else {
                out.push('\n');
            }
            for line in info {
                out.push_str(&format!("{:1$}{line}\n", "", layout.help_indent));
            }
        }
        if layout.show_terminator && has_options && !positionals.is_empty() {
            let note = format!(
                "\"{}\" can be used to terminate flag options and force all following arguments to be treated as positional options",
                self.options.terminator
            );
            let width = layout.width.saturating_sub(layout.flag_indent);
            for line in wrap(&note, width, 0) {
                out.push_str(&format!("{:1$}{line}\n", "", layout.flag_indent));
            }
        }

        out.push('\n');
        for line in wrap(&self.epilog, text_width, 0) {
            out.push_str(&format!("{:1$}{line}\n", "", layout.description_indent));
        }
        out
    }

    fn positional_names(&self, group: NodeId) -> Vec<String> {
        let mut names = Vec::new();
        for &child in self.tree.children(group) {
            let Some(node) = self.tree.node(child) else {
                continue;
            };
            match &node.kind {
                NodeKind::Group(_) => names.extend(self.positional_names(child)),
                NodeKind::Positional(pos) if !node.hidden => {
                    let suffix = if pos.list { "..." } else { "" };
                    names.push(format!("{}{suffix}", arg_name(&node.name)));
                }
                _ => {}
            }
        }
        names
    }

    /// `(left column, help text)` rows, nested groups flattened in order.
    fn descriptions(&self, group: NodeId) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        for &child in self.tree.children(group) {
            let Some(node) = self.tree.node(child) else {
                continue;
            };
            if node.is_group() {
                rows.extend(self.descriptions(child));
            } else if !node.hidden {
                rows.push(self.describe(node));
            }
        }
        rows
    }

    fn describe(&self, node: &Node) -> (String, String) {
        let flag = match &node.kind {
            NodeKind::Flag(flag) => flag,
            _ => return (arg_name(&node.name), node.help.clone()),
        };
        let names = flag
            .matcher
            .display_strings(&self.options.short_prefix, &self.options.long_prefix);
        match &flag.action {
            FlagAction::Value { keys, .. } => {
                let value_name = arg_name(&node.name);
                let left = names
                    .iter()
                    .map(|n| format!("{n} {value_name}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut help = node.help.clone();
                if let Some(keys) = keys {
                    if !help.is_empty() {
                        help.push(' ');
                    }
                    help.push_str(&format!("(one of: {})", keys.join(", ")));
                }
                (left, help)
            }
            _ => (names.join(", "), node.help.clone()),
        }
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.help())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Arg;
    use crate::group::Validator;
    use indexmap::IndexMap;

    #[test]
    fn wrap_fills_lines_greedily() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10, 0),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap("one two three", 20, 4), vec!["one", "two three"]);
        assert!(wrap("", 10, 0).is_empty());
    }

    #[test]
    fn wrap_keeps_line_breaks_and_long_words() {
        assert_eq!(wrap("a b\nc", 80, 0), vec!["a b", "c"]);
        assert_eq!(wrap("abcdefghij xy", 4, 0), vec!["abcdefghij", "xy"]);
    }

    #[test]
    fn glyphs_count_characters_not_bytes() {
        assert_eq!(glyphs("héllo"), 5);
        assert_eq!(glyphs("日本"), 2);
    }

    #[test]
    fn help_lists_flags_positionals_and_terminator() {
        let mut parser = Parser::new("This goes before the options.")
            .prog("tool")
            .epilog("This goes after the options.");
        let root = parser.root();
        parser.help_flag(root, Arg::new("help", "Display this help menu").matcher(('h', "help")));
        let group = parser.group(root, "modes", Validator::Xor);
        parser.flag(group, Arg::new("fast", "Go fast").long("fast"));
        parser.value_flag::<u64>(root, Arg::new("block size", "Block size").long("bs"), 512);
        let levels: IndexMap<String, u8> =
            [("low".to_string(), 1), ("high".to_string(), 2)].into_iter().collect();
        parser.map_flag(root, Arg::new("LEVEL", "Level").long("level"), levels, 1);
        parser.flag(root, Arg::new("secret", "Hidden").long("secret").hidden());
        parser.positional::<String>(root, Arg::new("input", "Input file"), String::new());
        parser.positional_list::<String, Vec<String>>(root, Arg::new("rest", "Others"), Vec::new());

        let text = parser.help();
        assert!(text.starts_with("  tool {OPTIONS} [input] [rest...]\n"), "{text}");
        assert!(text.contains("    This goes before the options.\n"));
        assert!(text.contains("  OPTIONS:\n"));
        assert!(text.contains("      -h, --help         Display this help menu\n"), "{text}");
        assert!(text.contains("      --fast             Go fast\n"), "{text}");
        assert!(text.contains("--bs block_size"));
        assert!(text.contains("Level (one of: low, high)"));
        assert!(!text.contains("--secret"));
        assert!(text.contains("\"--\" can be used to terminate flag options"));
        assert!(text.trim_end().ends_with("This goes after the options."));
        assert_eq!(parser.to_string(), text);
    }

    #[test]
    fn long_flag_names_push_help_to_next_line() {
        let mut parser = Parser::new("").prog("tool");
        let root = parser.root();
        parser.flag(
            root,
            Arg::new("x", "Explained below").long("a-very-long-flag-name-indeed"),
        );
        let text = parser.help();
        assert!(text.contains(
            "      --a-very-long-flag-name-indeed\n                         Explained below\n"
        ));
    }

    #[test]
    fn help_with_custom_layout() {
        let mut parser = Parser::new("").prog("tool");
        let root = parser.root();
        parser.flag(root, Arg::new("fast", "Go fast").long("fast"));
        parser.positional::<String>(root, Arg::new("input", ""), String::new());
        let layout = HelpLayout {
            flag_indent: 2,
            help_indent: 10,
            show_terminator: false,
            ..HelpLayout::default()
        };
        let text = parser.help_with(&layout);
        assert!(text.contains("\n  --fast  Go fast\n"), "{text}");
        assert!(!text.contains("can be used to terminate"));
        assert_ne!(text, parser.help());
    }

    #[test]
    fn custom_prefixes_show_in_help() {
        let mut parser = Parser::new("dd").prog("dd");
        parser.options_mut().long_prefix = "/".to_string();
        let root = parser.root();
        parser.value_flag::<i64>(root, Arg::new("BYTES", "Block size").long("bs"), 512);
        assert!(parser.help().contains("/bs BYTES"));
    }
}
