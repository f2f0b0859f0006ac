use std::fmt::Write;

use colored::Colorize;

use crate::tree::{NamespaceTree, Node, NodeType};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

/// Renders the tree under `root_id` as an indented listing
pub fn render(tree: &NamespaceTree, root_id: &str, use_color: bool) -> String {
    let mut out = String::new();
    match tree.root(root_id) {
        Some(root) => {
            let _ = writeln!(out, "{}", label(root, use_color));
            render_children(root, "", use_color, &mut out);
        }
        None => {
            let _ = writeln!(out, "{root_id}/ (not listed)");
        }
    }
    out
}

fn render_children(node: &Node, prefix: &str, use_color: bool, out: &mut String) {
    let Some(children) = node.child.as_ref() else {
        return;
    };

    let count = children.len();
    for (index, child) in children.values().enumerate() {
        let is_last = index + 1 == count;
        let branch = if is_last { LAST_BRANCH } else { BRANCH };
        let _ = writeln!(out, "{prefix}{branch}{}", label(child, use_color));

        let nested = format!("{prefix}{}", if is_last { GAP } else { PIPE });
        render_children(child, &nested, use_color, out);
    }
}

fn label(node: &Node, use_color: bool) -> String {
    let text = match node.node_type {
        NodeType::File => node.name.clone(),
        NodeType::Folder => format!("{}/", node.name),
        NodeType::Gist => format!("{}/ [gist]", node.name),
    };
    let pending = node.is_directory && !node.is_loaded();

    let text = if use_color {
        match node.node_type {
            NodeType::File => text,
            NodeType::Folder => text.blue().bold().to_string(),
            NodeType::Gist => text.magenta().bold().to_string(),
        }
    } else {
        text
    };

    if pending {
        let marker = if use_color {
            "…".dimmed().to_string()
        } else {
            "…".to_string()
        };
        format!("{text} {marker}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ListingEntry, RawListing, merge_level};

    #[test]
    fn renders_plain_tree() {
        let mut root = RawListing::new();
        root.insert("README.md".to_string(), ListingEntry::file());
        root.insert("contracts".to_string(), ListingEntry::directory());
        root.insert("gist-42-notes".to_string(), ListingEntry::directory());
        let tree = merge_level(&NamespaceTree::default(), "ws", "ws", &root).unwrap();

        let mut contracts = RawListing::new();
        contracts.insert("contracts/token.sol".to_string(), ListingEntry::file());
        let tree = merge_level(&tree, "ws", "contracts", &contracts).unwrap();

        let expected = "\
ws/
├── contracts/
│   └── token.sol
├── 42-notes/ [gist] …
└── README.md
";
        assert_eq!(render(&tree, "ws", false), expected);
    }

    #[test]
    fn renders_missing_root() {
        assert_eq!(
            render(&NamespaceTree::default(), "localhost", false),
            "localhost/ (not listed)\n"
        );
    }
}
