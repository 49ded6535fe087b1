use anyhow::Result;
use regex::Regex;
use tracing::debug;

use super::node::{Node, NodeKind};
use crate::config;

/// Arena key of the root node.
const ROOT: usize = 0;

/// Compiled patterns for the five recognized line shapes, in match
/// priority order. The group pattern must be tried before the single
/// variable pattern: a group line is a bare comma list with no colon,
/// a single variable always carries `:` plus a description.
struct Patterns {
    section: Regex,
    subsection: Regex,
    subsubsection: Regex,
    variable_group: Regex,
    variable: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Patterns {
            section: Regex::new(r"^###\s*\*\*BÖLÜM\s+(\d+):\s*(.+)\*\*")?,
            subsection: Regex::new(r"^####\s*\*\*(\d+\.\d+)\s+(.+)\*\*")?,
            // trailing colon inside the bold span distinguishes this
            // from a subsection heading
            subsubsection: Regex::new(r"^\*\*(\d+\.\d+\.\d+)\s+(.+):\*\*")?,
            variable_group: Regex::new(
                r"^\*\s*\*\*([A-Za-z0-9_]+(?:,\s*[A-Za-z0-9_]+)+)\*\*",
            )?,
            variable: Regex::new(r"^\*\s*\*\*([A-Za-z0-9_]+):\*\*\s*(.+)")?,
        })
    }
}

/// Flat storage for the tree under construction. Children are arena
/// keys, so the cursor below can hold plain indices instead of
/// references into a structure that is still growing.
struct Arena {
    nodes: Vec<ArenaNode>,
}

struct ArenaNode {
    id: String,
    label: String,
    kind: NodeKind,
    columns: Option<Vec<String>>,
    children: Vec<usize>,
}

impl Arena {
    fn new() -> Self {
        Arena {
            nodes: vec![ArenaNode {
                id: config::ROOT_ID.to_string(),
                label: config::ROOT_LABEL.to_string(),
                kind: NodeKind::Root,
                columns: None,
                children: Vec::new(),
            }],
        }
    }

    /// Append a heading node under `parent`, returning its key.
    fn push_branch(&mut self, parent: usize, id: String, label: String, kind: NodeKind) -> usize {
        self.push(
            parent,
            ArenaNode {
                id,
                label,
                kind,
                columns: None,
                children: Vec::new(),
            },
        )
    }

    /// Append an indicator leaf under `parent`.
    fn push_indicator(&mut self, parent: usize, name: String, label: String) {
        self.push(
            parent,
            ArenaNode {
                id: name.clone(),
                label,
                kind: NodeKind::Indicator,
                columns: Some(vec![name]),
                children: Vec::new(),
            },
        );
    }

    fn push(&mut self, parent: usize, node: ArenaNode) -> usize {
        let key = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(key);
        key
    }

    /// Depth-first assembly of the nested tree.
    fn into_tree(self) -> Node {
        self.assemble(ROOT)
    }

    fn assemble(&self, key: usize) -> Node {
        let n = &self.nodes[key];
        Node {
            id: n.id.clone(),
            label: n.label.clone(),
            kind: n.kind,
            children: match n.kind {
                NodeKind::Indicator => None,
                _ => Some(n.children.iter().map(|&c| self.assemble(c)).collect()),
            },
            columns: n.columns.clone(),
        }
    }
}

/// The three "currently open heading" slots of the line state machine.
/// Each holds an arena key of a node already inserted into the tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    pillar: Option<usize>,
    category: Option<usize>,
    subcategory: Option<usize>,
}

impl Cursor {
    /// Deepest open slot: the attachment target for variable lines.
    fn deepest(&self) -> Option<usize> {
        self.subcategory.or(self.category).or(self.pillar)
    }
}

/// Stateful outline-to-tree parser. Malformed or unrecognized lines are
/// discarded without error: the codebook outline is hand-authored and
/// not guaranteed machine-clean, so extraction is best-effort.
pub struct OutlineParser {
    patterns: Patterns,
}

impl OutlineParser {
    pub fn new() -> Result<Self> {
        Ok(OutlineParser {
            patterns: Patterns::compile()?,
        })
    }

    /// Parse the whole outline document into a rooted tree.
    pub fn parse(&self, text: &str) -> Node {
        let mut arena = Arena::new();
        let mut cursor = Cursor::default();
        let mut dropped: u64 = 0;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if !self.apply_line(line, &mut arena, &mut cursor) {
                dropped += 1;
            }
        }

        debug!(dropped, "discarded unrecognized or orphaned lines");
        arena.into_tree()
    }

    /// One transition of the line state machine. Patterns are tried in
    /// priority order; the first match wins. Returns false when the
    /// line was discarded (no pattern matched, or a heading appeared
    /// without its required ancestor, or a variable had no open
    /// heading to attach to).
    fn apply_line(&self, line: &str, arena: &mut Arena, cursor: &mut Cursor) -> bool {
        // 1) Section heading: new pillar under root, closes any open
        //    subsection state from the previous section.
        if let Some(caps) = self.patterns.section.captures(line) {
            let (n, title) = (&caps[1], &caps[2]);
            let key = arena.push_branch(
                ROOT,
                format!("section_{}", n),
                format!("BÖLÜM {}: {}", n, title),
                NodeKind::Pillar,
            );
            *cursor = Cursor {
                pillar: Some(key),
                ..Cursor::default()
            };
            return true;
        }

        // 2) Subsection heading: requires an open section.
        if let Some(caps) = self.patterns.subsection.captures(line) {
            let Some(parent) = cursor.pillar else {
                return false;
            };
            let (num, title) = (&caps[1], &caps[2]);
            let key = arena.push_branch(
                parent,
                format!("sub_{}", num.replace('.', "_")),
                format!("{} {}", num, title),
                NodeKind::Category,
            );
            cursor.category = Some(key);
            cursor.subcategory = None;
            return true;
        }

        // 3) Sub-subsection heading: requires an open subsection.
        //    Strict nesting: no fallback to the section when the
        //    subsection slot is empty, the line is dropped instead.
        if let Some(caps) = self.patterns.subsubsection.captures(line) {
            let Some(parent) = cursor.category else {
                return false;
            };
            let (num, title) = (&caps[1], &caps[2]);
            let key = arena.push_branch(
                parent,
                format!("subsub_{}", num.replace('.', "_")),
                format!("{} {}", num, title),
                NodeKind::Subcategory,
            );
            cursor.subcategory = Some(key);
            return true;
        }

        // 4) Variable group: bare comma-separated names, no
        //    descriptions available in this form.
        if let Some(caps) = self.patterns.variable_group.captures(line) {
            let Some(parent) = cursor.deepest() else {
                return false;
            };
            for name in caps[1].split(',') {
                let name = name.trim().to_string();
                let label = name.clone();
                arena.push_indicator(parent, name, label);
            }
            return true;
        }

        // 5) Single variable with description.
        if let Some(caps) = self.patterns.variable.captures(line) {
            let Some(parent) = cursor.deepest() else {
                return false;
            };
            let (name, description) = (&caps[1], &caps[2]);
            arena.push_indicator(parent, name.to_string(), format!("{}: {}", name, description));
            return true;
        }

        false
    }
}

/// Parse an outline document into a rooted tree.
pub fn parse_outline(text: &str) -> Result<Node> {
    Ok(OutlineParser::new()?.parse(text))
}
