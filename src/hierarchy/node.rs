use serde::{Deserialize, Serialize};

/// Node kind within the codebook tree, serialized under the `type` key.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Pillar,
    Category,
    Subcategory,
    Indicator,
}

/// A single node of the codebook tree. Heading nodes carry `children`,
/// indicator leaves carry `columns` (the raw dataset column names they
/// map to); the absent field is omitted from the JSON artifact.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl Node {
    /// Depth-first node count, self included.
    pub fn count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(Node::count)
            .sum::<usize>()
    }
}
