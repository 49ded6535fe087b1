pub mod node;
pub mod parse;
pub mod write;

pub use node::{Node, NodeKind};
pub use parse::{parse_outline, OutlineParser};
pub use write::{read_tree, write_tree};
