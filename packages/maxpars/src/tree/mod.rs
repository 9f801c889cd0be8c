pub mod node;
pub mod nwk;
pub mod tree;
