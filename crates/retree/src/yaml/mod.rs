//! Lossless YAML trees.

pub mod parser;
pub mod printer;
pub mod tree;
pub mod visitor;
