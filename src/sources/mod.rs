//! File-backed inputs of the engine: the course catalog and the mined rule records.

pub mod catalog;
pub mod rules;
pub mod set_literal;

pub use catalog::Catalog;
pub use rules::{read_rules, read_rules_from_path};
pub use set_literal::{parse_string_set, SetLiteralError};
