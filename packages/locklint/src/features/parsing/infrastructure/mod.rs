pub mod go_parser;
pub mod lowering;

pub use go_parser::GoParser;
