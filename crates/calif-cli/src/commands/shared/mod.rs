pub mod parse;
pub mod viewer;
