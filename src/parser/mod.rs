pub mod junit;

pub use junit::{parse_document, parse_file, ParseError, RunDocument};
