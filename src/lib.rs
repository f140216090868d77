pub mod parser;
pub mod report;
pub mod utils;

// Re-export common items
pub use parser::{parse_document, ParseError};
pub use report::generate_report;
pub use report::types::ReportModel;
