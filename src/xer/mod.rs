pub mod builder;
pub mod reader;

pub use builder::build_schedule;
pub use reader::{read_document, XerDocument, XerTable};
