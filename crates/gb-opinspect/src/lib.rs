pub mod listing;

// Re-export commonly used helpers for the CLI
pub use listing::{describe_case, parse_opcode, summarize, text_listing, Summary};
