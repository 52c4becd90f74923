//! Output writers for heap reports.
//!
//! This module handles:
//! - The versioned report schema
//! - JSON reports on disk
//! - Text summaries for the terminal

pub mod json;
pub mod report;
pub mod summary;

// Re-export main functions
pub use json::{read_report, to_pretty_string, write_report};
pub use report::{to_report, HeapReport};
pub use summary::{format_bytes, render_terminal_summary};
