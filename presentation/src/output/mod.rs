//! Output formatting for turn results

pub mod console;
pub mod formatter;
