//! Output formatting for CLI results.
//!
//! JSON output is the serialized value. Pretty output is produced by the
//! caller's formatter from [`pretty`], since most views need context the
//! value alone does not carry.

pub mod json;
pub mod pretty;

use crate::cli::OutputFormat;

/// Renders `value` as compact JSON or through `pretty`.
pub fn format_output<T, F>(value: &T, format: OutputFormat, pretty: F) -> String
where
    T: serde::Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => pretty(value),
    }
}
