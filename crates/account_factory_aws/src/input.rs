//! Standard-input payload reading shared by the CLI binaries.

use std::io::Read;

use serde_json::Value;

/// Reads one JSON document. Any decode failure collapses to the fixed
/// message the tools have always printed.
pub fn read_payload(reader: impl Read) -> Result<Value, String> {
    serde_json::from_reader(reader).map_err(|_| "Invalid JSON format".to_string())
}
