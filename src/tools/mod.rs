pub mod browse;
pub mod get;
pub mod load_classification;
pub mod search;

pub use browse::*;
pub use get::*;
pub use load_classification::*;
pub use search::*;

use serde::Serialize;

/// Serialize a tool response to the JSON string returned over MCP.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize response: {}", e))
}
