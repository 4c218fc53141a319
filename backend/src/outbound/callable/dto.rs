//! Wire shapes of the callable-function protocol.
//!
//! Requests wrap the payload as `{"data": ...}`. Responses carry either
//! `{"result": ...}` or `{"error": {"status", "message"}}`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(super) struct CallableRequestDto<'a> {
    pub(super) data: &'a Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallableResponseDto {
    #[serde(default, deserialize_with = "present")]
    pub(super) result: Option<Value>,
    #[serde(default)]
    pub(super) error: Option<CallableErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallableErrorDto {
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Distinguishes `"result": null` (a function returning nothing) from a
/// missing `result` key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
