// Cloud API response types
//
// Every endpoint wraps its payload in the `Envelope<T>` envelope. Device
// fields use `#[serde(default)]` liberally because the cloud omits any
// measurement a given model doesn't support, and sends numbers as either
// JSON numbers or numeric strings depending on firmware.

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Envelope code signalling success.
pub const CODE_OK: i64 = 0;

/// Envelope code signalling an expired or revoked token.
pub const CODE_TOKEN_EXPIRED: i64 = 3;

/// Standard vendor response envelope.
///
/// ```json
/// { "code": 0, "data": ..., "message": "optional" }
/// ```
///
/// `code` == 0 means success; `code` == 3 specifically signals token
/// expiry; any other value is a generic rejection.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of a successful `/login` response.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

// ── Device ───────────────────────────────────────────────────────────

/// One device object from `/data/all`.
///
/// The MAC address is the only stable identity; `alias` and `type` can
/// change between polls when the user renames or re-registers a device.
/// Measurement fields are kept as raw JSON values -- normalization
/// (string-to-number parsing, rounding) happens in the presentation
/// layer so a malformed field degrades to "absent" instead of failing
/// the whole response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub mac: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, rename = "type")]
    pub model_code: Option<String>,
    #[serde(default)]
    pub temperature: Option<serde_json::Value>,
    #[serde(default)]
    pub humidity: Option<serde_json::Value>,
    #[serde(default)]
    pub power: Option<serde_json::Value>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceRecord {
    /// The user-facing name: alias when set, MAC otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.mac)
    }
}
