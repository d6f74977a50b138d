use serde::Deserialize;

/// One recent purchase as delivered by the storefront backend.
///
/// `time_ago` arrives pre-formatted (and localized) from the server and is
/// displayed verbatim; the client never recomputes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PurchaseRecord {
    pub initials: String,
    pub country: String,
    /// Lowercase two-letter code, empty when the order had no country.
    #[serde(default)]
    pub country_code: String,
    pub product_name: String,
    pub product_url: String,
    pub product_image: String,
    pub time_ago: String,
}

/// Tagged success/failure envelope used by the order endpoint
/// (admin-ajax style: `{"success": bool, "data": ...}`).
#[derive(Debug, Deserialize)]
pub struct AjaxEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Outcome slot for the single background order fetch, shared between the
/// fetch task and the event loop.
pub enum FetchSlot {
    Pending,
    Ready(Vec<PurchaseRecord>),
    Failed,
}
