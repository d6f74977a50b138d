use std::fs;
use std::path::Path;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Settings;
use crate::models::{AjaxEnvelope, PurchaseRecord};

/// Action identifier the order endpoint dispatches on.
const ORDERS_ACTION: &str = "wc_just_bought_get_orders";
/// The backend sends at most ten orders; anything beyond is dropped.
pub const MAX_RECORDS: usize = 10;

/// Everything that can keep notifications from loading. All variants look
/// identical to the user (no popup, nothing else affected); they differ
/// only on the diagnostics channel. An empty result is not a failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("order endpoint or token not configured")]
    ConfigurationMissing,
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for the recent-orders endpoint. Fetches exactly once per session.
pub struct OrderClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl OrderClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let (Some(endpoint), Some(token)) = (settings.endpoint.clone(), settings.token.clone())
        else {
            return Err(FetchError::ConfigurationMissing);
        };
        Ok(Self {
            http: Client::new(),
            endpoint,
            token,
        })
    }

    /// Posts the action identifier and anti-forgery token, decodes the
    /// envelope. No retry: a failed fetch means no notifications for this
    /// session.
    pub async fn fetch_orders(&self) -> Result<Vec<PurchaseRecord>, FetchError> {
        debug!(endpoint = %self.endpoint, action = ORDERS_ACTION, "fetching orders");
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("action", ORDERS_ACTION), ("nonce", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if let Err(err) = response.error_for_status_ref() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "order endpoint returned an error status");
            return Err(FetchError::Transport(err));
        }

        let body = response.text().await?;
        debug!(%status, body = %body, "order endpoint responded");
        decode_orders(&body)
    }
}

/// Decodes the success/failure envelope. A failure envelope and a body that
/// does not match the envelope shape both land in `InvalidResponse`; a
/// success with absent or empty data is a valid empty result.
pub fn decode_orders(body: &str) -> Result<Vec<PurchaseRecord>, FetchError> {
    let envelope: AjaxEnvelope = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidResponse(format!("unexpected body: {e}")))?;

    if !envelope.success {
        let message = envelope
            .data
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("no message")
            .to_string();
        error!(%message, "order endpoint rejected the request");
        return Err(FetchError::InvalidResponse(message));
    }

    if envelope.data.is_null() {
        return Ok(Vec::new());
    }
    let mut records: Vec<PurchaseRecord> = serde_json::from_value(envelope.data)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed record list: {e}")))?;
    records.truncate(MAX_RECORDS);
    Ok(records)
}

/// Reads a record list from a local JSON file (the envelope's `data` array
/// on its own), for previewing without a storefront backend.
pub fn load_fixture(path: &Path) -> anyhow::Result<Vec<PurchaseRecord>> {
    let body = fs::read_to_string(path)?;
    let mut records: Vec<PurchaseRecord> = serde_json::from_str(&body)?;
    records.truncate(MAX_RECORDS);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(name: &str) -> String {
        format!(
            r#"{{"initials":"JM","country":"Italy","country_code":"it",
                 "product_name":"{name}","product_url":"https://shop.test/{name}",
                 "product_image":"https://shop.test/{name}.jpg","time_ago":"5 minutes ago"}}"#
        )
    }

    #[test]
    fn success_envelope_decodes_records_in_order() {
        let body = format!(
            r#"{{"success":true,"data":[{},{}]}}"#,
            record_json("first"),
            record_json("second")
        );
        let records = decode_orders(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name, "first");
        assert_eq!(records[1].product_name, "second");
        assert_eq!(records[0].country_code, "it");
    }

    #[test]
    fn success_with_empty_or_absent_data_is_an_empty_result() {
        assert!(decode_orders(r#"{"success":true,"data":[]}"#).unwrap().is_empty());
        assert!(decode_orders(r#"{"success":true}"#).unwrap().is_empty());
    }

    #[test]
    fn failure_envelope_carries_the_server_message() {
        let err = decode_orders(r#"{"success":false,"data":{"message":"Invalid nonce"}}"#)
            .unwrap_err();
        match err {
            FetchError::InvalidResponse(msg) => assert_eq!(msg, "Invalid nonce"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_an_invalid_response() {
        let err = decode_orders("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn record_list_is_truncated_to_ten() {
        let items: Vec<String> = (0..12).map(|i| record_json(&format!("p{i}"))).collect();
        let body = format!(r#"{{"success":true,"data":[{}]}}"#, items.join(","));
        let records = decode_orders(&body).unwrap();
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records[0].product_name, "p0");
    }

    #[test]
    fn missing_configuration_is_reported_before_any_request() {
        let settings = Settings {
            endpoint: None,
            token: None,
        };
        assert!(matches!(
            OrderClient::new(&settings),
            Err(FetchError::ConfigurationMissing)
        ));
    }

    #[test]
    fn missing_country_code_defaults_to_empty() {
        let body = r#"{"success":true,"data":[{"initials":"??","country":"",
            "product_name":"p","product_url":"u","product_image":"i","time_ago":"Just now"}]}"#;
        let records = decode_orders(body).unwrap();
        assert_eq!(records[0].country_code, "");
    }
}
