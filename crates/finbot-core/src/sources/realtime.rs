use serde::Deserialize;

use super::BackendClient;
use crate::domain::{PriceSnapshot, Symbol};
use crate::FetchError;

#[derive(Debug, Deserialize)]
struct RealtimePayload {
    #[serde(default)]
    data: Option<PriceSnapshot>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendClient {
    /// Latest quote for `symbol`.
    pub async fn realtime(&self, symbol: &Symbol) -> Result<PriceSnapshot, FetchError> {
        let payload: RealtimePayload = self.get_json(self.config.realtime_url(symbol)).await?;

        if let Some(error) = payload.error.filter(|error| !error.is_empty()) {
            return Err(FetchError::Payload(error));
        }

        payload
            .data
            .ok_or_else(|| FetchError::Decode(String::from("realtime payload has no data")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_ignores_extra_quote_fields() {
        let payload: RealtimePayload = serde_json::from_str(
            r#"{"error":null,"data":{"current_price":189.5,"change":1.25,"percent_change":0.66,
                "high":190.0,"low":187.1,"open":188.0,"previous_close":188.25,"symbol":"AAPL"}}"#,
        )
        .expect("payload decodes");

        assert!(payload.error.is_none());
        assert_eq!(payload.data.map(|d| d.current_price), Some(189.5));
    }

    #[test]
    fn error_only_payload_decodes() {
        let payload: RealtimePayload =
            serde_json::from_str(r#"{"error":"No data available for this symbol"}"#)
                .expect("payload decodes");

        assert!(payload.data.is_none());
        assert_eq!(payload.error.as_deref(), Some("No data available for this symbol"));
    }
}
