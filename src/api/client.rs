use std::sync::Arc;

use serde_json::json;

use super::errors::ApiError;
use super::transport::CarrierTransport;
use super::types::{
    DealerDto, PlaceShipmentRequest, SearchOverrides, ShipmentConfirmation, StatusResponse,
};
use crate::config::PudoConfig;
use crate::domain::{CarrierStatus, PickupPoint};
use crate::utils::retry::{retry_transient, RetryConfig};

// ============================================================================
// Carrier API Client
// ============================================================================
//
// Stateless wrapper over the carrier's three remote procedures. Every
// call injects partner credentials and the configured parcel defaults;
// caller-supplied overrides win. All failures normalize into ApiError
// and are reported through tracing before they reach the caller.
//
// Read-only endpoints (SearchDealers, PlaceShipmentStatus) retry
// transient failures; PlaceShipment is issued exactly once per call.
//
// ============================================================================

/// Probe postal code used for credential validation.
const PROBE_POSTAL_CODE: &str = "M5V 2T6";

pub struct CarrierClient {
    transport: Arc<dyn CarrierTransport>,
    config: Arc<PudoConfig>,
    retry: RetryConfig,
}

impl CarrierClient {
    pub fn new(transport: Arc<dyn CarrierTransport>, config: Arc<PudoConfig>) -> Self {
        Self {
            transport,
            config,
            retry: RetryConfig::conservative(),
        }
    }

    /// Search for pickup points near a postal code.
    pub async fn search_dealers(
        &self,
        postal_code: &str,
        overrides: &SearchOverrides,
    ) -> Result<Vec<PickupPoint>, ApiError> {
        let parcel = &self.config.parcel;
        let body = self.with_credentials(json!({
            "address": postal_code,
            "weight": overrides.weight.unwrap_or(parcel.weight),
            "weightUnit": overrides.weight_unit.as_deref().unwrap_or(&parcel.weight_unit),
            "dimensionUnit": overrides.dimension_unit.as_deref().unwrap_or(&parcel.dimension_unit),
            "width": overrides.width.unwrap_or(parcel.width),
            "height": overrides.height.unwrap_or(parcel.height),
            "length": overrides.length.unwrap_or(parcel.length),
        }));

        let endpoint = "SearchDealers";
        let raw = self.post_with_retry(endpoint, body).await?;

        let dealers: Vec<DealerDto> =
            serde_json::from_value(raw).map_err(|e| self.report(ApiError::Decode {
                endpoint,
                message: e.to_string(),
            }))?;

        tracing::debug!(
            postal_code = postal_code,
            dealer_count = dealers.len(),
            "Dealer search completed"
        );

        Ok(dealers.into_iter().map(PickupPoint::from).collect())
    }

    /// Register a shipment with the carrier. Validation failures return
    /// before any network traffic; the request itself is issued exactly
    /// once.
    pub async fn place_shipment(
        &self,
        request: &PlaceShipmentRequest,
    ) -> Result<ShipmentConfirmation, ApiError> {
        request.validate()?;

        let endpoint = "PlaceShipment";
        // validate() guarantees the struct serializes to an object.
        let body = self.with_credentials(
            serde_json::to_value(request).map_err(|e| ApiError::Decode {
                endpoint,
                message: e.to_string(),
            })?,
        );

        let raw = match self.transport.post(endpoint, &body).await {
            Ok(raw) => raw,
            Err(error) => return Err(self.report(error)),
        };

        tracing::info!(
            tracking_number = %request.tracking_number,
            dealer_id = %request.dealer_id,
            "Shipment registered with carrier"
        );

        Ok(ShipmentConfirmation { raw })
    }

    /// Fetch the current carrier status for a tracking number.
    pub async fn shipment_status(
        &self,
        tracking_number: &str,
    ) -> Result<CarrierStatus, ApiError> {
        let body = self.with_credentials(json!({ "trackingNumber": tracking_number }));

        let endpoint = "PlaceShipmentStatus";
        let raw = self.post_with_retry(endpoint, body).await?;

        let response: StatusResponse =
            serde_json::from_value(raw).map_err(|e| self.report(ApiError::Decode {
                endpoint,
                message: e.to_string(),
            }))?;

        Ok(response.status)
    }

    /// Probe the carrier with a known-good search to confirm the
    /// configured credentials work.
    pub async fn validate_credentials(&self) -> bool {
        if !self.config.has_credentials() {
            return false;
        }

        self.search_dealers(PROBE_POSTAL_CODE, &SearchOverrides::default())
            .await
            .is_ok()
    }

    fn with_credentials(&self, body: serde_json::Value) -> serde_json::Value {
        let mut body = body;
        if let Some(map) = body.as_object_mut() {
            map.insert("partnerCode".to_string(), json!(self.config.partner_code));
            map.insert(
                "partnerPassword".to_string(),
                json!(self.config.partner_password),
            );
        }
        body
    }

    async fn post_with_retry(
        &self,
        endpoint: &'static str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let result = retry_transient(&self.retry, |_attempt| {
            let body = body.clone();
            async move { self.transport.post(endpoint, &body).await }
        })
        .await;

        result.map_err(|error| self.report(error))
    }

    /// Structured error side channel: every failed carrier interaction
    /// is logged with its endpoint before the error propagates.
    fn report(&self, error: ApiError) -> ApiError {
        tracing::error!(
            endpoint = error.endpoint().unwrap_or("-"),
            error = %error,
            "Carrier API call failed"
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;

    fn client_with(transport: StubTransport) -> (CarrierClient, Arc<StubTransport>) {
        let transport = Arc::new(transport);
        let config = Arc::new(PudoConfig::new("partner", "secret"));
        (
            CarrierClient::new(transport.clone(), config),
            transport,
        )
    }

    fn dealer_json() -> serde_json::Value {
        json!([{
            "DealerId": "D100",
            "Name": "Corner Depot",
            "Address1": "123 King St W",
            "City": "Toronto",
            "State": "ON",
            "PostalCode": "M5V 2T6",
            "Distance": 1.2,
            "Latitude": 43.645,
            "Longitude": -79.39,
            "SupportedServices": ["AL"]
        }])
    }

    fn shipment_request() -> PlaceShipmentRequest {
        PlaceShipmentRequest {
            tracking_number: "PUDO-1700000000-1234-10042".to_string(),
            customer_email: "jo@example.com".to_string(),
            customer_mobile: "+14165550199".to_string(),
            notification_preference: "3".to_string(),
            customer_name: "Jo Smith".to_string(),
            customer_company: String::new(),
            dealer_id: "D100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_injects_credentials_and_defaults() {
        let (client, transport) = client_with(StubTransport::new(vec![Ok(dealer_json())]));

        let points = client
            .search_dealers("M5V 2T6", &SearchOverrides::default())
            .await
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "D100");

        let body = transport.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["partnerCode"], "partner");
        assert_eq!(body["partnerPassword"], "secret");
        assert_eq!(body["address"], "M5V 2T6");
        assert_eq!(body["weight"], 5.0);
        assert_eq!(body["weightUnit"], "KG");
        assert_eq!(body["width"], 10.0);
    }

    #[tokio::test]
    async fn test_search_overrides_win_over_defaults() {
        let (client, transport) = client_with(StubTransport::new(vec![Ok(json!([]))]));

        let overrides = SearchOverrides {
            weight: Some(12.5),
            weight_unit: Some("LB".to_string()),
            ..SearchOverrides::default()
        };
        client.search_dealers("M5V 2T6", &overrides).await.unwrap();

        let body = transport.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["weight"], 12.5);
        assert_eq!(body["weightUnit"], "LB");
        // Untouched fields keep their defaults.
        assert_eq!(body["height"], 2.0);
    }

    #[tokio::test]
    async fn test_place_shipment_validation_short_circuits() {
        let (client, transport) = client_with(StubTransport::new(vec![]));

        let mut request = shipment_request();
        request.customer_mobile = String::new();

        let error = client.place_shipment(&request).await.unwrap_err();

        assert!(matches!(
            error,
            ApiError::Validation { field: "customerMobile" }
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_place_shipment_is_issued_once() {
        let (client, transport) =
            client_with(StubTransport::new(vec![Ok(json!({"Result": "OK"}))]));

        let confirmation = client.place_shipment(&shipment_request()).await.unwrap();

        assert_eq!(confirmation.raw["Result"], "OK");
        assert_eq!(transport.call_count(), 1);

        let body = transport.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["partnerCode"], "partner");
        assert_eq!(body["dealerId"], "D100");
    }

    #[tokio::test]
    async fn test_place_shipment_failure_is_not_retried() {
        let (client, transport) = client_with(StubTransport::new(vec![Err(
            ApiError::Transport {
                endpoint: "PlaceShipment",
                message: "connection reset".to_string(),
            },
        )]));

        let error = client.place_shipment(&shipment_request()).await.unwrap_err();

        assert!(matches!(error, ApiError::Transport { .. }));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_status_retries_transient_failure() {
        let (client, transport) = client_with(StubTransport::new(vec![
            Err(ApiError::Transport {
                endpoint: "PlaceShipmentStatus",
                message: "timeout".to_string(),
            }),
            Ok(json!({"Status": "ARR"})),
        ]));

        let status = client.shipment_status("PUDO-1-0001-1").await.unwrap();

        assert_eq!(status, CarrierStatus::Arr);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_status_decode_error_is_normalized() {
        let (client, _) = client_with(StubTransport::new(vec![Ok(json!({"Status": "???"}))]));

        let error = client.shipment_status("PUDO-1-0001-1").await.unwrap_err();
        assert!(matches!(error, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_non_200_is_normalized() {
        let (client, _) = client_with(StubTransport::new(vec![Err(ApiError::HttpStatus {
            endpoint: "SearchDealers",
            status: 403,
        })]));

        let error = client
            .search_dealers("M5V 2T6", &SearchOverrides::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::HttpStatus { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_validate_credentials_requires_nonempty_config() {
        let transport = Arc::new(StubTransport::new(vec![Ok(dealer_json())]));
        let config = Arc::new(PudoConfig::new("", ""));
        let client = CarrierClient::new(transport.clone(), config);

        assert!(!client.validate_credentials().await);
        assert_eq!(transport.call_count(), 0);
    }
}
