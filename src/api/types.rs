use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use crate::domain::{CarrierStatus, PickupPoint};

// ============================================================================
// Carrier Wire Types
// ============================================================================
//
// Request bodies use camelCase keys; dealer responses come back in
// PascalCase. Partner credentials are injected by the client, not
// carried on these types.
//
// ============================================================================

/// Caller-supplied parcel overrides for a dealer search. Anything left
/// as None falls back to the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub dimension_unit: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
}

/// Body of `POST /PlaceShipment`, minus the injected credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceShipmentRequest {
    pub tracking_number: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub notification_preference: String,
    pub customer_name: String,
    pub customer_company: String,
    pub dealer_id: String,
}

impl PlaceShipmentRequest {
    /// Fail fast before any network call when a required field is empty.
    pub fn validate(&self) -> Result<(), ApiError> {
        let required: [(&'static str, &str); 4] = [
            ("trackingNumber", &self.tracking_number),
            ("customerEmail", &self.customer_email),
            ("customerMobile", &self.customer_mobile),
            ("notificationPreference", &self.notification_preference),
        ];

        for (field, value) in required {
            if value.is_empty() {
                return Err(ApiError::Validation { field });
            }
        }

        Ok(())
    }
}

/// Success payload of `POST /PlaceShipment`. The carrier does not
/// document the shape, so the raw body is kept for logging/inspection.
#[derive(Debug, Clone)]
pub struct ShipmentConfirmation {
    pub raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DealerDto {
    #[serde(rename = "DealerId")]
    pub dealer_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address1")]
    pub address1: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "PostalCode")]
    pub postal_code: String,
    #[serde(rename = "Distance", default)]
    pub distance: f64,
    #[serde(rename = "Latitude", default)]
    pub latitude: f64,
    #[serde(rename = "Longitude", default)]
    pub longitude: f64,
    #[serde(rename = "SupportedServices", default)]
    pub supported_services: Vec<String>,
}

impl From<DealerDto> for PickupPoint {
    fn from(dto: DealerDto) -> Self {
        Self {
            id: dto.dealer_id,
            name: dto.name,
            address: dto.address1,
            city: dto.city,
            state: dto.state,
            postal_code: dto.postal_code,
            distance: dto.distance,
            latitude: dto.latitude,
            longitude: dto.longitude,
            supported_services: dto.supported_services,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(rename = "Status")]
    pub status: CarrierStatus,
}
