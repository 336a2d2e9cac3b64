use crate::utils::retry::IsTransient;

// ============================================================================
// Carrier API Error Taxonomy
// ============================================================================
//
// Every failure mode of a carrier call normalizes into one of these
// variants; raw transport errors never cross the client boundary.
// Validation is detected before dispatch, so a Validation error
// guarantees no request was made.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    #[error("[{endpoint}] request failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },

    #[error("[{endpoint}] API request failed with status code: {status}")]
    HttpStatus { endpoint: &'static str, status: u16 },

    #[error("[{endpoint}] invalid JSON response from API: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation { .. } => None,
            ApiError::Transport { endpoint, .. }
            | ApiError::HttpStatus { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => Some(endpoint),
        }
    }
}

impl IsTransient for ApiError {
    fn is_transient(&self) -> bool {
        match self {
            // Connection failures and timeouts may clear on their own.
            ApiError::Transport { .. } => true,
            // Server-side trouble and throttling are worth another try;
            // 4xx means the request itself is wrong.
            ApiError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            ApiError::Validation { .. } | ApiError::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let transport = ApiError::Transport {
            endpoint: "SearchDealers",
            message: "connection refused".to_string(),
        };
        assert!(transport.is_transient());

        let server_error = ApiError::HttpStatus {
            endpoint: "PlaceShipmentStatus",
            status: 503,
        };
        assert!(server_error.is_transient());

        let bad_request = ApiError::HttpStatus {
            endpoint: "PlaceShipment",
            status: 400,
        };
        assert!(!bad_request.is_transient());

        let validation = ApiError::Validation {
            field: "customerMobile",
        };
        assert!(!validation.is_transient());
    }

    #[test]
    fn test_error_carries_endpoint() {
        let error = ApiError::HttpStatus {
            endpoint: "PlaceShipment",
            status: 500,
        };
        assert_eq!(error.endpoint(), Some("PlaceShipment"));
        assert!(error.to_string().contains("PlaceShipment"));
        assert!(error.to_string().contains("500"));
    }
}
