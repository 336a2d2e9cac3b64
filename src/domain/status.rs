use serde::{Deserialize, Serialize};

// ============================================================================
// Carrier Status State Machine
// ============================================================================
//
// The carrier reports one of four codes for a registered shipment:
//
//   REG -> ARR -> { DEL, RET }
//
// DEL and RET are terminal. Locally, "no status yet" is represented as
// Option<CarrierStatus>::None on the shipment record, so the full walk is
// None -> Reg -> Arr -> { Del, Ret }.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CarrierStatus {
    Reg,
    Arr,
    Del,
    Ret,
}

impl CarrierStatus {
    /// Wire code as sent and received by the carrier.
    pub fn code(&self) -> &'static str {
        match self {
            CarrierStatus::Reg => "REG",
            CarrierStatus::Arr => "ARR",
            CarrierStatus::Del => "DEL",
            CarrierStatus::Ret => "RET",
        }
    }

    /// Human-readable description for order notes and tracking display.
    pub fn description(&self) -> &'static str {
        match self {
            CarrierStatus::Reg => "Pending Delivery to Location",
            CarrierStatus::Arr => "Scan In at Location",
            CarrierStatus::Del => "Picked Up By Customer",
            CarrierStatus::Ret => "Returned to Courier",
        }
    }

    /// Terminal statuses end the shipment lifecycle; nothing may be
    /// recorded after them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CarrierStatus::Del | CarrierStatus::Ret)
    }

    /// Position in the forward-only walk. Both terminal statuses share
    /// the final rank since either can follow Arr.
    pub fn rank(&self) -> u8 {
        match self {
            CarrierStatus::Reg => 1,
            CarrierStatus::Arr => 2,
            CarrierStatus::Del | CarrierStatus::Ret => 3,
        }
    }

    /// Whether moving from `current` (None = nothing recorded yet) to
    /// `self` is a forward step of the state machine.
    pub fn follows(&self, current: Option<CarrierStatus>) -> bool {
        match current {
            None => true,
            Some(current) if current.is_terminal() => false,
            Some(current) => self.rank() > current.rank(),
        }
    }
}

impl std::fmt::Display for CarrierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_round_trip() {
        for status in [
            CarrierStatus::Reg,
            CarrierStatus::Arr,
            CarrierStatus::Del,
            CarrierStatus::Ret,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.code()));
            let parsed: CarrierStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(serde_json::from_str::<CarrierStatus>("\"XYZ\"").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!CarrierStatus::Reg.is_terminal());
        assert!(!CarrierStatus::Arr.is_terminal());
        assert!(CarrierStatus::Del.is_terminal());
        assert!(CarrierStatus::Ret.is_terminal());
    }

    #[test]
    fn test_forward_walk() {
        assert!(CarrierStatus::Reg.follows(None));
        assert!(CarrierStatus::Arr.follows(Some(CarrierStatus::Reg)));
        assert!(CarrierStatus::Del.follows(Some(CarrierStatus::Arr)));
        assert!(CarrierStatus::Ret.follows(Some(CarrierStatus::Arr)));

        // The carrier may skip intermediate scans.
        assert!(CarrierStatus::Del.follows(Some(CarrierStatus::Reg)));
        assert!(CarrierStatus::Arr.follows(None));
    }

    #[test]
    fn test_never_moves_backward() {
        assert!(!CarrierStatus::Reg.follows(Some(CarrierStatus::Arr)));
        assert!(!CarrierStatus::Reg.follows(Some(CarrierStatus::Reg)));
    }

    #[test]
    fn test_terminal_is_never_followed() {
        for next in [
            CarrierStatus::Reg,
            CarrierStatus::Arr,
            CarrierStatus::Del,
            CarrierStatus::Ret,
        ] {
            assert!(!next.follows(Some(CarrierStatus::Del)));
            assert!(!next.follows(Some(CarrierStatus::Ret)));
        }
    }
}
