use std::env;
use std::time::Duration;

// ============================================================================
// Connector Configuration
// ============================================================================
//
// Immutable value object built once at startup and shared by reference.
// Components never read options ad hoc; the composition root constructs
// one PudoConfig and injects it everywhere.
//
// ============================================================================

const PROD_BASE_URL: &str = "https://partnerapi.pudoinc.com/PUDOService.svc";
const TEST_BASE_URL: &str = "https://testpartnerapi.pudoinc.com/PUDOService.svc";

/// Which carrier environment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Test => TEST_BASE_URL,
            Environment::Production => PROD_BASE_URL,
        }
    }
}

/// How the carrier notifies the customer that a parcel arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPreference {
    Sms,
    Email,
    SmsAndEmail,
}

impl NotificationPreference {
    /// Wire value expected by the carrier in `notificationPreference`.
    pub fn code(&self) -> &'static str {
        match self {
            NotificationPreference::Sms => "1",
            NotificationPreference::Email => "2",
            NotificationPreference::SmsAndEmail => "3",
        }
    }
}

/// Default parcel dimensions sent with every dealer search.
#[derive(Debug, Clone)]
pub struct ParcelDefaults {
    pub weight: f64,
    pub weight_unit: String,
    pub dimension_unit: String,
    pub width: f64,
    pub height: f64,
    pub length: f64,
}

impl Default for ParcelDefaults {
    fn default() -> Self {
        Self {
            weight: 5.0,
            weight_unit: "KG".to_string(),
            dimension_unit: "CM".to_string(),
            width: 10.0,
            height: 2.0,
            length: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PudoConfig {
    /// Partner account identifier issued by the carrier.
    pub partner_code: String,
    pub partner_password: String,
    pub environment: Environment,
    pub parcel: ParcelDefaults,
    pub notification_preference: NotificationPreference,
    /// TLS verification is on by default; disabling it is an explicit
    /// opt-in for the carrier test environment only.
    pub verify_tls: bool,
    /// Cadence of the status reconciliation loop.
    pub poll_interval: Duration,
    /// Hide pickup points further away than this from search results.
    pub max_point_distance_km: Option<f64>,
    /// Only offer pickup points supporting all of these service codes.
    pub required_services: Vec<String>,
}

impl PudoConfig {
    pub fn new(partner_code: impl Into<String>, partner_password: impl Into<String>) -> Self {
        Self {
            partner_code: partner_code.into(),
            partner_password: partner_password.into(),
            environment: Environment::Test,
            parcel: ParcelDefaults::default(),
            notification_preference: NotificationPreference::SmsAndEmail,
            verify_tls: true,
            poll_interval: Duration::from_secs(3600),
            max_point_distance_km: None,
            required_services: Vec::new(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    pub fn has_credentials(&self) -> bool {
        !self.partner_code.is_empty() && !self.partner_password.is_empty()
    }

    /// Build configuration from environment variables.
    ///
    /// `PUDO_PARTNER_CODE` and `PUDO_PARTNER_PASSWORD` are required; the
    /// rest fall back to the same defaults the carrier onboarding sheet
    /// recommends.
    pub fn from_env() -> anyhow::Result<Self> {
        let partner_code = env::var("PUDO_PARTNER_CODE")
            .map_err(|_| anyhow::anyhow!("PUDO_PARTNER_CODE is not set"))?;
        let partner_password = env::var("PUDO_PARTNER_PASSWORD")
            .map_err(|_| anyhow::anyhow!("PUDO_PARTNER_PASSWORD is not set"))?;

        let mut config = Self::new(partner_code, partner_password);

        if env::var("PUDO_PRODUCTION").is_ok_and(|v| v == "1" || v == "true") {
            config.environment = Environment::Production;
        }
        if env::var("PUDO_DISABLE_TLS_VERIFY").is_ok_and(|v| v == "1" || v == "true") {
            config.verify_tls = false;
        }
        if let Ok(secs) = env::var("PUDO_POLL_INTERVAL_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow::anyhow!("PUDO_POLL_INTERVAL_SECS must be an integer"))?;
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
