use {
    crate::domain::error::PaymentError,
    std::{env, fmt, str::FromStr, time::Duration},
};

const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
const LIVE_BASE_URL: &str = "https://api-m.paypal.com";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Sandbox,
    Live,
}

impl Mode {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

impl FromStr for Mode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(PaymentError::InvalidConfiguration(format!(
                "mode must be `sandbox` or `live`, got: {other}"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub mode: Mode,
    /// Shown on the processor's hosted approval page.
    pub brand_name: Option<String>,
    /// Replaces the mode's base URL (tests, egress proxies).
    pub api_base_url: Option<String>,
    pub request_timeout: Duration,
}

impl PaypalConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            mode: Mode::default(),
            brand_name: None,
            api_base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = Some(brand_name.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads `PAYPAL_*` variables. Call `dotenvy::dotenv()` first to pick up
    /// a `.env` file.
    pub fn from_env() -> Result<Self, PaymentError> {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            var("PAYPAL_CLIENT_ID").unwrap_or_default(),
            var("PAYPAL_CLIENT_SECRET").unwrap_or_default(),
        );
        if let Some(mode) = var("PAYPAL_MODE") {
            config.mode = mode.parse()?;
        }
        config.brand_name = var("PAYPAL_BRAND_NAME");
        config.api_base_url = var("PAYPAL_API_BASE_URL");
        if let Some(secs) = var("PAYPAL_REQUEST_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                PaymentError::InvalidConfiguration(format!(
                    "PAYPAL_REQUEST_TIMEOUT_SECS must be a whole number, got: {secs}"
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.client_id.trim().is_empty() {
            return Err(PaymentError::InvalidConfiguration(
                "client_id is required".into(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(PaymentError::InvalidConfiguration(
                "client_secret is required".into(),
            ));
        }
        Ok(())
    }

    /// Budget for one inbound operation. Authorize can chain a token
    /// exchange, an order fetch and a capture.
    pub fn operation_timeout(&self) -> Duration {
        self.request_timeout.saturating_mul(3)
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.base_url())
            .trim_end_matches('/')
    }
}

impl fmt::Debug for PaypalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaypalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("mode", &self.mode)
            .field("brand_name", &self.brand_name)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
