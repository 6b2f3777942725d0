use {
    super::TokenResponse,
    crate::domain::error::PaymentError,
    chrono::{DateTime, TimeDelta, Utc},
    tokio::sync::Mutex,
};

/// Tokens are treated as expired this long before the processor says so.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response.expires_in.saturating_sub(EXPIRY_MARGIN_SECS).max(0);
        // An unrepresentable expiry leaves the token already stale.
        let expires_at = TimeDelta::try_seconds(lifetime)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(now);
        Self {
            value: response.access_token,
            expires_at,
        }
    }

    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Process-local OAuth2 client-credentials token. The lock is held across
/// the exchange, so concurrent callers that find the token stale wait for a
/// single refresh instead of each starting their own.
pub struct TokenCache {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{base_url}/v1/oauth2/token"),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    pub async fn get_access_token(&self) -> Result<String, PaymentError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_valid(Utc::now())) {
            return Ok(token.value.clone());
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drops the cached token; the next call re-authenticates.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn exchange(&self) -> Result<AccessToken, PaymentError> {
        tracing::debug!(url = %self.token_url, "requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaymentError::Authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Authentication(format!("token response unreadable: {e}")))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "access token exchange rejected");
            return Err(PaymentError::Authentication(body));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Authentication(format!("malformed token response: {e}")))?;

        let token = AccessToken::from_response(parsed, Utc::now());
        tracing::info!(expires_at = %token.expires_at, "access token refreshed");
        Ok(token)
    }
}
