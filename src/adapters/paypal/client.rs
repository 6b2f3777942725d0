use {
    super::{AmountWire, CreateOrderRequest, OrderResponse, RefundRequest, RefundResponse, TokenCache},
    crate::{
        config::PaypalConfig,
        domain::{
            error::PaymentError,
            id::{CaptureId, IdempotencyKey, OrderId},
            money::{CurrencyCode, MoneyAmount, to_wire_amount},
            provider::{
                CreateOrder, PaymentProcessor, ProviderCapture, ProviderFuture, ProviderOrder,
                ProviderRefund,
            },
        },
    },
    reqwest::{Method, StatusCode},
    serde::de::DeserializeOwned,
};

const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

pub struct PaypalClient {
    http: reqwest::Client,
    base_url: String,
    brand_name: Option<String>,
    tokens: TokenCache,
}

impl PaypalClient {
    /// Fails with `InvalidConfiguration` before touching the network when
    /// credentials are missing.
    pub fn new(config: PaypalConfig) -> Result<Self, PaymentError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let base_url = config.base_url().to_string();
        let tokens = TokenCache::new(
            http.clone(),
            &base_url,
            config.client_id,
            config.client_secret,
        );

        tracing::info!(base_url = %base_url, "paypal client configured");
        Ok(Self {
            http,
            base_url,
            brand_name: config.brand_name,
            tokens,
        })
    }

    /// Authenticated JSON call. `idempotency_key` is only passed by mutating
    /// calls; non-2xx answers become `ProviderRequest`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<T, PaymentError> {
        let token = self.tokens.get_access_token().await?;
        let url = format!("{}{path}", self.base_url);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header("Prefer", "return=representation");
        if let Some(key) = idempotency_key {
            req = req.header(REQUEST_ID_HEADER, key.as_str());
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
            }
            tracing::warn!(%method, path, status = status.as_u16(), "provider request failed");
            return Err(PaymentError::ProviderRequest {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(%method, path, status = status.as_u16(), "provider request succeeded");
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }

    async fn create_order_inner(
        &self,
        order: &CreateOrder,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<ProviderOrder, PaymentError> {
        let body = serde_json::to_value(CreateOrderRequest::new(
            order,
            self.brand_name.as_deref(),
        ))?;
        let response: OrderResponse = self
            .request(Method::POST, "/v2/checkout/orders", Some(&body), idempotency_key)
            .await?;
        ProviderOrder::try_from(response)
    }

    async fn get_order_inner(&self, id: &OrderId) -> Result<ProviderOrder, PaymentError> {
        let path = format!("/v2/checkout/orders/{id}");
        let response: OrderResponse = self.request(Method::GET, &path, None, None).await?;
        ProviderOrder::try_from(response)
    }

    async fn capture_order_inner(
        &self,
        id: &OrderId,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<ProviderCapture, PaymentError> {
        let path = format!("/v2/checkout/orders/{id}/capture");
        let response: OrderResponse = self
            .request(
                Method::POST,
                &path,
                Some(&serde_json::json!({})),
                idempotency_key,
            )
            .await?;
        ProviderCapture::try_from(response)
    }

    async fn refund_capture_inner(
        &self,
        id: &CaptureId,
        amount: MoneyAmount,
        currency_code: &CurrencyCode,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<ProviderRefund, PaymentError> {
        let path = format!("/v2/payments/captures/{id}/refund");
        let body = serde_json::to_value(RefundRequest {
            amount: AmountWire {
                currency_code: currency_code.to_string(),
                value: to_wire_amount(amount, currency_code),
            },
        })?;
        let response: RefundResponse = self
            .request(Method::POST, &path, Some(&body), idempotency_key)
            .await?;
        ProviderRefund::try_from(response)
    }
}

impl PaymentProcessor for PaypalClient {
    fn create_order<'a>(
        &'a self,
        order: &'a CreateOrder,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderOrder> {
        Box::pin(self.create_order_inner(order, idempotency_key))
    }

    fn get_order<'a>(&'a self, id: &'a OrderId) -> ProviderFuture<'a, ProviderOrder> {
        Box::pin(self.get_order_inner(id))
    }

    fn capture_order<'a>(
        &'a self,
        id: &'a OrderId,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderCapture> {
        Box::pin(self.capture_order_inner(id, idempotency_key))
    }

    fn refund_capture<'a>(
        &'a self,
        id: &'a CaptureId,
        amount: MoneyAmount,
        currency_code: &'a CurrencyCode,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderRefund> {
        Box::pin(self.refund_capture_inner(id, amount, currency_code, idempotency_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_without_credentials_fails_fast() {
        let err = PaypalClient::new(PaypalConfig::new("", "secret")).err().unwrap();
        assert!(matches!(err, PaymentError::InvalidConfiguration(_)));
    }

    #[test]
    fn construction_with_credentials_succeeds() {
        let client = PaypalClient::new(
            PaypalConfig::new("client", "secret").with_api_base_url("http://127.0.0.1:1/"),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:1");
    }
}
