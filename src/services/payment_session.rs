use {
    crate::domain::{
        error::PaymentError,
        id::{IdempotencyKey, OrderId},
        money::MoneyAmount,
        payment::{
            InitiatePaymentInput, PaymentSessionData, PaymentSessionResult, PaymentSessionStatus,
            WebhookAction,
        },
        provider::{CreateOrder, OrderStatus, PaymentProcessor, ProviderCapture},
    },
    std::sync::Arc,
};

/// Drives a payment session through the processor. Sessions are owned by
/// the caller: every operation takes the data returned by the previous one
/// and returns the next `{status, data}`.
#[derive(Clone)]
pub struct PaymentSessionService {
    processor: Arc<dyn PaymentProcessor>,
}

impl PaymentSessionService {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    pub async fn initiate_payment(
        &self,
        input: &InitiatePaymentInput,
    ) -> Result<PaymentSessionResult, PaymentError> {
        let return_url = input
            .context
            .return_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                PaymentError::InvalidConfiguration(
                    "return_url is required to initiate a payment".into(),
                )
            })?;

        let cancel_url = input
            .context
            .cancel_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(return_url);

        let order = CreateOrder {
            amount: input.amount,
            currency_code: input.currency_code.clone(),
            return_url: return_url.to_string(),
            cancel_url: cancel_url.to_string(),
            payer_email: input.context.email.clone(),
            shipping_address: input
                .context
                .shipping_address
                .clone()
                .filter(|address| address.is_complete()),
        };

        let created = self
            .processor
            .create_order(&order, input.idempotency_key.as_ref())
            .await?;

        tracing::info!(
            order_id = %created.id,
            amount = %input.amount,
            currency = %input.currency_code,
            "payment initiated"
        );
        if created.approve_url.is_none() {
            tracing::warn!(order_id = %created.id, "order created without an approval link");
        }

        let data = PaymentSessionData {
            order_id: Some(created.id),
            approve_url: created.approve_url,
            provider_status: Some(created.status.as_str().to_string()),
            currency_code: Some(input.currency_code.clone()),
            amount: Some(input.amount),
            idempotency_key: input.idempotency_key.clone(),
            ..Default::default()
        };
        Ok(PaymentSessionResult::new(PaymentSessionStatus::Pending, data))
    }

    /// Replaces the order with one for the new amount. Only unknown fields
    /// carry over from `prior`. The input needs a fresh idempotency key, or
    /// the processor replays the original order.
    pub async fn update_payment(
        &self,
        prior: PaymentSessionData,
        input: &InitiatePaymentInput,
    ) -> Result<PaymentSessionResult, PaymentError> {
        if let Some(status) = prior.status.filter(PaymentSessionStatus::is_terminal) {
            return Err(PaymentError::Validation(format!(
                "cannot update a {status} payment session"
            )));
        }

        let result = self.initiate_payment(input).await?;
        Ok(PaymentSessionResult::new(
            result.status,
            prior.replace_order(result.data),
        ))
    }

    /// Polls the order and settles it: approved orders are captured right
    /// away, already-completed ones are recorded without a second capture.
    pub async fn authorize_payment(
        &self,
        data: PaymentSessionData,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<PaymentSessionResult, PaymentError> {
        let order_id = require_order_id(&data)?;
        if data.status == Some(PaymentSessionStatus::Canceled) {
            return Ok(PaymentSessionResult::new(PaymentSessionStatus::Canceled, data));
        }
        let order = self.processor.get_order(&order_id).await?;

        let mut data = data;
        data.provider_status = Some(order.status.as_str().to_string());
        if order.payer_id.is_some() {
            data.payer_id = order.payer_id.clone();
        }

        let status = match order.status {
            OrderStatus::Approved if data.capture_id.is_some() => {
                tracing::info!(order_id = %order_id, "capture already recorded, not capturing again");
                PaymentSessionStatus::Captured
            }
            OrderStatus::Approved => {
                let key = capture_key(&data, idempotency_key);
                let capture = self
                    .processor
                    .capture_order(&order_id, key.as_ref())
                    .await?;
                tracing::info!(
                    order_id = %order_id,
                    capture_id = %capture.capture_id,
                    "approved order captured"
                );
                record_capture(&mut data, capture);
                PaymentSessionStatus::Captured
            }
            OrderStatus::Completed => {
                if data.capture_id.is_none() {
                    data.capture_id = order.capture_id;
                }
                tracing::info!(order_id = %order_id, "order already completed, not capturing again");
                PaymentSessionStatus::Captured
            }
            OrderStatus::Voided => PaymentSessionStatus::Canceled,
            ref other => {
                tracing::debug!(order_id = %order_id, status = other.as_str(), "buyer approval pending");
                PaymentSessionStatus::RequiresMore
            }
        };

        Ok(settle(data, status))
    }

    /// No-op when already captured, when no order exists yet, or when the
    /// session was canceled.
    pub async fn capture_payment(
        &self,
        data: PaymentSessionData,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<PaymentSessionResult, PaymentError> {
        let current = data.status.unwrap_or(PaymentSessionStatus::Pending);
        if data.capture_id.is_some() {
            tracing::debug!(capture_id = ?data.capture_id, "capture already recorded");
            return Ok(PaymentSessionResult::new(PaymentSessionStatus::Captured, data));
        }
        let Some(order_id) = data.order_id.clone().filter(|_| !current.is_terminal()) else {
            return Ok(PaymentSessionResult::new(current, data));
        };

        let key = capture_key(&data, idempotency_key);
        let capture = self
            .processor
            .capture_order(&order_id, key.as_ref())
            .await?;
        tracing::info!(order_id = %order_id, capture_id = %capture.capture_id, "payment captured");

        let mut data = data;
        record_capture(&mut data, capture);
        Ok(settle(data, PaymentSessionStatus::Captured))
    }

    pub async fn refund_payment(
        &self,
        data: PaymentSessionData,
        amount: MoneyAmount,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<PaymentSessionResult, PaymentError> {
        let capture_id = data.capture_id.clone().ok_or_else(|| {
            PaymentError::InvalidConfiguration("no capture_id on session, nothing to refund".into())
        })?;
        let currency_code = data.currency_code.clone().ok_or_else(|| {
            PaymentError::InvalidConfiguration("no currency_code on session".into())
        })?;

        let refund = self
            .processor
            .refund_capture(&capture_id, amount, &currency_code, idempotency_key)
            .await?;
        tracing::info!(
            capture_id = %capture_id,
            refund_id = %refund.id,
            refund_status = %refund.status,
            amount = %amount,
            "refund issued"
        );

        let status = data.status.unwrap_or(PaymentSessionStatus::Captured);
        let mut data = data;
        data.refund_id = Some(refund.id);
        data.refund_status = Some(refund.status);
        Ok(PaymentSessionResult::new(status, data))
    }

    pub async fn retrieve_payment(
        &self,
        data: PaymentSessionData,
    ) -> Result<PaymentSessionResult, PaymentError> {
        let order_id = require_order_id(&data)?;
        let order = self.processor.get_order(&order_id).await?;

        let mut data = data;
        data.provider_status = Some(order.status.as_str().to_string());
        if data.capture_id.is_none() {
            data.capture_id = order.capture_id.clone();
        }
        if data.payer_id.is_none() {
            data.payer_id = order.payer_id.clone();
        }
        Ok(settle(data, order.status.session_status()))
    }

    pub async fn get_payment_status(
        &self,
        data: &PaymentSessionData,
    ) -> Result<PaymentSessionStatus, PaymentError> {
        let Some(order_id) = data.order_id.as_ref() else {
            return Ok(PaymentSessionStatus::Pending);
        };
        let order = self.processor.get_order(order_id).await?;
        Ok(order.status.session_status())
    }

    /// Nothing to undo on the processor for an unapproved order.
    pub async fn cancel_payment(
        &self,
        data: PaymentSessionData,
    ) -> Result<PaymentSessionResult, PaymentError> {
        Ok(settle(data, PaymentSessionStatus::Canceled))
    }

    pub async fn delete_payment(
        &self,
        data: PaymentSessionData,
    ) -> Result<PaymentSessionData, PaymentError> {
        Ok(data)
    }

    /// Status changes are discovered by polling `authorize_payment` or
    /// `get_payment_status`; there is no push channel.
    pub fn get_webhook_action_and_data(&self, _payload: &serde_json::Value) -> WebhookAction {
        WebhookAction::NotSupported
    }
}

fn require_order_id(data: &PaymentSessionData) -> Result<OrderId, PaymentError> {
    data.order_id.clone().ok_or_else(|| {
        PaymentError::InvalidConfiguration("no order_id on session, initiate the payment first".into())
    })
}

fn capture_key(
    data: &PaymentSessionData,
    supplied: Option<&IdempotencyKey>,
) -> Option<IdempotencyKey> {
    supplied
        .cloned()
        .or_else(|| data.idempotency_key.as_ref().map(|key| key.derive("capture")))
}

fn record_capture(data: &mut PaymentSessionData, capture: ProviderCapture) {
    if let (Some(captured), Some(expected)) = (capture.amount, data.amount) {
        if captured != expected {
            tracing::warn!(
                capture_id = %capture.capture_id,
                %captured,
                %expected,
                "captured amount differs from session amount"
            );
        }
    }
    data.capture_id = Some(capture.capture_id);
    data.captured_amount = capture.amount;
    data.provider_status = Some(capture.order_status.as_str().to_string());
    if capture.payer_id.is_some() {
        data.payer_id = capture.payer_id;
    }
}

/// Applies `next` unless it would move a terminal session backwards.
fn settle(data: PaymentSessionData, next: PaymentSessionStatus) -> PaymentSessionResult {
    let status = match data.status {
        Some(current) if !current.can_transition_to(&next) => {
            tracing::warn!(
                order_id = ?data.order_id,
                %current,
                %next,
                "anomalous status transition ignored"
            );
            current
        }
        _ => next,
    };
    PaymentSessionResult::new(status, data)
}
