use {
    super::error::PaymentError,
    super::id::{CaptureId, IdempotencyKey, OrderId, RefundId},
    super::money::{CurrencyCode, MoneyAmount},
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    Pending,
    RequiresMore,
    Authorized,
    Captured,
    Canceled,
}

impl PaymentSessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::RequiresMore => "requires_more",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Canceled => "canceled",
        }
    }

    /// Lifecycle rank: higher means further along. `Pending` and
    /// `RequiresMore` share a rank so polling can flip between them.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending | Self::RequiresMore => 0,
            Self::Authorized => 1,
            Self::Captured | Self::Canceled => 2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Captured | Self::Canceled)
    }

    /// Re-observing the current status is always allowed.
    pub fn can_transition_to(&self, next: &PaymentSessionStatus) -> bool {
        if self == next {
            return true;
        }
        !self.is_terminal() && next.rank() >= self.rank()
    }
}

impl fmt::Display for PaymentSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentSessionStatus {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "requires_more" => Ok(Self::RequiresMore),
            "authorized" => Ok(Self::Authorized),
            "captured" => Ok(Self::Captured),
            "canceled" => Ok(Self::Canceled),
            other => Err(PaymentError::Validation(format!(
                "unknown payment session status: {other}"
            ))),
        }
    }
}

/// State the caller persists and hands back on every call. Fields the
/// adapter does not interpret are kept in `extra` and survive round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,

    /// Processor-hosted page the buyer must visit to approve the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approve_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<CaptureId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<RefundId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_status: Option<String>,

    /// Raw order status string last reported by the processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<CurrencyCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<MoneyAmount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_amount: Option<MoneyAmount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentSessionStatus>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentSessionData {
    /// Session data for a replacement order. Everything describing the
    /// order comes from `replacement` alone; only unknown fields survive
    /// from `self`.
    pub fn replace_order(self, replacement: PaymentSessionData) -> PaymentSessionData {
        let mut extra = self.extra;
        extra.extend(replacement.extra);
        PaymentSessionData {
            extra,
            ..replacement
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl ShippingAddress {
    /// Street, city, country and postal code are all present and non-blank.
    pub fn is_complete(&self) -> bool {
        [
            &self.address_1,
            &self.city,
            &self.country_code,
            &self.postal_code,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Caller data consumed only while creating the processor order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentContext {
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiatePaymentInput {
    pub amount: MoneyAmount,
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub context: PaymentContext,
    #[serde(default)]
    pub idempotency_key: Option<IdempotencyKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSessionResult {
    pub status: PaymentSessionStatus,
    pub data: PaymentSessionData,
}

impl PaymentSessionResult {
    pub fn new(status: PaymentSessionStatus, mut data: PaymentSessionData) -> Self {
        data.status = Some(status);
        Self { status, data }
    }
}

/// Outcome of handing a processor push notification to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WebhookAction {
    NotSupported,
}
