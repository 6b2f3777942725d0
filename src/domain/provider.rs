use {
    super::error::PaymentError,
    super::id::{CaptureId, IdempotencyKey, OrderId, RefundId},
    super::money::{CurrencyCode, MoneyAmount},
    super::payment::{PaymentSessionStatus, ShippingAddress},
    std::{future::Future, pin::Pin},
};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PaymentError>> + Send + 'a>>;

/// Order status as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    PayerActionRequired,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Saved => "SAVED",
            Self::Approved => "APPROVED",
            Self::Voided => "VOIDED",
            Self::Completed => "COMPLETED",
            Self::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            Self::Other(raw) => raw,
        }
    }

    /// Read-only view of the order, used by retrieve/status.
    pub fn session_status(&self) -> PaymentSessionStatus {
        match self {
            Self::Completed => PaymentSessionStatus::Captured,
            Self::Approved => PaymentSessionStatus::Authorized,
            Self::Voided => PaymentSessionStatus::Canceled,
            _ => PaymentSessionStatus::Pending,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATED" => Self::Created,
            "SAVED" => Self::Saved,
            "APPROVED" => Self::Approved,
            "VOIDED" => Self::Voided,
            "COMPLETED" => Self::Completed,
            "PAYER_ACTION_REQUIRED" => Self::PayerActionRequired,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Everything the processor needs to open a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub amount: MoneyAmount,
    pub currency_code: CurrencyCode,
    pub return_url: String,
    pub cancel_url: String,
    pub payer_email: Option<String>,
    /// Only set when the address is complete.
    pub shipping_address: Option<ShippingAddress>,
}

/// What the service layer gets back after creating or fetching an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrder {
    pub id: OrderId,
    pub status: OrderStatus,
    pub approve_url: Option<String>,
    pub payer_id: Option<String>,
    /// First capture recorded on the order, if any.
    pub capture_id: Option<CaptureId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCapture {
    pub order_status: OrderStatus,
    pub capture_id: CaptureId,
    /// Amount the processor says it captured, when the response carries one.
    pub amount: Option<MoneyAmount>,
    pub payer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRefund {
    pub id: RefundId,
    pub status: String,
}

pub trait PaymentProcessor: Send + Sync {
    fn create_order<'a>(
        &'a self,
        order: &'a CreateOrder,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderOrder>;

    fn get_order<'a>(&'a self, id: &'a OrderId) -> ProviderFuture<'a, ProviderOrder>;

    fn capture_order<'a>(
        &'a self,
        id: &'a OrderId,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderCapture>;

    fn refund_capture<'a>(
        &'a self,
        id: &'a CaptureId,
        amount: MoneyAmount,
        currency_code: &'a CurrencyCode,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderRefund>;
}
