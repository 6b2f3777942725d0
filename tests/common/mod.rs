#![allow(dead_code)]

use paypal_sync::domain::error::PaymentError;
use paypal_sync::domain::id::{CaptureId, IdempotencyKey, OrderId, RefundId};
use paypal_sync::domain::money::{CurrencyCode, MoneyAmount};
use paypal_sync::domain::payment::{InitiatePaymentInput, PaymentContext};
use paypal_sync::domain::provider::{
    CreateOrder, OrderStatus, PaymentProcessor, ProviderCapture, ProviderFuture, ProviderOrder,
    ProviderRefund,
};
use paypal_sync::services::payment_session::PaymentSessionService;
use std::sync::{Arc, Mutex};

pub const ORDER_ID: &str = "5O190127TN364715T";
pub const CAPTURE_ID: &str = "3C679366HH908993F";
pub const APPROVE_URL: &str = "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T";

/// In-memory processor that records every call it receives.
pub struct FakeProcessor {
    pub order_status: Mutex<OrderStatus>,
    /// Capture id carried on the order representation (set for completed orders).
    pub order_capture_id: Mutex<Option<CaptureId>>,
    pub fail_with: Mutex<Option<(u16, String)>>,
    pub created: Mutex<Vec<(CreateOrder, Option<IdempotencyKey>)>>,
    pub fetched: Mutex<Vec<OrderId>>,
    pub captured: Mutex<Vec<(OrderId, Option<IdempotencyKey>)>>,
    pub refunded: Mutex<Vec<(CaptureId, MoneyAmount, CurrencyCode, Option<IdempotencyKey>)>>,
}

impl FakeProcessor {
    pub fn new(order_status: OrderStatus) -> Arc<Self> {
        Arc::new(Self {
            order_status: Mutex::new(order_status),
            order_capture_id: Mutex::new(None),
            fail_with: Mutex::new(None),
            created: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
            captured: Mutex::new(Vec::new()),
            refunded: Mutex::new(Vec::new()),
        })
    }

    pub fn set_status(&self, status: OrderStatus) {
        *self.order_status.lock().unwrap() = status;
    }

    pub fn fail_next(&self, status: u16, body: &str) {
        *self.fail_with.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn capture_count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<(), PaymentError> {
        match self.fail_with.lock().unwrap().take() {
            Some((status, body)) => Err(PaymentError::ProviderRequest { status, body }),
            None => Ok(()),
        }
    }

    fn order(&self) -> ProviderOrder {
        ProviderOrder {
            id: OrderId::new(ORDER_ID).unwrap(),
            status: self.order_status.lock().unwrap().clone(),
            approve_url: Some(APPROVE_URL.to_string()),
            payer_id: Some("QYR5Z8XDVJNXQ".to_string()),
            capture_id: self.order_capture_id.lock().unwrap().clone(),
        }
    }
}

impl PaymentProcessor for FakeProcessor {
    fn create_order<'a>(
        &'a self,
        order: &'a CreateOrder,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderOrder> {
        Box::pin(async move {
            self.check_failure()?;
            self.created
                .lock()
                .unwrap()
                .push((order.clone(), idempotency_key.cloned()));
            let mut created = self.order();
            created.status = OrderStatus::Created;
            created.capture_id = None;
            Ok(created)
        })
    }

    fn get_order<'a>(&'a self, id: &'a OrderId) -> ProviderFuture<'a, ProviderOrder> {
        Box::pin(async move {
            self.check_failure()?;
            self.fetched.lock().unwrap().push(id.clone());
            Ok(self.order())
        })
    }

    fn capture_order<'a>(
        &'a self,
        id: &'a OrderId,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderCapture> {
        Box::pin(async move {
            self.check_failure()?;
            self.captured
                .lock()
                .unwrap()
                .push((id.clone(), idempotency_key.cloned()));
            self.set_status(OrderStatus::Completed);
            Ok(ProviderCapture {
                order_status: OrderStatus::Completed,
                capture_id: CaptureId::new(CAPTURE_ID).unwrap(),
                amount: Some(MoneyAmount::new(2500).unwrap()),
                payer_id: Some("QYR5Z8XDVJNXQ".to_string()),
            })
        })
    }

    fn refund_capture<'a>(
        &'a self,
        id: &'a CaptureId,
        amount: MoneyAmount,
        currency_code: &'a CurrencyCode,
        idempotency_key: Option<&'a IdempotencyKey>,
    ) -> ProviderFuture<'a, ProviderRefund> {
        Box::pin(async move {
            self.check_failure()?;
            self.refunded.lock().unwrap().push((
                id.clone(),
                amount,
                currency_code.clone(),
                idempotency_key.cloned(),
            ));
            Ok(ProviderRefund {
                id: RefundId::new("1JU08902781691411").unwrap(),
                status: "COMPLETED".to_string(),
            })
        })
    }
}

pub fn service(processor: &Arc<FakeProcessor>) -> PaymentSessionService {
    PaymentSessionService::new(processor.clone())
}

/// Initiation input with a return URL and an idempotency key.
pub fn make_input(amount: i64, currency: &str) -> InitiatePaymentInput {
    InitiatePaymentInput {
        amount: MoneyAmount::new(amount).unwrap(),
        currency_code: CurrencyCode::new(currency).unwrap(),
        context: PaymentContext {
            return_url: Some("https://x/return".to_string()),
            ..Default::default()
        },
        idempotency_key: Some(IdempotencyKey::new("cart_01HZX").unwrap()),
    }
}
