pub mod client;
pub mod token;

use {
    crate::domain::{
        error::PaymentError,
        id::{CaptureId, OrderId, RefundId},
        money::{CurrencyCode, MoneyAmount, from_wire_amount, to_wire_amount},
        payment::ShippingAddress,
        provider::{CreateOrder, OrderStatus, ProviderCapture, ProviderOrder, ProviderRefund},
    },
    serde::{Deserialize, Serialize},
};

pub use client::PaypalClient;
pub use token::TokenCache;

// ── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnitRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<PayerRequest>,
    pub application_context: ApplicationContext,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitRequest {
    pub amount: AmountWire,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountWire {
    pub currency_code: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ShippingWire {
    pub address: AddressWire,
}

#[derive(Debug, Serialize)]
pub struct AddressWire {
    pub address_line_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// City.
    pub admin_area_2: String,
    /// State or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_area_1: Option<String>,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
pub struct PayerRequest {
    pub email_address: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationContext {
    pub return_url: String,
    pub cancel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    pub shipping_preference: ShippingPreference,
    pub user_action: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
    SetProvidedAddress,
    GetFromFile,
}

#[derive(Debug, Serialize)]
pub struct RefundRequest {
    pub amount: AmountWire,
}

impl CreateOrderRequest {
    pub fn new(order: &CreateOrder, brand_name: Option<&str>) -> Self {
        let shipping = order
            .shipping_address
            .as_ref()
            .and_then(AddressWire::from_complete)
            .map(|address| ShippingWire { address });

        let shipping_preference = if shipping.is_some() {
            ShippingPreference::SetProvidedAddress
        } else {
            ShippingPreference::GetFromFile
        };

        Self {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnitRequest {
                amount: AmountWire {
                    currency_code: order.currency_code.to_string(),
                    value: to_wire_amount(order.amount, &order.currency_code),
                },
                shipping,
            }],
            payer: order.payer_email.clone().map(|email_address| PayerRequest { email_address }),
            application_context: ApplicationContext {
                return_url: order.return_url.clone(),
                cancel_url: order.cancel_url.clone(),
                brand_name: brand_name.map(str::to_string),
                shipping_preference,
                user_action: "PAY_NOW",
            },
        }
    }
}

impl AddressWire {
    /// `None` unless street, city, postal code and country are all present.
    fn from_complete(address: &ShippingAddress) -> Option<Self> {
        if !address.is_complete() {
            return None;
        }
        Some(Self {
            address_line_1: address.address_1.clone()?,
            address_line_2: address.address_2.clone().filter(|v| !v.trim().is_empty()),
            admin_area_2: address.city.clone()?,
            admin_area_1: address.province.clone().filter(|v| !v.trim().is_empty()),
            postal_code: address.postal_code.clone()?,
            country_code: address.country_code.as_deref()?.to_ascii_uppercase(),
        })
    }
}

// ── Response bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub payer: Option<Payer>,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnitResponse>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Deserialize)]
pub struct Payer {
    #[serde(default)]
    pub payer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseUnitResponse {
    #[serde(default)]
    pub payments: Option<PaymentsResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentsResponse {
    #[serde(default)]
    pub captures: Vec<CaptureResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountWire>,
}

#[derive(Debug, Deserialize)]
pub struct RefundResponse {
    pub id: String,
    pub status: String,
}

impl OrderResponse {
    /// First link whose relation is the buyer-approval action.
    pub fn approve_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approve" || link.rel == "payer-action")
            .map(|link| link.href.as_str())
    }

    pub fn first_capture(&self) -> Option<&CaptureResponse> {
        self.purchase_units
            .iter()
            .filter_map(|unit| unit.payments.as_ref())
            .flat_map(|payments| payments.captures.iter())
            .next()
    }

    pub fn first_capture_id(&self) -> Option<&str> {
        self.first_capture().map(|capture| capture.id.as_str())
    }

    fn payer_id(&self) -> Option<String> {
        self.payer.as_ref().and_then(|payer| payer.payer_id.clone())
    }
}

impl AmountWire {
    /// Minor-unit amount the processor reported. A malformed value on a
    /// successful response is the processor's fault, not the caller's.
    pub fn to_money(&self) -> Result<MoneyAmount, PaymentError> {
        CurrencyCode::new(&self.currency_code)
            .and_then(|currency| from_wire_amount(&self.value, &currency))
            .map_err(|e| PaymentError::UnexpectedResponse(e.to_string()))
    }
}

fn capture_id_from_wire(id: &str) -> Result<CaptureId, PaymentError> {
    CaptureId::new(id).map_err(|e| PaymentError::UnexpectedResponse(e.to_string()))
}

impl TryFrom<OrderResponse> for ProviderOrder {
    type Error = PaymentError;

    fn try_from(order: OrderResponse) -> Result<Self, Self::Error> {
        Ok(ProviderOrder {
            id: OrderId::new(order.id.as_str())
                .map_err(|e| PaymentError::UnexpectedResponse(e.to_string()))?,
            status: OrderStatus::from(order.status.as_str()),
            approve_url: order.approve_url().map(str::to_string),
            payer_id: order.payer_id(),
            capture_id: order
                .first_capture_id()
                .map(capture_id_from_wire)
                .transpose()?,
        })
    }
}

impl TryFrom<OrderResponse> for ProviderCapture {
    type Error = PaymentError;

    fn try_from(order: OrderResponse) -> Result<Self, Self::Error> {
        let capture = order.first_capture().ok_or_else(|| {
            PaymentError::UnexpectedResponse(format!(
                "capture of order {} returned no capture id",
                order.id
            ))
        })?;

        Ok(ProviderCapture {
            order_status: OrderStatus::from(order.status.as_str()),
            capture_id: capture_id_from_wire(&capture.id)?,
            amount: capture.amount.as_ref().map(AmountWire::to_money).transpose()?,
            payer_id: order.payer_id(),
        })
    }
}

impl TryFrom<RefundResponse> for ProviderRefund {
    type Error = PaymentError;

    fn try_from(refund: RefundResponse) -> Result<Self, Self::Error> {
        Ok(ProviderRefund {
            id: RefundId::new(refund.id)
                .map_err(|e| PaymentError::UnexpectedResponse(e.to_string()))?,
            status: refund.status,
        })
    }
}
