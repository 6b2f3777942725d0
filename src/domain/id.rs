use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::PaymentError;

macro_rules! provider_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, PaymentError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(PaymentError::Validation(format!(
                        "{} must not be empty",
                        $label
                    )));
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = PaymentError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

provider_id!(
    /// Processor order identifier, assigned on initiation.
    OrderId,
    "OrderId"
);

provider_id!(
    /// Processor capture identifier. Its presence on a session means funds
    /// were drawn.
    CaptureId,
    "CaptureId"
);

provider_id!(RefundId, "RefundId");

provider_id!(
    /// Caller-supplied token sent as `PayPal-Request-Id` so a mutating call
    /// can be retried without duplicating its effect.
    IdempotencyKey,
    "IdempotencyKey"
);

impl IdempotencyKey {
    /// Key for a follow-up call derived from the key of the call that
    /// created the session, e.g. `cart_42-capture`.
    pub fn derive(&self, step: &str) -> Self {
        Self(format!("{}-{step}", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ids_are_rejected() {
        assert!(OrderId::new("").is_err());
        assert!(CaptureId::new("   ").is_err());
        assert!(serde_json::from_str::<RefundId>("\"\"").is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = OrderId::new("5O190127TN364715T").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5O190127TN364715T\"");
        assert_eq!(id.to_string(), "5O190127TN364715T");
    }

    #[test]
    fn derived_idempotency_key_is_suffixed() {
        let key = IdempotencyKey::new("cart_42").unwrap();
        assert_eq!(key.derive("capture").as_str(), "cart_42-capture");
    }
}
