pub mod payment_session;
