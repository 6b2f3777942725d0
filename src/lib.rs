pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use services::payment_session::PaymentSessionService;

#[derive(Clone)]
pub struct AppState {
    pub sessions: PaymentSessionService,
}
