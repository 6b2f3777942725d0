use {
    paypal_sync::{
        AppState, adapters::http, adapters::paypal::PaypalClient, config::PaypalConfig,
        services::payment_session::PaymentSessionService,
    },
    std::{env, sync::Arc},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = PaypalConfig::from_env().expect("invalid PayPal configuration");
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let operation_timeout = config.operation_timeout();

    tracing::info!(mode = ?config.mode, "starting payment adapter");
    let client = PaypalClient::new(config).expect("failed to build PayPal client");

    let state = AppState {
        sessions: PaymentSessionService::new(Arc::new(client)),
    };

    let app = http::router(state, operation_timeout);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
