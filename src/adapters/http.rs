use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::{
            id::IdempotencyKey,
            money::MoneyAmount,
            payment::{
                InitiatePaymentInput, PaymentSessionData, PaymentSessionResult,
                PaymentSessionStatus, WebhookAction,
            },
        },
    },
    axum::{
        Json, Router,
        extract::{DefaultBodyLimit, State},
        routing::{get, post},
    },
    serde::{Deserialize, Serialize},
    std::time::Duration,
    tower_http::timeout::TimeoutLayer,
};

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub data: PaymentSessionData,
    #[serde(default)]
    pub idempotency_key: Option<IdempotencyKey>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub data: PaymentSessionData,
    #[serde(flatten)]
    pub input: InitiatePaymentInput,
}

#[derive(Debug, Deserialize)]
pub struct RefundSessionRequest {
    #[serde(default)]
    pub data: PaymentSessionData,
    pub amount: MoneyAmount,
    #[serde(default)]
    pub idempotency_key: Option<IdempotencyKey>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: PaymentSessionStatus,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub data: PaymentSessionData,
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/payment-sessions/initiate", post(initiate))
        .route("/payment-sessions/update", post(update))
        .route("/payment-sessions/authorize", post(authorize))
        .route("/payment-sessions/capture", post(capture))
        .route("/payment-sessions/refund", post(refund))
        .route("/payment-sessions/cancel", post(cancel))
        .route("/payment-sessions/delete", post(delete))
        .route("/payment-sessions/retrieve", post(retrieve))
        .route("/payment-sessions/status", post(status))
        .route("/webhook", post(webhook))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

async fn initiate(
    State(state): State<AppState>,
    Json(input): Json<InitiatePaymentInput>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    Ok(Json(state.sessions.initiate_payment(&input).await?))
}

async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    Ok(Json(state.sessions.update_payment(req.data, &req.input).await?))
}

async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    let result = state
        .sessions
        .authorize_payment(req.data, req.idempotency_key.as_ref())
        .await?;
    Ok(Json(result))
}

async fn capture(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    let result = state
        .sessions
        .capture_payment(req.data, req.idempotency_key.as_ref())
        .await?;
    Ok(Json(result))
}

async fn refund(
    State(state): State<AppState>,
    Json(req): Json<RefundSessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    let result = state
        .sessions
        .refund_payment(req.data, req.amount, req.idempotency_key.as_ref())
        .await?;
    Ok(Json(result))
}

async fn cancel(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    Ok(Json(state.sessions.cancel_payment(req.data).await?))
}

async fn delete(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let data = state.sessions.delete_payment(req.data).await?;
    Ok(Json(DeleteResponse { data }))
}

async fn retrieve(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<PaymentSessionResult>, ApiError> {
    Ok(Json(state.sessions.retrieve_payment(req.data).await?))
}

async fn status(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.sessions.get_payment_status(&req.data).await?;
    Ok(Json(StatusResponse { status }))
}

async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Json<WebhookAction> {
    let action = state.sessions.get_webhook_action_and_data(&payload);
    tracing::info!(?action, "webhook received, ignoring");
    Json(action)
}
