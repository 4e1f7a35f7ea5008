//! HTTP route handlers for the booking flow

use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::session_cookie::SessionContext;
use crate::flow::{FlowError, Step};

/// Error response for the flow API
#[derive(Debug, Serialize, Deserialize)]
pub struct FlowErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for FlowErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "missing_field" | "invalid_form" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let code = match &self {
            FlowError::StepNotReached { redirect_to, .. } => {
                return Redirect::to(redirect_to.path()).into_response();
            }
            FlowError::SessionExpired => {
                return Redirect::to(Step::SessionTimeout.path()).into_response();
            }
            FlowError::MissingField(_) => "missing_field",
            FlowError::InvalidForm(_) => "invalid_form",
            FlowError::SeatDraw(_) | FlowError::Store(_) => {
                tracing::error!("Flow request failed: {}", self);
                "internal"
            }
        };
        FlowErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        }
        .into_response()
    }
}

/// Form body for POST /search
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    pub origin: Option<String>,
}

/// Form body for POST /add_to_cart
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub seat_id: Option<String>,
}

/// Form body for POST /verify_otp
#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    pub otp: Option<String>,
}

fn record_step(step: Step) {
    counter!("detour_flow_steps_total", "step" => step.as_str()).increment(1);
}

fn invalid_form(rejection: FormRejection) -> FlowError {
    FlowError::InvalidForm(rejection.body_text())
}

/// GET / - Reset the session and count the visit
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, FlowError> {
    record_step(Step::Home);
    let mut ctx = SessionContext::load_or_restart(&state, &headers).await?;
    let view = state.flow.enter(&mut ctx.record);
    ctx.save(&state, Json(view)).await
}

/// POST /search - Autocorrect the destination, slowly
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Response, FlowError> {
    record_step(Step::Search);
    // A missing or unreadable body just means the default origin
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!("Search without form body: {}", e);
            SearchForm::default()
        }
    };

    let ctx = SessionContext::load(&state, &headers).await?;
    let start = Instant::now();
    let view = state.flow.search(&ctx.record, form.origin.as_deref()).await;
    histogram!("detour_search_duration_seconds").record(start.elapsed());

    ctx.respond(&state, Json(view)).await
}

/// GET /seat_selection - A freshly drawn seat grid
pub async fn seat_selection(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, FlowError> {
    record_step(Step::SeatSelection);
    let ctx = SessionContext::load(&state, &headers).await?;
    let view = state.flow.list_seats(&mut rand::rng())?;
    ctx.respond(&state, Json(view)).await
}

/// POST /add_to_cart - Select a seat and price it
pub async fn add_to_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<AddToCartForm>, FormRejection>,
) -> Result<Response, FlowError> {
    record_step(Step::AddToCart);
    let Form(form) = form.map_err(invalid_form)?;
    let seat_id = form.seat_id.ok_or(FlowError::MissingField("seat_id"))?;

    let mut ctx = SessionContext::load(&state, &headers).await?;
    let next = state
        .flow
        .add_to_cart(&mut ctx.record, seat_id, &mut rand::rng());
    ctx.save(&state, Redirect::to(next.path())).await
}

/// GET /cart - Selected seat and its fees
pub async fn cart(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, FlowError> {
    record_step(Step::Cart);
    let ctx = SessionContext::load(&state, &headers).await?;
    let view = state.flow.view_cart(&ctx.record)?;
    ctx.respond(&state, Json(view)).await
}

/// GET /payment - Start (or retry) payment
pub async fn payment(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, FlowError> {
    record_step(Step::Payment);
    let mut ctx = SessionContext::load(&state, &headers).await?;
    let view = state.flow.enter_payment(&mut ctx.record)?;
    ctx.save(&state, Json(view)).await
}

/// POST /verify_otp - Count an attempt and route to the error page or confirmation
pub async fn verify_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<VerifyOtpForm>, FormRejection>,
) -> Result<Response, FlowError> {
    record_step(Step::VerifyOtp);
    let Form(form) = form.map_err(invalid_form)?;
    let otp = form.otp.ok_or(FlowError::MissingField("otp"))?;

    let mut ctx = SessionContext::load(&state, &headers).await?;
    let outcome = state
        .flow
        .verify_otp(&mut ctx.record, &otp, &mut rand::rng())?;
    ctx.save(&state, Redirect::to(outcome.next_step().path()))
        .await
}

/// GET /payment_error - Why the last attempt failed
pub async fn payment_error(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, FlowError> {
    record_step(Step::PaymentError);
    let ctx = SessionContext::load(&state, &headers).await?;
    let view = state.flow.show_payment_error(&ctx.record)?;
    ctx.respond(&state, Json(view)).await
}

/// GET /confirmation - Booking token, or back to the homepage
pub async fn confirmation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, FlowError> {
    record_step(Step::Confirmation);
    let mut ctx = SessionContext::load(&state, &headers).await?;
    let view = state.flow.confirm(&mut ctx.record, &mut rand::rng())?;
    ctx.save(&state, Json(view)).await
}

/// GET /session_timeout - Static notice, no session involved
pub async fn session_timeout(State(state): State<AppState>) -> impl IntoResponse {
    record_step(Step::SessionTimeout);
    Json(state.flow.session_timeout())
}

/// Build booking flow routes
pub fn flow_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/search", post(search))
        .route("/seat_selection", get(seat_selection))
        .route("/add_to_cart", post(add_to_cart))
        .route("/cart", get(cart))
        .route("/payment", get(payment))
        .route("/verify_otp", post(verify_otp))
        .route("/payment_error", get(payment_error))
        .route("/confirmation", get(confirmation))
        .route("/session_timeout", get(session_timeout))
}
