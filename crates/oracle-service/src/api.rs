//! HTTP API for the oracle.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use chrono::NaiveDate;
use oracle_core::{Oracle, OracleError};
use oracle_types::{
	ErrorResponse, FactResponse, FilteredTransaction, IdentityResponse, Subject,
	TransactionSignature,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
	oracle: Arc<Oracle>,
}

/// Builds the API router.
pub fn router(oracle: Arc<Oracle>) -> Router {
	Router::new()
		.route("/health", get(health_check))
		.route("/identity", get(identity))
		.route("/spot/{subject}/{date}", get(query_spot))
		.route("/volatility/{subject}/{date}", get(query_volatility))
		.route("/sign", post(sign))
		.with_state(AppState { oracle })
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

/// Serves the API until `shutdown` resolves.
pub async fn serve<F>(oracle: Arc<Oracle>, host: &str, port: u16, shutdown: F) -> anyhow::Result<()>
where
	F: Future<Output = ()> + Send + 'static,
{
	let listener = tokio::net::TcpListener::bind((host, port)).await?;

	info!("API server listening on {}:{}", host, port);

	axum::serve(listener, router(oracle))
		.with_graceful_shutdown(shutdown)
		.await?;

	Ok(())
}

/// Maps oracle errors onto HTTP responses.
struct ApiError(OracleError);

impl From<OracleError> for ApiError {
	fn from(err: OracleError) -> Self {
		Self(err)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, code) = match &self.0 {
			OracleError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
			OracleError::InvalidFact(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FACT"),
			OracleError::InvalidTransaction(_) => {
				(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRANSACTION")
			}
			OracleError::Signing(_) | OracleError::Storage(_) | OracleError::Config(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
			}
		};

		if status.is_server_error() {
			warn!("Request failed: {}", self.0);
		}

		let body = ErrorResponse {
			error: code.to_string(),
			message: self.0.to_string(),
		};
		(status, Json(body)).into_response()
	}
}

async fn health_check() -> StatusCode {
	StatusCode::OK
}

async fn identity(State(state): State<AppState>) -> Result<Json<IdentityResponse>, ApiError> {
	let public_key = state.oracle.public_key().await?;
	Ok(Json(IdentityResponse {
		name: state.oracle.name().to_string(),
		public_key,
	}))
}

async fn query_spot(
	State(state): State<AppState>,
	Path((subject, date)): Path<(Subject, NaiveDate)>,
) -> Result<Json<FactResponse>, ApiError> {
	let fact = state.oracle.query_spot(&subject, date).await?;
	Ok(Json(fact.into()))
}

async fn query_volatility(
	State(state): State<AppState>,
	Path((subject, date)): Path<(Subject, NaiveDate)>,
) -> Result<Json<FactResponse>, ApiError> {
	let fact = state.oracle.query_volatility(&subject, date).await?;
	Ok(Json(fact.into()))
}

async fn sign(
	State(state): State<AppState>,
	Json(ftx): Json<FilteredTransaction>,
) -> Result<Json<TransactionSignature>, ApiError> {
	let signature = state.oracle.sign(&ftx).await?;
	Ok(Json(signature))
}
