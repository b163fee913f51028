//! HTTP routes for reading, extending and validating the chain.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chain::Chain;
use crate::model::Block;
use crate::validate::{audit_raw_chain, check_raw_block, ChainError, Rejection};

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    chain: Arc<Mutex<Chain>>,
}

impl AppState {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Arc::new(Mutex::new(chain)),
        }
    }

    /// The chain is only mutated by a push after validation, so a poisoned
    /// lock still guards a consistent chain.
    fn chain(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/blocks", get(list_blocks).post(create_block))
        .route("/blocks/latest", get(latest_block))
        .route("/blocks/submit", post(submit_block))
        .route("/blocks/:index", get(get_block))
        .route("/validate", get(validate_own_chain))
        .route("/validate/block", post(validate_block))
        .route("/validate/chain", post(validate_chain))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, msg: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

/// GET /blocks
pub async fn list_blocks(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.chain().blocks().to_vec())
}

/// GET /blocks/latest
pub async fn latest_block(State(state): State<AppState>) -> Json<Block> {
    Json(state.chain().latest().clone())
}

/// GET /blocks/:index
pub async fn get_block(
    State(state): State<AppState>,
    Path(index): Path<u64>,
) -> Result<Json<Block>, ApiError> {
    state
        .chain()
        .get(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "not found"))
}

#[derive(Deserialize)]
pub struct NewBlock {
    pub data: String,
}

/// POST /blocks
pub async fn create_block(
    State(state): State<AppState>,
    Json(payload): Json<NewBlock>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let block = state
        .chain()
        .create_new_block(payload.data)
        .map_err(|reason| api_error(StatusCode::CONFLICT, reason))?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// POST /blocks/submit: append a block built elsewhere.
pub async fn submit_block(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let block = Block::from_value(&raw).ok_or_else(|| {
        api_error(StatusCode::UNPROCESSABLE_ENTITY, Rejection::MalformedCandidate)
    })?;
    state
        .chain()
        .append(block.clone())
        .map_err(|reason| api_error(StatusCode::UNPROCESSABLE_ENTITY, reason))?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[derive(Deserialize)]
pub struct BlockPair {
    #[serde(default)]
    pub candidate: Value,
    #[serde(default)]
    pub predecessor: Value,
}

#[derive(Debug, Serialize)]
pub struct BlockVerdict {
    pub valid: bool,
    pub reason: Option<String>,
}

/// POST /validate/block: check a candidate against a predecessor without
/// touching the chain.
pub async fn validate_block(Json(pair): Json<BlockPair>) -> Json<BlockVerdict> {
    let verdict = match check_raw_block(&pair.candidate, &pair.predecessor) {
        Ok(()) => BlockVerdict {
            valid: true,
            reason: None,
        },
        Err(reason) => BlockVerdict {
            valid: false,
            reason: Some(reason.to_string()),
        },
    };
    Json(verdict)
}

/// Whole-chain verdict: `ok` is true when `errors` is empty.
#[derive(Debug, Serialize)]
pub struct ValidateResp {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidateResp {
    pub fn from_errors(errors: Vec<ChainError>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// POST /validate/chain
pub async fn validate_chain(Json(blocks): Json<Vec<Value>>) -> Json<ValidateResp> {
    let resp = ValidateResp::from_errors(audit_raw_chain(&blocks));
    if !resp.ok {
        tracing::info!(errors = resp.errors.len(), "submitted chain failed validation");
    }
    Json(resp)
}

/// GET /validate
pub async fn validate_own_chain(State(state): State<AppState>) -> Json<ValidateResp> {
    let errors = state.chain().audit().err().into_iter().collect();
    Json(ValidateResp::from_errors(errors))
}

/// GET /health
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
