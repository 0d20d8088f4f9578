use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use common::types::WaitlistResponse;
use serde_json::Value;
use service::{
    metrics,
    waitlist::{validate_email, AddOutcome},
};
use tracing::info;

use crate::errors::ApiError;
use crate::state::ServerState;

/// `POST /waitlist` with `{"email": "..."}`.
///
/// The body is decoded regardless of `Content-Type`. The address is stored
/// exactly as sent; only its shape is checked.
pub async fn join_waitlist(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<WaitlistResponse>), ApiError> {
    let email = email_from_body(&body).map_err(|e| {
        metrics::SIGNUPS_INVALID_TOTAL.inc();
        e
    })?;
    if let Err(e) = validate_email(&email) {
        metrics::SIGNUPS_INVALID_TOTAL.inc();
        return Err(e.into());
    }

    match state.store.add(&email).await {
        AddOutcome::Accepted(entry) => {
            metrics::SIGNUPS_ACCEPTED_TOTAL.inc();
            info!(id = entry.id, %email, "new waitlist entry");
            Ok((
                StatusCode::CREATED,
                Json(WaitlistResponse::ok("Successfully joined the waitlist!")),
            ))
        }
        AddOutcome::Duplicate => {
            metrics::SIGNUPS_DUPLICATE_TOTAL.inc();
            Err(ApiError::Duplicate)
        }
        AddOutcome::IdsExhausted => Err(ApiError::Closed),
    }
}

/// Pull the email out of the first JSON value in `body`.
/// - trailing bytes after that value are ignored
/// - `null`, `{}` and `{"email": null}` all mean "no email"
/// - the key matches `email` exactly, else the first key equal to it ignoring ASCII case
fn email_from_body(body: &[u8]) -> Result<String, ApiError> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or(ApiError::InvalidJson)?
        .map_err(|_| ApiError::InvalidJson)?;

    let fields = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(fields) => fields,
        _ => return Err(ApiError::InvalidJson),
    };
    let field = fields
        .get("email")
        .or_else(|| fields.iter().find(|(k, _)| k.eq_ignore_ascii_case("email")).map(|(_, v)| v));
    match field {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::InvalidJson),
    }
}
