//! The signup decision procedure.
//!
//! Per request: `Received -> Validated -> IdentityResolved ->
//! {BotRejected | DuplicateRejected | Accepted}`. The bot check runs
//! before the duplicate check so automated traffic is rejected without
//! touching storage. Nothing in the flow retries.

use crate::error::GateError;
use crate::store::AccountStore;
use identity_client::IdentityClient;
use tracing::{info, instrument, warn};

/// Decide whether a signup attempt is accepted, and record it if so.
///
/// The only mutation is the final insert; every earlier step is read-only,
/// so a rejected attempt never leaves a partial record behind. Returns the
/// id assigned to the new account.
#[instrument(skip_all, fields(username = username.unwrap_or("")))]
pub async fn evaluate_signup(
    store: &AccountStore,
    identity: &IdentityClient,
    username: Option<&str>,
    password: Option<&str>,
    request_id: Option<&str>,
) -> Result<i64, GateError> {
    let username = require_field(username, "username")?;
    let password = require_field(password, "password")?;
    let request_id = require_field(request_id, "requestId")?;

    let event = identity.get_event(request_id).await?;

    // A successful lookup without a visitor id is a malformed upstream
    // response, not an acceptable signup.
    let visitor_id = event
        .visitor_id()
        .ok_or_else(|| GateError::IdentityLookup("identity event missing visitor id".into()))?;

    if event.bot_verdict().is_detected() {
        warn!(visitor_id = %visitor_id, "Bot detected, rejecting signup");
        return Err(GateError::BotDetected);
    }

    if store.count_by_visitor(visitor_id).await? > 0 {
        warn!(visitor_id = %visitor_id, "Device already has an account, rejecting signup");
        return Err(GateError::DuplicateDevice);
    }

    let account_id = store.insert_account(username, password, visitor_id).await?;

    info!(account_id, visitor_id = %visitor_id, "Account created");
    Ok(account_id)
}

fn require_field<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, GateError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(GateError::MissingField(name)),
    }
}
