// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};

use crate::{auth::AuthorizationChallenge, models::ChallengeResponse, state::AppState};

/// Issue a challenge for the caller's wallet to sign before a reveal.
#[utoipa::path(
    get,
    path = "/v1/authorization/challenge",
    tag = "Authorization",
    responses((status = 200, body = ChallengeResponse))
)]
pub async fn issue_challenge(State(state): State<AppState>) -> Json<ChallengeResponse> {
    let params = state.challenge;
    let challenge = AuthorizationChallenge::issue(
        params.contract_address,
        params.chain_id,
        Utc::now(),
        params.duration_days,
    );

    Json(ChallengeResponse {
        message: challenge.message(),
        expires_at: challenge
            .expires_at()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        challenge,
    })
}
