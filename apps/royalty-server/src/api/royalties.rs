// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::str::FromStr;

use alloy::primitives::Address;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::PresentedSignature,
    error::ApiError,
    models::{ActivateRoyaltyRequest, CreateRoyaltyRequest, RevealRequest, RevealResponse},
    registry::{
        NewRoyalty, OwnershipEnforcer, RoyaltyDescriptor, RoyaltyFilter, RoyaltyRecord,
        RoyaltyStatus,
    },
    state::AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RoyaltyListQuery {
    /// Case-insensitive match on artist or song title
    pub search: Option<String>,
    /// `pending`, `active` or `sold`
    pub status: Option<String>,
}

fn parse_identity(value: &str, field: &str) -> Result<Address, ApiError> {
    Address::from_str(value.trim())
        .map_err(|_| ApiError::bad_request(format!("{field} must be an EVM address")))
}

#[utoipa::path(
    get,
    path = "/v1/royalties",
    params(RoyaltyListQuery),
    tag = "Royalties",
    responses((status = 200, body = [RoyaltyRecord]))
)]
pub async fn list_royalties(
    State(state): State<AppState>,
    Query(params): Query<RoyaltyListQuery>,
) -> Result<Json<Vec<RoyaltyRecord>>, ApiError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(s) => Some(s.parse::<RoyaltyStatus>().map_err(ApiError::bad_request)?),
    };
    let filter = RoyaltyFilter {
        search: params.search,
        status,
    };

    let records = state.registry.load_all().await;
    Ok(Json(filter.apply(records)))
}

#[utoipa::path(
    post,
    path = "/v1/royalties",
    request_body = CreateRoyaltyRequest,
    tag = "Royalties",
    responses(
        (status = 201, body = RoyaltyRecord),
        (status = 400, description = "Invalid request"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn create_royalty(
    State(state): State<AppState>,
    Json(request): Json<CreateRoyaltyRequest>,
) -> Result<(StatusCode, Json<RoyaltyRecord>), ApiError> {
    if request.artist.trim().is_empty() || request.song_title.trim().is_empty() {
        return Err(ApiError::bad_request("artist and songTitle are required"));
    }
    if !request.royalty_value.is_finite() {
        return Err(ApiError::bad_request("royaltyValue must be a finite number"));
    }
    let owner = parse_identity(&request.owner, "owner")?;

    let new = NewRoyalty {
        descriptor: RoyaltyDescriptor::new(request.artist, request.song_title),
        royalty_value: request.royalty_value,
        token_amount: request.token_amount,
    };
    let record = state.registry.create(new, &owner.to_string()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/v1/royalties/{id}",
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    tag = "Royalties",
    responses(
        (status = 200, body = RoyaltyRecord),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_royalty(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RoyaltyRecord>, ApiError> {
    Ok(Json(state.registry.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/royalties/{id}/activate",
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    request_body = ActivateRoyaltyRequest,
    tag = "Royalties",
    responses(
        (status = 200, body = RoyaltyRecord),
        (status = 403, description = "Caller does not own the record"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Record is not pending")
    )
)]
pub async fn activate_royalty(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ActivateRoyaltyRequest>,
) -> Result<Json<RoyaltyRecord>, ApiError> {
    let identity = parse_identity(&request.identity, "identity")?;

    let record = state.registry.get(&id).await?;
    record.verify_owner(&identity.to_string())?;

    Ok(Json(state.registry.activate(&id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/royalties/{id}/reveal",
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    request_body = RevealRequest,
    tag = "Royalties",
    responses(
        (status = 200, body = RevealResponse),
        (status = 403, description = "Authorization declined or proof rejected"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn reveal_royalty(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, ApiError> {
    let record = state.registry.get(&id).await?;
    let signer = PresentedSignature::new(request.identity, request.signature);

    let royalty_value = state
        .reveal
        .reveal(&record, &request.challenge, &signer)
        .await?;

    Ok(Json(RevealResponse {
        id: record.id,
        royalty_value,
    }))
}
