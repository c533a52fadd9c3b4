// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthorizationChallenge,
    error::ErrorBody,
    models::{
        ActivateRoyaltyRequest, ChallengeResponse, CreateRoyaltyRequest, RevealRequest,
        RevealResponse,
    },
    registry::{RoyaltyRecord, RoyaltyStatus},
    state::AppState,
};

pub mod authorization;
pub mod health;
pub mod royalties;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/royalties",
            get(royalties::list_royalties).post(royalties::create_royalty),
        )
        .route("/royalties/{id}", get(royalties::get_royalty))
        .route("/royalties/{id}/activate", post(royalties::activate_royalty))
        .route("/royalties/{id}/reveal", post(royalties::reveal_royalty))
        .route(
            "/authorization/challenge",
            get(authorization::issue_challenge),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        royalties::list_royalties,
        royalties::create_royalty,
        royalties::get_royalty,
        royalties::activate_royalty,
        royalties::reveal_royalty,
        authorization::issue_challenge
    ),
    components(
        schemas(
            RoyaltyRecord,
            RoyaltyStatus,
            CreateRoyaltyRequest,
            ActivateRoyaltyRequest,
            AuthorizationChallenge,
            ChallengeResponse,
            RevealRequest,
            RevealResponse,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Royalties", description = "Encrypted royalty registry"),
        (name = "Authorization", description = "Reveal authorization challenges")
    )
)]
struct ApiDoc;
