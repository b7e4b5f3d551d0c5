//! Battle handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use skirmish_core::error::AppError;
use skirmish_core::types::BattleId;
use skirmish_engine::Transition;
use skirmish_entity::battle::{ActionKind, BattleSummary};

use crate::dto::request::{CreateBattleRequest, HistoryQuery};
use crate::dto::response::{ActionResponse, ApiResponse, BattleResponse, TickResponse};
use crate::extractors::AuthPlayer;
use crate::state::AppState;

/// POST /api/battles
///
/// The body is optional; without a JSON content type the defaults apply.
pub async fn create_battle(
    State(state): State<AppState>,
    auth: AuthPlayer,
    payload: Result<Option<Json<CreateBattleRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BattleResponse>>), AppError> {
    let req = payload
        .map_err(|rejection| AppError::validation(rejection.body_text()))?
        .map(|Json(req)| req)
        .unwrap_or_default();

    let battle = state
        .battle_service
        .start_battle(auth.context(), req.duration_seconds)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(BattleResponse::from_battle(
            &battle,
            state.display_log_limit(),
        ))),
    ))
}

/// GET /api/battles/active
pub async fn get_active(
    State(state): State<AppState>,
    auth: AuthPlayer,
) -> Result<Json<ApiResponse<Option<BattleResponse>>>, AppError> {
    let battle = state.battle_service.active_battle(auth.context()).await?;
    let limit = state.display_log_limit();
    Ok(Json(ApiResponse::ok(
        battle.map(|b| BattleResponse::from_battle(&b, limit)),
    )))
}

/// POST /api/battles/active/actions/{kind}
pub async fn perform_action(
    State(state): State<AppState>,
    auth: AuthPlayer,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<ActionResponse>>, AppError> {
    let kind = kind.parse::<ActionKind>().map_err(AppError::validation)?;

    let Transition { battle, outcome } =
        state.battle_service.perform(auth.context(), kind).await?;

    Ok(Json(ApiResponse::ok(ActionResponse {
        outcome,
        battle: BattleResponse::from_battle(&battle, state.display_log_limit()),
    })))
}

/// POST /api/battles/active/tick
pub async fn tick(
    State(state): State<AppState>,
    auth: AuthPlayer,
) -> Result<Json<ApiResponse<TickResponse>>, AppError> {
    let Transition { battle, outcome } = state.battle_service.tick(auth.context()).await?;

    Ok(Json(ApiResponse::ok(TickResponse {
        outcome,
        battle: BattleResponse::from_battle(&battle, state.display_log_limit()),
    })))
}

/// GET /api/battles/history
pub async fn history(
    State(state): State<AppState>,
    auth: AuthPlayer,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<BattleSummary>>>, AppError> {
    let battles = state
        .battle_service
        .history(auth.context(), query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(battles)))
}

/// GET /api/battles/{id}
pub async fn get_battle(
    State(state): State<AppState>,
    auth: AuthPlayer,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BattleResponse>>, AppError> {
    let battle = state
        .battle_service
        .get_battle(auth.context(), BattleId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(BattleResponse::from_battle(
        &battle,
        state.display_log_limit(),
    ))))
}
