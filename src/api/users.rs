use crate::api::error::Error;
use crate::api::validation::ValidatedJson;
use crate::ledger::{self, User};
use crate::order;
use crate::seq::Sequencer;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use validify::{Payload, Validify};

#[derive(Debug, Deserialize, Validify, Payload, ToSchema)]
pub struct DepositRequest {
    #[validate(length(min = 1))]
    pub asset: order::Asset,
    pub amount: Decimal,
}

#[derive(OpenApi)]
#[openapi(
    paths(register_user, list_users, deposit, balances),
    components(schemas(DepositRequest))
)]
pub struct UsersApi;

pub fn router() -> Router<Sequencer> {
    Router::new()
        .route("/users", post(register_user).get(list_users))
        .route("/users/{user_id}/balances", post(deposit))
        .route("/users/{user_id}/balances", get(balances))
}

/// Register a new user with empty balances
#[utoipa::path(
    post,
    path = "/users",
    responses(
        (status = 200, description = "User created", body = User),
    )
)]
async fn register_user(State(engine): State<Sequencer>) -> Json<User> {
    Json(engine.register_user())
}

/// List all registered users with their balances
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All registered users", body = [User]),
    )
)]
async fn list_users(State(engine): State<Sequencer>) -> Json<Vec<User>> {
    Json(engine.users())
}

/// Credit a balance to a user
#[utoipa::path(
    post,
    path = "/users/{user_id}/balances",
    params(
        ("user_id" = String, Path, description = "User identifier"),
    ),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 400, description = "Non-positive amount or validation error"),
        (status = 404, description = "Unknown user"),
    )
)]
async fn deposit(
    State(engine): State<Sequencer>,
    Path(user_id): Path<ledger::UserId>,
    ValidatedJson(req): ValidatedJson<DepositRequest>,
) -> Result<Json<User>, Error> {
    if req.amount <= Decimal::ZERO {
        return Err(Error::BadRequest(
            "INVALID_AMOUNT".into(),
            "deposit amount must be positive".into(),
        ));
    }

    let user = engine.deposit(user_id, &req.asset, req.amount)?;
    Ok(Json(user))
}

/// Get a user's balances
#[utoipa::path(
    get,
    path = "/users/{user_id}/balances",
    params(
        ("user_id" = String, Path, description = "User identifier"),
    ),
    responses(
        (status = 200, description = "Account with balances", body = User),
        (status = 404, description = "Unknown user"),
    )
)]
async fn balances(
    State(engine): State<Sequencer>,
    Path(user_id): Path<ledger::UserId>,
) -> Result<Json<User>, Error> {
    let user = engine.balances(user_id)?;
    Ok(Json(user))
}
