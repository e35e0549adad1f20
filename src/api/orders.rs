use crate::api::error::Error;
use crate::api::validation::ValidatedJson;
use crate::ledger;
use crate::order;
use crate::seq::Sequencer;
use crate::trade::FillOutcome;
use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use validify::{Payload, Validify};

#[derive(Debug, Deserialize, Validify, Payload, ToSchema)]
pub struct PlaceOrderRequest {
    pub side: order::Side,
    #[validate(range(min = 1.0))]
    pub quantity: order::Quantity,
    /// Limit price in quote currency; positivity is enforced by the engine.
    pub price: Decimal,
    #[validate(length(min = 1))]
    pub asset: order::Asset,
}

/// Identifies the order's owner; users register via `POST /users` first.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: ledger::UserId,
}

impl PlaceOrderRequest {
    fn into_order(self, owner: ledger::UserId) -> order::Order {
        order::Order::new(owner, self.side, self.quantity, self.price, self.asset)
    }
}

#[derive(OpenApi)]
#[openapi(paths(place_order), components(schemas(PlaceOrderRequest)))]
pub struct OrdersApi;

pub fn router() -> Router<Sequencer> {
    Router::new().route("/orders", post(place_order))
}

/// Submit a limit order for matching
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    params(
        ("user_id" = String, Query, description = "Owner of the order"),
    ),
    responses(
        (status = 200, description = "Order matched and/or rested", body = FillOutcome),
        (status = 400, description = "Invalid order, insufficient balance, or validation error"),
        (status = 404, description = "Unknown user"),
        (status = 500, description = "Internal error"),
    )
)]
async fn place_order(
    State(engine): State<Sequencer>,
    Query(owner): Query<OwnerQuery>,
    ValidatedJson(req): ValidatedJson<PlaceOrderRequest>,
) -> Result<Json<FillOutcome>, Error> {
    let outcome = engine.submit_order(req.into_order(owner.user_id))?;
    Ok(Json(outcome))
}
