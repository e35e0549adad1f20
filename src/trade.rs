use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::ledger;
use crate::order;

/// One executed fill against a resting price level.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Trade {
    /// Representative owner of the consumed level.
    #[schema(value_type = String)]
    pub counterparty: ledger::UserId,
    /// Execution price, always the resting (maker) side's price.
    #[schema(value_type = String)]
    pub price: order::Price,
    pub quantity: order::Quantity,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub timestamp: OffsetDateTime,
}

/// Result of submitting one order: how much traded, how much rests, and
/// the individual fills in execution order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FillOutcome {
    pub consumed: order::Quantity,
    pub remaining: order::Quantity,
    pub fills: Vec<Trade>,
}
