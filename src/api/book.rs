use crate::order::book::{BookSnapshot, TopOfBook};
use crate::seq::Sequencer;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(snapshot, top_of_book))]
pub struct BookApi;

pub fn router() -> Router<Sequencer> {
    Router::new()
        .route("/book", get(snapshot))
        .route("/book/top", get(top_of_book))
}

/// Full-depth book snapshot, best prices first
#[utoipa::path(
    get,
    path = "/book",
    responses(
        (status = 200, description = "Current book state", body = BookSnapshot),
    )
)]
async fn snapshot(State(engine): State<Sequencer>) -> Json<BookSnapshot> {
    Json(engine.snapshot())
}

/// Best bid and ask
#[utoipa::path(
    get,
    path = "/book/top",
    responses(
        (status = 200, description = "Top of book", body = TopOfBook),
    )
)]
async fn top_of_book(State(engine): State<Sequencer>) -> Json<TopOfBook> {
    Json(engine.top_of_book())
}
