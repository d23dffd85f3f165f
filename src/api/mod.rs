//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

use crate::storage::Storage;

pub use allowed_paths::invalid_path;
pub use allowed_paths::reject_unknown_paths;
pub use request::Form;
pub use request::QueryParameters;
pub use response::Acknowledgement;
pub use response::Error;
pub use response::Success;

mod allowed_paths;
mod countries;
mod destinations;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route(
            "/destinations",
            get(destinations::list::<S>).post(destinations::search::<S>),
        )
        .route(
            "/destination",
            get(destinations::single::<S>).delete(destinations::delete_by_query::<S>),
        )
        .route("/destinations/create", post(destinations::create::<S>))
        .route("/destinations/update", put(destinations::update::<S>))
        .route("/destinations/delete", delete(destinations::delete::<S>))
        .route("/countries", get(countries::list::<S>))
}
