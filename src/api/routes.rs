use axum::{routing::get, Router};

use crate::api::handlers::{self, SharedState};
use crate::store::Gateway;

pub fn create_router<G: Gateway + 'static>() -> Router<SharedState<G>> {
    Router::new()
        // Probes
        .route("/info", get(handlers::show_info::<G>))
        .route("/health", get(handlers::show_health::<G>))
        // Surveys
        .route(
            "/survey",
            get(handlers::search_surveys::<G>).post(handlers::create_survey::<G>),
        )
        .route(
            "/survey/:reference",
            get(handlers::get_survey::<G>)
                .patch(handlers::update_survey::<G>)
                .delete(handlers::delete_survey::<G>),
        )
}
