use axum::{routing::get, Router};

use crate::types::app_state::AppState;

mod get_locations;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/locations", get(get_locations::get_locations))
}
