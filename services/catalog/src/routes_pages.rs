use axum::{extract::State, response::Html};

use crate::presenter::render_page;
use crate::state::SharedState;

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(render_page(&state.listing))
}

pub async fn healthz() -> &'static str {
    "ok"
}
