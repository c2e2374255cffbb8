//! Dashboard page. The page itself is static; it reads the user id from
//! its own URL and talks to the JSON API.

use axum::{extract::Path, response::Html};

use starcrunch_core::validation::validate_user_id;

use crate::ApiError;

const DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn user_dashboard(Path(user_id): Path<String>) -> Result<Html<&'static str>, ApiError> {
    validate_user_id(&user_id)?;
    Ok(Html(DASHBOARD_HTML))
}
