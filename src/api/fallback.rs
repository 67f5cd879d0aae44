use axum::http::{Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::debug;

/// The page every failed authorization flow redirects to.
pub async fn error_page() -> Html<&'static str> {
    Html(
        "<h4>Something went wrong during authorization.</h4>\
         <p><a href=\"/authorize\">Try signing in again.</a></p>",
    )
}

/// Fallback for unmatched routes.
///
/// Browsers navigating to an unknown path get sent to the error page;
/// anything other than GET keeps its plain 404.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    if method == Method::GET {
        debug!(%uri, "unknown path, redirecting to error page");
        Redirect::to("/error").into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
