//! Route resolution middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::request::{parse_form, RouteRequest};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn is_form_post(request: &Request<Body>) -> bool {
    request.method() == Method::POST
        && request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false)
}

/// Resolve the request against the current router and attach the
/// `ResolvedRoute` as a request extension.
///
/// Form-encoded POST bodies are buffered (up to `max_form_bytes`) so the
/// override field can be read, then handed on unchanged.
pub async fn resolve_route(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let form_post = is_form_post(&request);
    let (mut parts, body) = request.into_parts();

    let (form, body) = if form_post {
        match Limited::new(body, state.max_form_bytes).collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                (Some(parse_form(&bytes)), Body::from(bytes))
            }
            Err(e) if e.is::<LengthLimitError>() => {
                tracing::warn!(limit = state.max_form_bytes, "Form body over limit");
                return (StatusCode::PAYLOAD_TOO_LARGE, "Form body too large").into_response();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read form body");
                return (StatusCode::BAD_REQUEST, "Failed to read form body").into_response();
            }
        }
    } else {
        (None, body)
    };

    // The guard is released before awaiting the next service.
    let resolved = {
        let router = state.router.load();
        let route_request = RouteRequest::from_http(&parts, form.as_deref(), router.verb_source());
        let route = router.match_request(&route_request);
        (route_request.path, route)
    };

    match resolved {
        (path, Some(route)) => {
            tracing::debug!(
                path = %path,
                verb = %route.verb,
                controller = %route.controller_name,
                method = %route.method_name,
                source = route.source.as_str(),
                "Route resolved"
            );
            parts.extensions.insert(route);
        }
        (path, None) => {
            tracing::debug!(path = %path, "No route matched");
            metrics::record_unmatched();
        }
    }

    next.run(Request::from_parts(parts, body)).await
}
