use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderValue},
        Method, Request, Response, StatusCode,
    },
    middleware::Next,
};
use tracing::debug;

use crate::app::AppState;
use crate::app_config::AppConfig;

/// Origin to echo back for `origin`, if the configuration allows it.
/// A wildcard reflects any origin; otherwise only listed origins pass.
pub fn allowed_origin(config: &AppConfig, origin: Option<&str>) -> Option<String> {
    let origin = origin?;

    if config.allows_any_origin() {
        debug!("CORS: Reflecting origin: {}", origin);
        return Some(origin.to_string());
    }

    if config.cors_allowed_origins.iter().any(|o| o == origin) {
        debug!("CORS: Origin allowed from whitelist: {}", origin);
        Some(origin.to_string())
    } else {
        debug!("CORS: Origin not in whitelist: {}", origin);
        None
    }
}

fn insert_allow_origin(response: &mut Response<Body>, allowed: &str) {
    if let Ok(value) = HeaderValue::from_str(allowed) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        response
            .headers_mut()
            .insert(header::VARY, HeaderValue::from_static("origin"));
    }
}

/// CORS middleware driven by `CORS_ALLOWED_ORIGINS`
pub async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let allowed = allowed_origin(&state.config, origin.as_deref());

    // Handle preflight OPTIONS requests
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());

        if let Some(allowed) = allowed {
            insert_allow_origin(&mut response, &allowed);
            response.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, OPTIONS"),
            );
            response.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type, accept, origin, x-requested-with"),
            );
            response.headers_mut().insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static("3600"),
            );
        }

        *response.status_mut() = StatusCode::OK;
        return response;
    }

    let mut response = next.run(req).await;

    if let Some(allowed) = allowed {
        insert_allow_origin(&mut response, &allowed);
    }

    response
}
