use axum::{
    body::Body,
    http::{Request, Response, StatusCode, header},
    middleware::Next,
};

/// Where a request for `host` + `path_and_query` should permanently move to,
/// if its host carries a `www.` prefix.
fn canonical_location(host: &str, path_and_query: &str) -> Option<String> {
    host.strip_prefix("www.")
        .filter(|bare| !bare.is_empty())
        .map(|bare| format!("https://{bare}{path_and_query}"))
}

/// Sends `www.` requests to the bare host with a 301.
pub async fn redirect_www(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    let location = req
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .and_then(|host| {
            let path_and_query = req.uri().path_and_query().map_or("/", |pq| pq.as_str());
            canonical_location(host, path_and_query)
        });

    match location {
        Some(location) => Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header(header::LOCATION, location)
            .body(Body::empty())
            .map_err(|err| {
                tracing::error!(?err, "Failed to build redirect response");
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        None => Ok(next.run(req).await),
    }
}
