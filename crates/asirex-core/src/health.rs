use axum::http::StatusCode;

/// `GET /healthz`. Answers as long as the process is serving requests.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`. The storefront considers itself ready once it is up;
/// dependency probes can be layered on per deployment.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
