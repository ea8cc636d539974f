use axum::response::IntoResponse;

// Undocumented banner route; load balancers and humans poke it.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
