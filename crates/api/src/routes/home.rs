//! Root route.

/// Greeting served at `/`.
pub async fn home() -> &'static str {
    "Hello, World!"
}
