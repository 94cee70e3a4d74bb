use std::time::Duration;

/// Builds the pooled HTTP client shared by outbound API integrations.
///
/// One client is created at startup and cloned into each integration, so all
/// of them share the same connection pool and DNS cache. `timeout` bounds a
/// whole request including the response body.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(build_http_client(Duration::from_secs(5)).is_ok());
    }
}
