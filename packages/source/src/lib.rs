#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dataset fetching and dashboard configuration.
//!
//! Downloads the incarceration records and the county boundaries over
//! plain HTTP GET and parses them into the shared model types. Parsing
//! is split from fetching so payloads can be handled without a network.
//! Configuration is layered from an embedded default TOML, an optional
//! user file, and environment overrides.

pub mod config;
pub mod counties;
pub mod records;

/// Errors that can occur while loading configuration or datasets.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error (config file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload parsed but did not have the expected shape.
    #[error("Unexpected data format: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}

/// Builds the HTTP client used for both dataset fetches.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the TLS backend cannot be
/// initialized.
pub fn client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("prison_viz/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Sends a GET request and returns the response body as text.
async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    Ok(resp.text().await?)
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read as _, Write as _};
    use std::net::TcpListener;

    /// Answers a single HTTP request on a loopback port with `status` and
    /// `body`, then closes. Returns the server's base URL.
    pub fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}")
    }

    /// Client that never routes loopback requests through a proxy.
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }
}
