//! Default engine backed by `reqwest`.
//!
//! Handles authentication and sending. Request building and response
//! decoding live on the request/response types themselves.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, RequestBuilder};
use url::Url;

use crate::engine::{Engine, RawResponse};
use crate::error::{Result, TeamworkError};

const USER_AGENT: &str = concat!("twapi/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
enum Auth {
    Bearer(String),
    Basic { username: String, password: String },
}

/// HTTP engine for a Teamwork site.
///
/// Injects credentials into every request and sends it. It does not retry,
/// throttle or otherwise reinterpret responses.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use twapi::TeamworkClient;
///
/// # fn example() -> twapi::Result<()> {
/// // Create from environment variables
/// let client = TeamworkClient::from_env()?;
///
/// // Or configure manually
/// let client = TeamworkClient::new("https://example.teamwork.com", "api-token")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TeamworkClient {
    http: Client,
    server: Arc<Url>,
    auth: Arc<Auth>,
}

impl std::fmt::Debug for TeamworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamworkClient")
            .field("server", &self.server.as_str())
            .finish_non_exhaustive()
    }
}

impl TeamworkClient {
    /// Create a client from environment variables.
    ///
    /// Reads `TEAMWORK_SERVER` (required) and either `TEAMWORK_API_TOKEN`
    /// or the pair `TEAMWORK_USERNAME` / `TEAMWORK_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server or credentials are not set.
    pub fn from_env() -> Result<Self> {
        let server = env::var("TEAMWORK_SERVER").map_err(|_| {
            TeamworkError::ConfigMissing("TEAMWORK_SERVER environment variable not set".to_string())
        })?;

        if let Ok(token) = env::var("TEAMWORK_API_TOKEN") {
            return Self::new(&server, &token);
        }

        match (env::var("TEAMWORK_USERNAME"), env::var("TEAMWORK_PASSWORD")) {
            (Ok(username), Ok(password)) => Self::with_basic_auth(&server, &username, &password),
            _ => Err(TeamworkError::ConfigMissing(
                "set TEAMWORK_API_TOKEN, or TEAMWORK_USERNAME and TEAMWORK_PASSWORD".to_string(),
            )),
        }
    }

    /// Create a client that authenticates with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn new(server: &str, token: &str) -> Result<Self> {
        Self::build(server, Auth::Bearer(token.to_string()))
    }

    /// Create a client that authenticates with username and password.
    ///
    /// An API key can be passed as the username with any password.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn with_basic_auth(server: &str, username: &str, password: &str) -> Result<Self> {
        Self::build(
            server,
            Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        )
    }

    fn build(server: &str, auth: Auth) -> Result<Self> {
        let server = Url::parse(server)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(TeamworkError::Http)?;

        Ok(Self {
            http,
            server: Arc::new(server),
            auth: Arc::new(auth),
        })
    }

    fn authorize(&self, request: Request) -> RequestBuilder {
        let builder = RequestBuilder::from_parts(self.http.clone(), request);
        match self.auth.as_ref() {
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
        }
    }
}

#[async_trait]
impl Engine for TeamworkClient {
    fn server(&self) -> &Url {
        &self.server
    }

    #[tracing::instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    async fn send(&self, request: Request) -> Result<RawResponse> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(TeamworkError::Http)?;

        RawResponse::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = TeamworkClient::new("https://x.test", "test-token").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("TeamworkClient"));
        assert!(debug.contains("server"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_invalid_server_is_rejected() {
        let err = TeamworkClient::new("not a url", "token").unwrap_err();
        assert!(matches!(err, TeamworkError::Url(_)));
    }

    #[test]
    fn test_basic_auth_header() {
        let client = TeamworkClient::with_basic_auth("https://x.test", "user", "pass").unwrap();
        let request = Request::new(reqwest::Method::GET, client.server().clone());
        let built = client.authorize(request).build().unwrap();
        let header = built.headers()[reqwest::header::AUTHORIZATION].to_str().unwrap();
        assert_eq!(header, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_bearer_auth_header() {
        let client = TeamworkClient::new("https://x.test", "abc").unwrap();
        let request = Request::new(reqwest::Method::GET, client.server().clone());
        let built = client.authorize(request).build().unwrap();
        assert_eq!(built.headers()[reqwest::header::AUTHORIZATION], "Bearer abc");
    }
}
