//! Generic execution of request/response pairs.
//!
//! An [`Engine`] owns the transport: it accepts a fully built
//! [`reqwest::Request`] and hands back the buffered response. Auth headers,
//! connection reuse and any retry policy live there. [`execute`] composes
//! the engine with an [`ApiRequest`]: build, send, then validate and decode.

use std::future::Future;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Request, StatusCode};
use url::Url;

use crate::error::{Result, TeamworkError};
use crate::traits::ApiRequest;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Build a response from a status code and body.
    ///
    /// Invalid status codes fall back to 500.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a header. Names or values that are not valid HTTP are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Read a [`reqwest::Response`] to completion.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport collaborator that sends built requests.
///
/// Implementations must be safe to share across tasks; concurrent calls
/// through the same engine are allowed.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Base server address that request paths are appended to.
    fn server(&self) -> &Url;

    /// Send the request and buffer the response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request could not be sent or the
    /// body could not be read. Non-success statuses are not errors here.
    async fn send(&self, request: Request) -> Result<RawResponse>;
}

/// Build, send and decode one API call.
///
/// Returns the typed response, or the first error hit along the way. No
/// retries are attempted. Dropping the returned future aborts the send.
///
/// # Example
///
/// ```no_run
/// use twapi::{execute, CompanyCreateRequest, TeamworkClient};
///
/// # async fn example() -> twapi::Result<()> {
/// let client = TeamworkClient::from_env()?;
/// let created = execute(&client, &CompanyCreateRequest::new("Acme")).await?;
/// println!("created company {}", created.company.id);
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(skip_all, fields(request = short_type_name::<R>()))]
pub async fn execute<E, R>(engine: &E, request: &R) -> Result<R::Response>
where
    E: Engine + ?Sized,
    R: ApiRequest,
{
    let http = request.http_request(engine.server())?;
    tracing::debug!(method = %http.method(), url = %http.url(), "sending request");

    let raw = engine.send(http).await?;
    tracing::debug!(status = raw.status.as_u16(), "received response");

    request.parse_response(raw)
}

/// Like [`execute`], but gives up as soon as `cancel` completes.
///
/// Any in-flight send is dropped and [`TeamworkError::Cancelled`] is
/// returned. A `cancel` future that is already complete wins over a
/// response that is also ready.
pub async fn execute_with_cancel<E, R, C>(engine: &E, request: &R, cancel: C) -> Result<R::Response>
where
    E: Engine + ?Sized,
    R: ApiRequest,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = cancel => {
            tracing::debug!("request cancelled by caller");
            Err(TeamworkError::Cancelled)
        }
        result = execute(engine, request) => result,
    }
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::{CompanyGetRequest, TagListRequest};
    use crate::traits::Paginated;

    struct StubEngine {
        server: Url,
        reply: RawResponse,
        sent: Mutex<Vec<String>>,
    }

    impl StubEngine {
        fn replying(reply: RawResponse) -> Self {
            Self {
                server: Url::parse("https://x.test").unwrap(),
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Engine for StubEngine {
        fn server(&self) -> &Url {
            &self.server
        }

        async fn send(&self, request: Request) -> Result<RawResponse> {
            self.sent
                .lock()
                .unwrap()
                .push(format!("{} {}", request.method(), request.url()));
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_execute_builds_sends_and_decodes() {
        let engine = StubEngine::replying(RawResponse::new(
            200,
            r#"{"company": {"id": 5, "name": "Globex"}}"#,
        ));

        let response = tokio_test::block_on(execute(&engine, &CompanyGetRequest::new(5))).unwrap();

        assert_eq!(response.company.name, "Globex");
        assert_eq!(
            engine.sent.lock().unwrap().as_slice(),
            ["GET https://x.test/projects/api/v3/companies/5.json"]
        );
    }

    #[test]
    fn test_execute_attaches_request_to_list_response() {
        let engine = StubEngine::replying(RawResponse::new(
            200,
            r#"{"meta": {"page": {"hasMore": true}}, "tags": []}"#,
        ));
        let mut request = TagListRequest::new();
        request.filters.search_term = Some("bug".to_string());

        let response = tokio_test::block_on(execute(&engine, &request)).unwrap();

        assert_eq!(response.request(), &request);
    }

    #[test]
    fn test_ready_cancel_wins() {
        let engine = StubEngine::replying(RawResponse::new(200, "{}"));

        let result = tokio_test::block_on(execute_with_cancel(
            &engine,
            &CompanyGetRequest::new(5),
            std::future::ready(()),
        ));

        assert!(matches!(result, Err(TeamworkError::Cancelled)));
    }

    #[test]
    fn test_pending_cancel_lets_request_finish() {
        let engine = StubEngine::replying(RawResponse::new(
            200,
            r#"{"company": {"id": 5, "name": "Globex"}}"#,
        ));

        let result = tokio_test::block_on(execute_with_cancel(
            &engine,
            &CompanyGetRequest::new(5),
            std::future::pending::<()>(),
        ));

        assert_eq!(result.unwrap().company.id, 5);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<CompanyGetRequest>(), "CompanyGetRequest");
    }
}
