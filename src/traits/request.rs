//! Outbound half of the request/response contract.

use std::fmt::Display;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::Url;

use crate::engine::RawResponse;
use crate::error::{Result, TeamworkError};
use crate::pagination::PageFilters;
use crate::traits::ApiResponse;
use crate::values::join_ids;

/// A value that can produce one outbound API call.
///
/// Each operation (create, update, delete, get, list) of each resource has
/// its own request type, paired with the response type it decodes into.
///
/// # Example
///
/// ```
/// use twapi::{ApiRequest, CompanyCreateRequest};
///
/// let server = url::Url::parse("https://example.teamwork.com").unwrap();
/// let request = CompanyCreateRequest::new("Acme").http_request(&server).unwrap();
///
/// assert_eq!(request.method(), "POST");
/// assert_eq!(
///     request.url().as_str(),
///     "https://example.teamwork.com/projects/api/v3/companies.json"
/// );
/// ```
pub trait ApiRequest: Send + Sync {
    /// The response this request decodes into.
    type Response: ApiResponse;

    /// Build the HTTP request against the given server.
    ///
    /// # Errors
    ///
    /// Returns an encoding error if the payload cannot be serialized, or a
    /// URL error if the server and path do not form a valid URL.
    fn http_request(&self, server: &Url) -> Result<Request>;

    /// Turn the raw HTTP response into the typed response.
    ///
    /// The default validates the status code and decodes the body. List
    /// requests override this to attach themselves to the response.
    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        Self::Response::from_http(raw)
    }
}

/// Wraps a payload under its envelope key: `{"company": {...}}`.
pub(crate) struct Envelope<'a, B: ?Sized>(pub &'static str, pub &'a B);

impl<B: Serialize + ?Sized> Serialize for Envelope<'_, B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

/// Query parameters kept in insertion order.
///
/// Unset values are skipped, so the resulting query string only carries
/// what the caller asked for, in a stable order.
#[derive(Debug, Default)]
pub(crate) struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn opt<T: Display>(mut self, key: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn ids(mut self, key: &'static str, ids: &[i64]) -> Self {
        if !ids.is_empty() {
            self.0.push((key, join_ids(ids)));
        }
        self
    }

    pub(crate) fn paging(mut self, paging: &PageFilters) -> Self {
        self.0.push(("page", paging.page.to_string()));
        self.0.push(("pageSize", paging.page_size.to_string()));
        self
    }
}

/// Append an API path to the server address.
///
/// Any path prefix on the server is kept.
pub(crate) fn endpoint(server: &Url, path: &str) -> Result<Url> {
    let base = server.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}{path}"))?)
}

/// Like [`endpoint`], with query parameters.
pub(crate) fn endpoint_with_query(server: &Url, path: &str, query: QueryParams) -> Result<Url> {
    let mut url = endpoint(server, path)?;
    if !query.0.is_empty() {
        url.query_pairs_mut().extend_pairs(query.0);
    }
    Ok(url)
}

/// A request without a body.
pub(crate) fn bare_request(method: Method, url: Url) -> Request {
    let mut request = Request::new(method, url);
    request
        .headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));
    request
}

/// A request with a JSON body.
pub(crate) fn json_request<B: Serialize + ?Sized>(
    method: Method,
    url: Url,
    body: &B,
) -> Result<Request> {
    let bytes = serde_json::to_vec(body).map_err(TeamworkError::Encode)?;
    let mut request = bare_request(method, url);
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *request.body_mut() = Some(bytes.into());
    Ok(request)
}
