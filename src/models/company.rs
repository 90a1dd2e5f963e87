//! Company model and request/response pairs.
//!
//! Companies live entirely on the current API generation under the
//! `company` envelope.

use chrono::{DateTime, Utc};
use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use url::Url;

use crate::engine::RawResponse;
use crate::error::Result;
use crate::pagination::{ListMeta, PageFilters};
use crate::traits::{
    bare_request, decode_json, endpoint, endpoint_with_query, json_request, require_id, ApiRequest,
    ApiResponse, Envelope, PagedRequest, Paginated, QueryParams,
};
use crate::values::Relationship;

/// A client, supplier or partner company.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Zero when the server left it out.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub address_one: Option<String>,

    #[serde(default)]
    pub address_two: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub zip: Option<String>,

    /// ISO 3166 country code.
    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub fax: Option<String>,

    #[serde(default)]
    pub email_one: Option<String>,

    #[serde(default)]
    pub email_two: Option<String>,

    #[serde(default)]
    pub email_three: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,

    /// User managing the relationship with this company.
    #[serde(default)]
    pub client_managed_by: Option<Relationship>,

    #[serde(default)]
    pub industry: Option<Relationship>,

    #[serde(default)]
    pub tags: Vec<Relationship>,

    /// "active" or "deleted".
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Identifies one company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyPath {
    pub id: i64,
}

// -----------------------------------------------------------------------------
// Create
// -----------------------------------------------------------------------------

/// Create a company. `POST /projects/api/v3/companies.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreateRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_one: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_two: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_one: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_two: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_three: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Id of the managing user.
    #[serde(rename = "clientManagedBy", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,

    #[serde(rename = "industryCatId", skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

impl CompanyCreateRequest {
    /// A create request with only the required name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ApiRequest for CompanyCreateRequest {
    type Response = CompanyCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, "/projects/api/v3/companies.json")?;
        json_request(Method::POST, url, &Envelope("company", self))
    }
}

/// Result of [`CompanyCreateRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyCreateResponse {
    #[serde(default)]
    pub company: Company,
}

impl ApiResponse for CompanyCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.company.id, "company")?;
        Ok(response)
    }
}

// -----------------------------------------------------------------------------
// Update
// -----------------------------------------------------------------------------

/// Update a company. `PATCH /projects/api/v3/companies/{id}.json`.
///
/// Only fields that are set are sent. `manager_id` is tri-state: leave it
/// `None` to keep the manager, `Some(None)` to clear it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdateRequest {
    #[serde(skip)]
    pub path: CompanyPath,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_one: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_two: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_one: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(
        rename = "clientManagedBy",
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub manager_id: Option<Option<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

impl CompanyUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CompanyPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for CompanyUpdateRequest {
    type Response = CompanyUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/companies/{}.json", self.path.id),
        )?;
        json_request(Method::PATCH, url, &Envelope("company", self))
    }
}

/// Result of [`CompanyUpdateRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyUpdateResponse {
    pub company: Company,
}

impl ApiResponse for CompanyUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// Delete
// -----------------------------------------------------------------------------

/// Delete a company. `DELETE /projects/api/v3/companies/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct CompanyDeleteRequest {
    pub path: CompanyPath,
}

impl CompanyDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CompanyPath { id },
        }
    }
}

impl ApiRequest for CompanyDeleteRequest {
    type Response = CompanyDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/companies/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::DELETE, url))
    }
}

/// Result of [`CompanyDeleteRequest`]. The server sends no body.
#[derive(Debug, Clone, Default)]
pub struct CompanyDeleteResponse;

impl ApiResponse for CompanyDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::NO_CONTENT;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

// -----------------------------------------------------------------------------
// Get
// -----------------------------------------------------------------------------

/// Fetch one company. `GET /projects/api/v3/companies/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct CompanyGetRequest {
    pub path: CompanyPath,
}

impl CompanyGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CompanyPath { id },
        }
    }
}

impl ApiRequest for CompanyGetRequest {
    type Response = CompanyGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/companies/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::GET, url))
    }
}

/// Result of [`CompanyGetRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyGetResponse {
    pub company: Company,
}

impl ApiResponse for CompanyGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

/// Filters for listing companies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyListFilters {
    /// Matches against name and contact details.
    pub search_term: Option<String>,
    pub tag_ids: Vec<i64>,
    /// Require every tag in `tag_ids` rather than any of them.
    pub match_all_tags: Option<bool>,
    pub paging: PageFilters,
}

/// List companies. `GET /projects/api/v3/companies.json`.
///
/// Query order: `searchTerm, tagIds, matchAllTags, page, pageSize`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyListRequest {
    pub filters: CompanyListFilters,
}

impl CompanyListRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiRequest for CompanyListRequest {
    type Response = CompanyListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .ids("tagIds", &self.filters.tag_ids)
            .opt("matchAllTags", self.filters.match_all_tags)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, "/projects/api/v3/companies.json", query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = CompanyListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for CompanyListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

/// Result of [`CompanyListRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListResponse {
    #[serde(skip)]
    request: CompanyListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub companies: Vec<Company>,
}

impl ApiResponse for CompanyListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for CompanyListResponse {
    type Request = CompanyListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeamworkError;

    fn server() -> Url {
        Url::parse("https://x.test").unwrap()
    }

    fn body_json(request: &Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_create_builds_enveloped_post() {
        let request = CompanyCreateRequest::new("Acme").http_request(&server()).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://x.test/projects/api/v3/companies.json"
        );
        assert_eq!(body_json(&request), serde_json::json!({"company": {"name": "Acme"}}));
    }

    #[test]
    fn test_create_response_decodes_id() {
        let raw = RawResponse::new(201, r#"{"company": {"id": 42, "name": "Acme"}}"#);
        let response = CompanyCreateRequest::new("Acme").parse_response(raw).unwrap();
        assert_eq!(response.company.id, 42);
        assert_eq!(response.company.name, "Acme");
    }

    #[test]
    fn test_create_response_with_wrong_status() {
        let raw = RawResponse::new(200, r#"{"company": {"id": 42, "name": "Acme"}}"#);
        let err = CompanyCreateRequest::new("Acme").parse_response(raw).unwrap_err();
        assert!(matches!(err, TeamworkError::UnexpectedStatus { status: 200, .. }));
    }

    #[test]
    fn test_create_response_with_zero_id() {
        let raw = RawResponse::new(201, r#"{"company": {"id": 0, "name": "Acme"}}"#);
        let err = CompanyCreateRequest::new("Acme").parse_response(raw).unwrap_err();
        assert!(matches!(err, TeamworkError::MissingId { entity: "company" }));
    }

    #[test]
    fn test_create_response_without_id() {
        for body in [
            r#"{"company": {"name": "Acme"}}"#,
            r#"{"company": {"id": null, "name": "Acme"}}"#,
            r#"{}"#,
        ] {
            let raw = RawResponse::new(201, body);
            let err = CompanyCreateRequest::new("Acme").parse_response(raw).unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "company" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_update_can_clear_manager() {
        let mut request = CompanyUpdateRequest::new(7);
        request.manager_id = Some(None);
        request.city = Some("Cork".to_string());

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::PATCH);
        assert_eq!(http.url().path(), "/projects/api/v3/companies/7.json");
        assert_eq!(
            body_json(&http),
            serde_json::json!({"company": {"city": "Cork", "clientManagedBy": null}})
        );
    }

    #[test]
    fn test_update_omits_untouched_manager() {
        let http = CompanyUpdateRequest::new(7).http_request(&server()).unwrap();
        assert_eq!(body_json(&http), serde_json::json!({"company": {}}));
    }

    #[test]
    fn test_delete_expects_no_content() {
        let request = CompanyDeleteRequest::new(3);
        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::DELETE);
        assert!(http.body().is_none());

        assert!(request.parse_response(RawResponse::new(204, "")).is_ok());
        assert!(request.parse_response(RawResponse::new(200, "")).is_err());
    }

    #[test]
    fn test_get_decodes_relationships() {
        let raw = RawResponse::new(
            200,
            r#"{"company": {
                "id": 5,
                "name": "Globex",
                "countryCode": "IE",
                "clientManagedBy": {"id": 12, "type": "users"},
                "tags": [{"id": 1, "type": "tags"}],
                "status": "active",
                "createdAt": "2024-03-01T09:00:00Z"
            }}"#,
        );
        let response = CompanyGetRequest::new(5).parse_response(raw).unwrap();
        let company = response.company;
        assert_eq!(company.country_code.as_deref(), Some("IE"));
        assert_eq!(company.client_managed_by.map(|r| r.id), Some(12));
        assert_eq!(company.tags.len(), 1);
        assert!(company.created_at.is_some());
    }

    #[test]
    fn test_list_defaults() {
        let request = CompanyListRequest::new();
        assert_eq!(request.filters.paging.page, 1);
        assert_eq!(request.filters.paging.page_size, 50);

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().query(), Some("page=1&pageSize=50"));
    }

    #[test]
    fn test_list_query_order() {
        let mut request = CompanyListRequest::new();
        request.filters.search_term = Some("acme".to_string());
        request.filters.tag_ids = vec![1, 2];
        request.filters.match_all_tags = Some(true);

        let http = request.http_request(&server()).unwrap();
        assert_eq!(
            http.url().query(),
            Some("searchTerm=acme&tagIds=1%2C2&matchAllTags=true&page=1&pageSize=50")
        );
    }

    #[test]
    fn test_list_iterate() {
        let mut request = CompanyListRequest::new();
        request.filters.search_term = Some("acme".to_string());

        let raw = RawResponse::new(
            200,
            r#"{"meta": {"page": {"hasMore": true}}, "companies": [{"id": 1, "name": "Acme"}]}"#,
        );
        let response = request.parse_response(raw).unwrap();
        assert_eq!(response.companies.len(), 1);

        let next = response.iterate().expect("expected a next page");
        assert_eq!(next.filters.paging.page, 2);
        assert_eq!(next.filters.paging.page_size, 50);
        assert_eq!(next.filters.search_term.as_deref(), Some("acme"));

        let raw = RawResponse::new(
            200,
            r#"{"meta": {"page": {"hasMore": false}}, "companies": []}"#,
        );
        let last = next.parse_response(raw).unwrap();
        assert!(last.iterate().is_none());
    }

    #[test]
    fn test_list_iterate_stops_at_last_page_number() {
        let mut request = CompanyListRequest::new();
        request.filters.paging.page = u32::MAX;

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": true}}}"#);
        let response = request.parse_response(raw).unwrap();
        assert!(response.iterate().is_none());
    }
}
