//! Project model.
//!
//! Writes go through the legacy endpoints with their kebab-case envelope.
//! Reads use the current generation.

use chrono::{DateTime, Utc};
use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::engine::RawResponse;
use crate::error::Result;
use crate::pagination::{ListMeta, PageFilters};
use crate::traits::{
    bare_request, decode_json, endpoint, endpoint_with_query, json_request, require_id, ApiRequest,
    ApiResponse, Envelope, PagedRequest, Paginated, QueryParams,
};
use crate::values::{Date, LegacyDate, LegacyNumber, LegacyNumericList, Relationship};

/// A project as returned by the current API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// "active", "inactive" or "deleted".
    #[serde(default)]
    pub status: Option<String>,

    /// "current", "late" or "completed".
    #[serde(default)]
    pub sub_status: Option<String>,

    #[serde(default)]
    pub start_at: Option<Date>,

    #[serde(default)]
    pub end_at: Option<Date>,

    #[serde(default)]
    pub company: Option<Relationship>,

    #[serde(default)]
    pub category: Option<Relationship>,

    #[serde(default)]
    pub owned_by: Option<i64>,

    #[serde(default)]
    pub tags: Vec<Relationship>,

    #[serde(default)]
    pub is_starred: Option<bool>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<i64>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_by: Option<i64>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_by: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectPath {
    pub id: i64,
}

/// Legacy write payload shared by create and update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "start-date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<LegacyDate>,

    #[serde(rename = "end-date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<LegacyDate>,

    #[serde(rename = "category-id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    #[serde(rename = "companyId", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,

    /// Name of a company to create and attach the project to.
    #[serde(rename = "newCompany", skip_serializing_if = "Option::is_none")]
    pub new_company: Option<String>,

    #[serde(rename = "tagIds", skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<LegacyNumericList>,
}

// -----------------------------------------------------------------------------
// Create
// -----------------------------------------------------------------------------

/// Create a project. `POST /projects.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectCreateRequest {
    pub fields: ProjectFields,
}

impl ProjectCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: ProjectFields {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for ProjectCreateRequest {
    type Response = ProjectCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, "/projects.json")?;
        json_request(Method::POST, url, &Envelope("project", &self.fields))
    }
}

/// Result of [`ProjectCreateRequest`]. Only the new id comes back.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreateResponse {
    #[serde(default)]
    pub id: LegacyNumber,
}

impl ApiResponse for ProjectCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.id.get(), "project")?;
        Ok(response)
    }
}

// -----------------------------------------------------------------------------
// Update
// -----------------------------------------------------------------------------

/// Update a project. `PUT /projects/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdateRequest {
    pub path: ProjectPath,
    pub fields: ProjectFields,
}

impl ProjectUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: ProjectPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for ProjectUpdateRequest {
    type Response = ProjectUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/projects/{}.json", self.path.id))?;
        json_request(Method::PUT, url, &Envelope("project", &self.fields))
    }
}

/// Result of [`ProjectUpdateRequest`]. The legacy API echoes only a status.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdateResponse;

impl ApiResponse for ProjectUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

// -----------------------------------------------------------------------------
// Delete
// -----------------------------------------------------------------------------

/// Delete a project. `DELETE /projects/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectDeleteRequest {
    pub path: ProjectPath,
}

impl ProjectDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: ProjectPath { id },
        }
    }
}

impl ApiRequest for ProjectDeleteRequest {
    type Response = ProjectDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/projects/{}.json", self.path.id))?;
        Ok(bare_request(Method::DELETE, url))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDeleteResponse;

impl ApiResponse for ProjectDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

// -----------------------------------------------------------------------------
// Get
// -----------------------------------------------------------------------------

/// Fetch one project. `GET /projects/api/v3/projects/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectGetRequest {
    pub path: ProjectPath,
}

impl ProjectGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: ProjectPath { id },
        }
    }
}

impl ApiRequest for ProjectGetRequest {
    type Response = ProjectGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/projects/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::GET, url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectGetResponse {
    pub project: Project,
}

impl ApiResponse for ProjectGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListFilters {
    pub search_term: Option<String>,
    pub tag_ids: Vec<i64>,
    pub match_all_tags: Option<bool>,
    pub paging: PageFilters,
}

/// List projects. `GET /projects/api/v3/projects.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListRequest {
    pub filters: ProjectListFilters,
}

impl ProjectListRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiRequest for ProjectListRequest {
    type Response = ProjectListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .ids("tagIds", &self.filters.tag_ids)
            .opt("matchAllTags", self.filters.match_all_tags)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, "/projects/api/v3/projects.json", query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = ProjectListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for ProjectListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListResponse {
    #[serde(skip)]
    request: ProjectListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ApiResponse for ProjectListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for ProjectListResponse {
    type Request = ProjectListRequest;

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
    fn test_create_uses_legacy_envelope() {
        let mut request = ProjectCreateRequest::new("Website");
        request.fields.start_date = LegacyDate::from_ymd(2024, 1, 31);
        request.fields.category_id = Some(4);
        request.fields.tag_ids = Some(LegacyNumericList::new(vec![1, 2, 3]));

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::POST);
        assert_eq!(http.url().as_str(), "https://x.test/projects.json");
        assert_eq!(
            body_json(&http),
            serde_json::json!({"project": {
                "name": "Website",
                "start-date": "20240131",
                "category-id": 4,
                "tagIds": "1,2,3"
            }})
        );
    }

    #[test]
    fn test_create_response_reads_string_id() {
        let raw = RawResponse::new(201, r#"{"id": "123", "STATUS": "OK"}"#);
        let response = ProjectCreateRequest::new("x").parse_response(raw).unwrap();
        assert_eq!(response.id.get(), 123);
    }

    #[test]
    fn test_create_response_rejects_zero_id() {
        for body in [r#"{"id": "0"}"#, r#"{"id": 0}"#, r#"{"id": null}"#, r#"{"STATUS": "OK"}"#] {
            let raw = RawResponse::new(201, body);
            let err = ProjectCreateRequest::new("x").parse_response(raw).unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "project" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_update_is_put_with_only_set_fields() {
        let mut request = ProjectUpdateRequest::new(9);
        request.fields.end_date = LegacyDate::from_ymd(2024, 12, 1);

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::PUT);
        assert_eq!(http.url().path(), "/projects/9.json");
        assert_eq!(
            body_json(&http),
            serde_json::json!({"project": {"end-date": "20241201"}})
        );

        let raw = RawResponse::new(200, r#"{"STATUS": "OK"}"#);
        assert!(request.parse_response(raw).is_ok());
    }

    #[test]
    fn test_delete_expects_ok() {
        let request = ProjectDeleteRequest::new(9);
        assert!(request.parse_response(RawResponse::new(200, "")).is_ok());
        assert!(request.parse_response(RawResponse::new(204, "")).is_err());
    }

    #[test]
    fn test_get_decodes_current_dates() {
        let raw = RawResponse::new(
            200,
            r#"{"project": {
                "id": 9,
                "name": "Website",
                "status": "active",
                "startAt": "2024-01-31",
                "company": {"id": 3, "type": "companies"}
            }}"#,
        );
        let project = ProjectGetRequest::new(9).parse_response(raw).unwrap().project;
        assert_eq!(project.start_at, Date::from_ymd(2024, 1, 31));
        assert_eq!(project.company.map(|c| c.id), Some(3));
    }

    #[test]
    fn test_list_keeps_filters_across_pages() {
        let mut request = ProjectListRequest::new();
        request.filters.tag_ids = vec![8];
        request.filters.paging = PageFilters::for_page(3, 10);

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().query(), Some("tagIds=8&page=3&pageSize=10"));

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": true}}, "projects": []}"#);
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        assert_eq!(next.filters.paging, PageFilters::for_page(4, 10));
        assert_eq!(next.filters.tag_ids, vec![8]);
    }
}
