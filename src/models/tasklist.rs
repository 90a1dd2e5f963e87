//! Tasklist model.
//!
//! Writes use the legacy `todo-list` envelope; reads use the current API.

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
use crate::values::{LegacyNumber, Relationship};

/// An ordered group of tasks within a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tasklist {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub project: Option<Relationship>,

    #[serde(default)]
    pub milestone: Option<Relationship>,

    #[serde(default)]
    pub is_private: Option<bool>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub display_order: Option<i64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Legacy write payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TasklistFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "milestone-id", skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TasklistPath {
    pub id: i64,
}

/// Create a tasklist. `POST /projects/{projectId}/tasklists.json`.
#[derive(Debug, Clone, Default)]
pub struct TasklistCreateRequest {
    pub project_id: i64,
    pub fields: TasklistFields,
}

impl TasklistCreateRequest {
    pub fn new(project_id: i64, name: impl Into<String>) -> Self {
        Self {
            project_id,
            fields: TasklistFields {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for TasklistCreateRequest {
    type Response = TasklistCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/projects/{}/tasklists.json", self.project_id))?;
        json_request(Method::POST, url, &Envelope("todo-list", &self.fields))
    }
}

/// Result of [`TasklistCreateRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct TasklistCreateResponse {
    #[serde(default, rename = "TASKLISTID")]
    pub id: LegacyNumber,
}

impl ApiResponse for TasklistCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.id.get(), "tasklist")?;
        Ok(response)
    }
}

/// Update a tasklist. `PUT /tasklists/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TasklistUpdateRequest {
    pub path: TasklistPath,
    pub fields: TasklistFields,
}

impl TasklistUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TasklistPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for TasklistUpdateRequest {
    type Response = TasklistUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/tasklists/{}.json", self.path.id))?;
        json_request(Method::PUT, url, &Envelope("todo-list", &self.fields))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TasklistUpdateResponse;

impl ApiResponse for TasklistUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

/// Delete a tasklist. `DELETE /tasklists/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TasklistDeleteRequest {
    pub path: TasklistPath,
}

impl TasklistDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TasklistPath { id },
        }
    }
}

impl ApiRequest for TasklistDeleteRequest {
    type Response = TasklistDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/tasklists/{}.json", self.path.id))?;
        Ok(bare_request(Method::DELETE, url))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TasklistDeleteResponse;

impl ApiResponse for TasklistDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

/// Fetch one tasklist. `GET /projects/api/v3/tasklists/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TasklistGetRequest {
    pub path: TasklistPath,
}

impl TasklistGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TasklistPath { id },
        }
    }
}

impl ApiRequest for TasklistGetRequest {
    type Response = TasklistGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/tasklists/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::GET, url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasklistGetResponse {
    pub tasklist: Tasklist,
}

impl ApiResponse for TasklistGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasklistListFilters {
    pub search_term: Option<String>,
    pub paging: PageFilters,
}

/// List tasklists, optionally within one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasklistListRequest {
    pub project_id: Option<i64>,
    pub filters: TasklistListFilters,
}

impl TasklistListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_project(project_id: i64) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }
}

impl ApiRequest for TasklistListRequest {
    type Response = TasklistListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match self.project_id {
            Some(id) => format!("/projects/api/v3/projects/{id}/tasklists.json"),
            None => "/projects/api/v3/tasklists.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = TasklistListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for TasklistListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TasklistListResponse {
    #[serde(skip)]
    request: TasklistListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub tasklists: Vec<Tasklist>,
}

impl ApiResponse for TasklistListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for TasklistListResponse {
    type Request = TasklistListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}
