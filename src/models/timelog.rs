//! Time log model.

use chrono::{DateTime, Utc};
use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use url::Url;

use crate::engine::RawResponse;
use crate::error::{Result, TeamworkError};
use crate::pagination::{ListMeta, PageFilters};
use crate::traits::{
    bare_request, decode_json, endpoint, endpoint_with_query, json_request, require_id, ApiRequest,
    ApiResponse, Envelope, PagedRequest, Paginated, QueryParams,
};
use crate::values::{Date, Time};

/// Time logged against a task or a project.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timelog {
    /// Zero when the server left it out.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub billable: bool,

    /// Total logged duration.
    #[serde(default)]
    pub minutes: i64,

    /// When the work started.
    #[serde(default)]
    pub time_logged: Option<DateTime<Utc>>,

    #[serde(default)]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub project_id: Option<i64>,

    #[serde(default)]
    pub task_id: Option<i64>,

    #[serde(default)]
    pub tag_ids: Vec<i64>,

    #[serde(default)]
    pub logged_by: Option<i64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_by: Option<i64>,

    #[serde(default)]
    pub deleted: Option<bool>,

    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Writable fields shared by create and update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelogFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Time>,

    /// Whether `date` and `time` are in UTC rather than the user's zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_utc: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,

    /// Log on behalf of another user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

/// Where a time log is filed. The task wins when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelogScope {
    pub task_id: Option<i64>,
    pub project_id: Option<i64>,
}

impl TimelogScope {
    fn path(self) -> Option<String> {
        match (self.task_id, self.project_id) {
            (Some(id), _) => Some(format!("/projects/api/v3/tasks/{id}/time.json")),
            (None, Some(id)) => Some(format!("/projects/api/v3/projects/{id}/time.json")),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelogPath {
    pub id: i64,
}

fn timelog_url(server: &Url, path: TimelogPath) -> Result<Url> {
    endpoint(server, &format!("/projects/api/v3/time/{}.json", path.id))
}

// -----------------------------------------------------------------------------
// Create
// -----------------------------------------------------------------------------

/// Log time against a task or a project.
///
/// Building the request fails with [`TeamworkError::InvalidInput`] when
/// neither a task nor a project is set.
#[derive(Debug, Clone, Default)]
pub struct TimelogCreateRequest {
    pub scope: TimelogScope,
    pub fields: TimelogFields,
}

impl TimelogCreateRequest {
    /// Log `hours` and `minutes` on `date` against a task.
    pub fn for_task(task_id: i64, date: Date, hours: i64, minutes: i64) -> Self {
        Self::new(
            TimelogScope {
                task_id: Some(task_id),
                project_id: None,
            },
            date,
            hours,
            minutes,
        )
    }

    /// Log `hours` and `minutes` on `date` against a project.
    pub fn for_project(project_id: i64, date: Date, hours: i64, minutes: i64) -> Self {
        Self::new(
            TimelogScope {
                task_id: None,
                project_id: Some(project_id),
            },
            date,
            hours,
            minutes,
        )
    }

    fn new(scope: TimelogScope, date: Date, hours: i64, minutes: i64) -> Self {
        Self {
            scope,
            fields: TimelogFields {
                date: Some(date),
                hours: Some(hours),
                minutes: Some(minutes),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for TimelogCreateRequest {
    type Response = TimelogCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = self.scope.path().ok_or_else(|| {
            TeamworkError::InvalidInput("time log needs a task or a project".to_string())
        })?;
        let url = endpoint(server, &path)?;
        json_request(Method::POST, url, &Envelope("timelog", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelogCreateResponse {
    #[serde(default)]
    pub timelog: Timelog,
}

impl ApiResponse for TimelogCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.timelog.id, "timelog")?;
        Ok(response)
    }
}

// -----------------------------------------------------------------------------
// Update / Delete / Get
// -----------------------------------------------------------------------------

/// Update a time log. `PATCH /projects/api/v3/time/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TimelogUpdateRequest {
    pub path: TimelogPath,
    pub fields: TimelogFields,
}

impl TimelogUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TimelogPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for TimelogUpdateRequest {
    type Response = TimelogUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = timelog_url(server, self.path)?;
        json_request(Method::PATCH, url, &Envelope("timelog", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelogUpdateResponse {
    pub timelog: Timelog,
}

impl ApiResponse for TimelogUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelogDeleteRequest {
    pub path: TimelogPath,
}

impl TimelogDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TimelogPath { id },
        }
    }
}

impl ApiRequest for TimelogDeleteRequest {
    type Response = TimelogDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::DELETE, timelog_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelogDeleteResponse;

impl ApiResponse for TimelogDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::NO_CONTENT;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelogGetRequest {
    pub path: TimelogPath,
}

impl TimelogGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TimelogPath { id },
        }
    }
}

impl ApiRequest for TimelogGetRequest {
    type Response = TimelogGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, timelog_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelogGetResponse {
    pub timelog: Timelog,
}

impl ApiResponse for TimelogGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelogListFilters {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub assigned_to_user_ids: Vec<i64>,
    /// "all", "billable" or "non-billable".
    pub billable_type: Option<String>,
    pub paging: PageFilters,
}

/// List time logs site-wide, on a project, or on a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelogListRequest {
    pub scope: TimelogScope,
    pub filters: TimelogListFilters,
}

impl TimelogListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_task(task_id: i64) -> Self {
        Self {
            scope: TimelogScope {
                task_id: Some(task_id),
                project_id: None,
            },
            ..Default::default()
        }
    }

    pub fn for_project(project_id: i64) -> Self {
        Self {
            scope: TimelogScope {
                task_id: None,
                project_id: Some(project_id),
            },
            ..Default::default()
        }
    }
}

impl ApiRequest for TimelogListRequest {
    type Response = TimelogListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = self
            .scope
            .path()
            .unwrap_or_else(|| "/projects/api/v3/time.json".to_string());
        let query = QueryParams::new()
            .opt("startDate", self.filters.start_date)
            .opt("endDate", self.filters.end_date)
            .ids("assignedToUserIds", &self.filters.assigned_to_user_ids)
            .opt("billableType", self.filters.billable_type.as_deref())
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = TimelogListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for TimelogListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelogListResponse {
    #[serde(skip)]
    request: TimelogListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub timelogs: Vec<Timelog>,
}

impl ApiResponse for TimelogListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for TimelogListResponse {
    type Request = TimelogListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}
