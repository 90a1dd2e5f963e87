//! Task model and request/response pairs.

use std::fmt;

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
use crate::values::{Date, Relationship};

/// A single unit of work inside a tasklist.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Zero when the server left it out.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<TaskPriority>,

    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: Option<i64>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub parent_task: Option<Relationship>,

    #[serde(default)]
    pub tasklist: Option<Relationship>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub estimate_minutes: Option<i64>,

    #[serde(default)]
    pub assignees: Vec<Relationship>,

    #[serde(default)]
    pub tags: Vec<Relationship>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<i64>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_by: Option<i64>,

    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deleted_by: Option<i64>,
}

/// Who a task is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignees {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_ids: Vec<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<i64>,
}

impl TaskAssignees {
    pub fn users(ids: impl Into<Vec<i64>>) -> Self {
        Self {
            user_ids: ids.into(),
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.company_ids.is_empty() && self.team_ids.is_empty()
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        })
    }
}

/// Writable task fields, shared by create and update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Date>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Date>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,

    #[serde(skip_serializing_if = "TaskAssignees::is_empty")]
    pub assignees: TaskAssignees,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPath {
    pub id: i64,
}

fn task_url(server: &Url, path: TaskPath) -> Result<Url> {
    endpoint(server, &format!("/projects/api/v3/tasks/{}.json", path.id))
}

// -----------------------------------------------------------------------------
// Create
// -----------------------------------------------------------------------------

/// Parent tasklist of a new task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCreatePath {
    pub tasklist_id: i64,
}

/// Create a task. `POST /projects/api/v3/tasklists/{tasklistId}/tasks.json`.
#[derive(Debug, Clone, Default)]
pub struct TaskCreateRequest {
    pub path: TaskCreatePath,
    pub fields: TaskFields,
}

impl TaskCreateRequest {
    pub fn new(tasklist_id: i64, name: impl Into<String>) -> Self {
        Self {
            path: TaskCreatePath { tasklist_id },
            fields: TaskFields {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for TaskCreateRequest {
    type Response = TaskCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/tasklists/{}/tasks.json", self.path.tasklist_id),
        )?;
        json_request(Method::POST, url, &Envelope("task", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreateResponse {
    #[serde(default)]
    pub task: Task,
}

impl ApiResponse for TaskCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.task.id, "task")?;
        Ok(response)
    }
}

// -----------------------------------------------------------------------------
// Update
// -----------------------------------------------------------------------------

/// Update a task. `PATCH /projects/api/v3/tasks/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdateRequest {
    pub path: TaskPath,
    pub fields: TaskFields,
}

impl TaskUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TaskPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for TaskUpdateRequest {
    type Response = TaskUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = task_url(server, self.path)?;
        json_request(Method::PATCH, url, &Envelope("task", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdateResponse {
    pub task: Task,
}

impl ApiResponse for TaskUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// Delete
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TaskDeleteRequest {
    pub path: TaskPath,
}

impl TaskDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TaskPath { id },
        }
    }
}

impl ApiRequest for TaskDeleteRequest {
    type Response = TaskDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::DELETE, task_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskDeleteResponse;

impl ApiResponse for TaskDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::NO_CONTENT;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

// -----------------------------------------------------------------------------
// Get
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TaskGetRequest {
    pub path: TaskPath,
}

impl TaskGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TaskPath { id },
        }
    }
}

impl ApiRequest for TaskGetRequest {
    type Response = TaskGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, task_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskGetResponse {
    pub task: Task,
}

impl ApiResponse for TaskGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

/// Scope of a task listing. A tasklist wins over a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListPath {
    pub tasklist_id: Option<i64>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListFilters {
    pub search_term: Option<String>,
    pub tag_ids: Vec<i64>,
    pub match_all_tags: Option<bool>,
    pub assignee_user_ids: Vec<i64>,
    pub paging: PageFilters,
}

/// List tasks across the site, a project or a tasklist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListRequest {
    pub path: TaskListPath,
    pub filters: TaskListFilters,
}

impl TaskListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_tasklist(tasklist_id: i64) -> Self {
        Self {
            path: TaskListPath {
                tasklist_id: Some(tasklist_id),
                project_id: None,
            },
            ..Default::default()
        }
    }

    pub fn for_project(project_id: i64) -> Self {
        Self {
            path: TaskListPath {
                tasklist_id: None,
                project_id: Some(project_id),
            },
            ..Default::default()
        }
    }
}

impl ApiRequest for TaskListRequest {
    type Response = TaskListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match (self.path.tasklist_id, self.path.project_id) {
            (Some(id), _) => format!("/projects/api/v3/tasklists/{id}/tasks.json"),
            (None, Some(id)) => format!("/projects/api/v3/projects/{id}/tasks.json"),
            (None, None) => "/projects/api/v3/tasks.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .ids("tagIds", &self.filters.tag_ids)
            .opt("matchAllTags", self.filters.match_all_tags)
            .ids("assigneeUserIds", &self.filters.assignee_user_ids)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = TaskListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for TaskListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListResponse {
    #[serde(skip)]
    request: TaskListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ApiResponse for TaskListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for TaskListResponse {
    type Request = TaskListRequest;

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
    fn test_create_under_tasklist() {
        let mut request = TaskCreateRequest::new(11, "Write docs");
        request.fields.priority = Some(TaskPriority::High);
        request.fields.due_at = Date::from_ymd(2024, 2, 29);
        request.fields.assignees = TaskAssignees::users(vec![5, 6]);

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/tasklists/11/tasks.json");
        assert_eq!(
            body_json(&http),
            serde_json::json!({"task": {
                "name": "Write docs",
                "priority": "high",
                "dueAt": "2024-02-29",
                "assignees": {"userIds": [5, 6]}
            }})
        );
    }

    #[test]
    fn test_create_response_with_zero_id() {
        for body in [
            r#"{"task": {"id": 0, "name": "x"}}"#,
            r#"{"task": {"name": "x"}}"#,
        ] {
            let raw = RawResponse::new(201, body);
            let err = TaskCreateRequest::new(11, "x").parse_response(raw).unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "task" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_priority_decodes_lowercase() {
        let decode = |priority: &str| {
            serde_json::from_str::<Task>(&format!(r#"{{"name": "x", "priority": {priority}}}"#))
        };
        assert_eq!(decode(r#""medium""#).unwrap().priority, Some(TaskPriority::Medium));
        assert_eq!(decode("null").unwrap().priority, None);
        assert!(decode(r#""urgent""#).is_err());
        assert_eq!(TaskPriority::Medium.to_string(), "medium");
    }

    #[test]
    fn test_update_is_patch() {
        let mut request = TaskUpdateRequest::new(4);
        request.fields.progress = Some(50);
        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::PATCH);
        assert_eq!(http.url().path(), "/projects/api/v3/tasks/4.json");
        assert_eq!(body_json(&http), serde_json::json!({"task": {"progress": 50}}));
    }

    #[test]
    fn test_list_path_priority() {
        let server = server();

        let mut request = TaskListRequest::for_project(2);
        request.path.tasklist_id = Some(3);
        let http = request.http_request(&server).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/tasklists/3/tasks.json");

        let http = TaskListRequest::for_project(2).http_request(&server).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/projects/2/tasks.json");

        let http = TaskListRequest::new().http_request(&server).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/tasks.json");
    }

    #[test]
    fn test_list_query() {
        let mut request = TaskListRequest::new();
        request.filters.assignee_user_ids = vec![5];
        request.filters.search_term = Some("docs".to_string());
        let http = request.http_request(&server()).unwrap();
        assert_eq!(
            http.url().query(),
            Some("searchTerm=docs&assigneeUserIds=5&page=1&pageSize=50")
        );
    }

    #[test]
    fn test_list_response_decodes_tasks() {
        let raw = RawResponse::new(
            200,
            r#"{
                "meta": {"page": {"pageOffset": 0, "pageSize": 50, "count": 1, "hasMore": false}},
                "tasks": [{
                    "id": 1,
                    "name": "Write docs",
                    "tasklist": {"id": 3, "type": "tasklists"},
                    "assignees": [{"id": 5, "type": "users"}],
                    "dueDate": "2024-02-29T00:00:00Z"
                }]
            }"#,
        );
        let response = TaskListRequest::for_tasklist(3).parse_response(raw).unwrap();
        assert_eq!(response.tasks[0].assignees[0].id, 5);
        assert_eq!(response.meta.page.count, 1);
        assert!(response.iterate().is_none());
    }

    #[test]
    fn test_list_iterate_keeps_path_and_filters() {
        let mut request = TaskListRequest::for_project(2);
        request.filters.search_term = Some("docs".to_string());
        assert_eq!(request.filters.paging, PageFilters::default());

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": true}}, "tasks": []}"#);
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        let http = next.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/projects/2/tasks.json");
        assert_eq!(http.url().query(), Some("searchTerm=docs&page=2&pageSize=50"));
    }
}
