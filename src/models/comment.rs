//! Comment model.
//!
//! Comments hang off another item. Writes use the legacy endpoints of the
//! parent; reads use the current API.

use std::fmt;

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

/// A comment on a task, milestone, notebook, link or file version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,

    pub body: String,

    #[serde(default)]
    pub html_body: Option<String>,

    /// "TEXT" or "HTML".
    #[serde(default)]
    pub content_type: Option<String>,

    /// The item this comment is attached to.
    #[serde(default)]
    pub object: Option<Relationship>,

    #[serde(default)]
    pub project: Option<Relationship>,

    #[serde(default)]
    pub posted_by: Option<i64>,

    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_edited_by: Option<i64>,

    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deleted: Option<bool>,

    #[serde(default)]
    pub deleted_by: Option<i64>,

    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Kind of item a comment can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentResource {
    Task,
    Milestone,
    Notebook,
    Link,
    FileVersion,
}

impl CommentResource {
    /// Path segment for this resource.
    pub fn as_str(self) -> &'static str {
        match self {
            CommentResource::Task => "tasks",
            CommentResource::Milestone => "milestones",
            CommentResource::Notebook => "notebooks",
            CommentResource::Link => "links",
            CommentResource::FileVersion => "fileversions",
        }
    }
}

impl fmt::Display for CommentResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The item a comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentParent {
    pub resource: CommentResource,
    pub id: i64,
}

/// Legacy write payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// "TEXT" or "HTML".
    #[serde(rename = "content-type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// "all", or a comma-separated list of user ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentPath {
    pub id: i64,
}

/// Create a comment. `POST /{resource}/{id}/comments.json`.
#[derive(Debug, Clone)]
pub struct CommentCreateRequest {
    pub parent: CommentParent,
    pub fields: CommentFields,
}

impl CommentCreateRequest {
    pub fn new(resource: CommentResource, id: i64, body: impl Into<String>) -> Self {
        Self {
            parent: CommentParent { resource, id },
            fields: CommentFields {
                body: Some(body.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for CommentCreateRequest {
    type Response = CommentCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/{}/{}/comments.json", self.parent.resource, self.parent.id),
        )?;
        json_request(Method::POST, url, &Envelope("comment", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreateResponse {
    #[serde(default)]
    pub id: LegacyNumber,
}

impl ApiResponse for CommentCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.id.get(), "comment")?;
        Ok(response)
    }
}

/// Update a comment. `PUT /comments/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct CommentUpdateRequest {
    pub path: CommentPath,
    pub fields: CommentFields,
}

impl CommentUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CommentPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for CommentUpdateRequest {
    type Response = CommentUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/comments/{}.json", self.path.id))?;
        json_request(Method::PUT, url, &Envelope("comment", &self.fields))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentUpdateResponse;

impl ApiResponse for CommentUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentDeleteRequest {
    pub path: CommentPath,
}

impl CommentDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CommentPath { id },
        }
    }
}

impl ApiRequest for CommentDeleteRequest {
    type Response = CommentDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/comments/{}.json", self.path.id))?;
        Ok(bare_request(Method::DELETE, url))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentDeleteResponse;

impl ApiResponse for CommentDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentGetRequest {
    pub path: CommentPath,
}

impl CommentGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: CommentPath { id },
        }
    }
}

impl ApiRequest for CommentGetRequest {
    type Response = CommentGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/comments/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::GET, url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentGetResponse {
    pub comment: Comment,
}

impl ApiResponse for CommentGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentListFilters {
    pub search_term: Option<String>,
    pub user_ids: Vec<i64>,
    pub paging: PageFilters,
}

/// List comments site-wide or on one parent item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentListRequest {
    pub parent: Option<CommentParent>,
    pub filters: CommentListFilters,
}

impl CommentListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_parent(resource: CommentResource, id: i64) -> Self {
        Self {
            parent: Some(CommentParent { resource, id }),
            ..Default::default()
        }
    }
}

impl ApiRequest for CommentListRequest {
    type Response = CommentListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match self.parent {
            Some(parent) => format!(
                "/projects/api/v3/{}/{}/comments.json",
                parent.resource, parent.id
            ),
            None => "/projects/api/v3/comments.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .ids("userIds", &self.filters.user_ids)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = CommentListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for CommentListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListResponse {
    #[serde(skip)]
    request: CommentListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl ApiResponse for CommentListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for CommentListResponse {
    type Request = CommentListRequest;

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

    #[test]
    fn test_create_on_each_parent() {
        let cases = [
            (CommentResource::Task, "/tasks/4/comments.json"),
            (CommentResource::Milestone, "/milestones/4/comments.json"),
            (CommentResource::Notebook, "/notebooks/4/comments.json"),
            (CommentResource::Link, "/links/4/comments.json"),
            (CommentResource::FileVersion, "/fileversions/4/comments.json"),
        ];
        for (resource, path) in cases {
            let http = CommentCreateRequest::new(resource, 4, "hi")
                .http_request(&server())
                .unwrap();
            assert_eq!(http.url().path(), path);
        }
    }

    #[test]
    fn test_create_body_and_response() {
        let mut request = CommentCreateRequest::new(CommentResource::Task, 4, "<p>hi</p>");
        request.fields.content_type = Some("HTML".to_string());
        let http = request.http_request(&server()).unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(http.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"comment": {"body": "<p>hi</p>", "content-type": "HTML"}})
        );

        let raw = RawResponse::new(201, r#"{"id": "501", "STATUS": "OK"}"#);
        assert_eq!(request.parse_response(raw).unwrap().id.get(), 501);
    }

    #[test]
    fn test_list_on_parent() {
        let mut request = CommentListRequest::for_parent(CommentResource::Milestone, 9);
        request.filters.user_ids = vec![1];
        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/milestones/9/comments.json");
        assert_eq!(http.url().query(), Some("userIds=1&page=1&pageSize=50"));
    }

    #[test]
    fn test_get_decodes_object() {
        let raw = RawResponse::new(
            200,
            r#"{"comment": {"id": 501, "body": "hi", "object": {"id": 4, "type": "tasks"}}}"#,
        );
        let comment = CommentGetRequest::new(501).parse_response(raw).unwrap().comment;
        assert!(comment.object.unwrap().is("tasks"));
    }

    #[test]
    fn test_create_response_with_zero_id() {
        let request = CommentCreateRequest::new(CommentResource::Task, 4, "hi");
        for body in [r#"{"id": "0", "STATUS": "OK"}"#, r#"{"STATUS": "OK"}"#] {
            let err = request
                .parse_response(RawResponse::new(201, body))
                .unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "comment" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_list_iterate_keeps_parent() {
        let mut request = CommentListRequest::for_parent(CommentResource::Task, 4);
        request.filters.search_term = Some("review".to_string());
        assert_eq!(request.filters.paging, PageFilters::default());

        let raw = RawResponse::new(
            200,
            r#"{"meta": {"page": {"hasMore": true}}, "comments": [{"id": 1, "body": "hi"}]}"#,
        );
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        assert_eq!(next.filters.paging.page, 2);
        assert_eq!(
            next.parent,
            Some(CommentParent {
                resource: CommentResource::Task,
                id: 4
            })
        );
        assert_eq!(next.filters.search_term.as_deref(), Some("review"));
        assert_eq!(
            next.http_request(&server()).unwrap().url().path(),
            "/projects/api/v3/tasks/4/comments.json"
        );

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": false}}}"#);
        assert!(next.parse_response(raw).unwrap().iterate().is_none());
    }
}
