//! Tag model.

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
use crate::values::zero_as_none;

/// A label that can be attached to most other items.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Zero when the server left it out.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: i64,

    pub name: String,

    /// Hex color, e.g. `#d84640`.
    #[serde(default)]
    pub color: Option<String>,

    /// Owning project. Site-wide tags report zero, read as `None`.
    #[serde(default, with = "zero_as_none", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    /// Number of items carrying this tag.
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagPath {
    pub id: i64,
}

fn tag_url(server: &Url, path: TagPath) -> Result<Url> {
    endpoint(server, &format!("/projects/api/v3/tags/{}.json", path.id))
}

/// Create a tag. `POST /projects/api/v3/tags.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCreateRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl TagCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ApiRequest for TagCreateRequest {
    type Response = TagCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, "/projects/api/v3/tags.json")?;
        json_request(Method::POST, url, &Envelope("tag", self))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCreateResponse {
    #[serde(default)]
    pub tag: Tag,
}

impl ApiResponse for TagCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.tag.id, "tag")?;
        Ok(response)
    }
}

/// Update a tag. `PATCH /projects/api/v3/tags/{id}.json`.
///
/// `project_id` is tri-state; `Some(None)` moves the tag to site-wide.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdateRequest {
    #[serde(skip)]
    pub path: TagPath,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub project_id: Option<Option<i64>>,
}

impl TagUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TagPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for TagUpdateRequest {
    type Response = TagUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        json_request(Method::PATCH, tag_url(server, self.path)?, &Envelope("tag", self))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagUpdateResponse {
    pub tag: Tag,
}

impl ApiResponse for TagUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagDeleteRequest {
    pub path: TagPath,
}

impl TagDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TagPath { id },
        }
    }
}

impl ApiRequest for TagDeleteRequest {
    type Response = TagDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::DELETE, tag_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagDeleteResponse;

impl ApiResponse for TagDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::NO_CONTENT;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagGetRequest {
    pub path: TagPath,
}

impl TagGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TagPath { id },
        }
    }
}

impl ApiRequest for TagGetRequest {
    type Response = TagGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, tag_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagGetResponse {
    pub tag: Tag,
}

impl ApiResponse for TagGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagListFilters {
    pub search_term: Option<String>,
    /// Restrict to tags usable on one item type, e.g. "task" or "project".
    pub item_type: Option<String>,
    pub project_ids: Vec<i64>,
    pub paging: PageFilters,
}

/// List tags. `GET /projects/api/v3/tags.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagListRequest {
    pub filters: TagListFilters,
}

impl TagListRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiRequest for TagListRequest {
    type Response = TagListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .opt("itemType", self.filters.item_type.as_deref())
            .ids("projectIds", &self.filters.project_ids)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, "/projects/api/v3/tags.json", query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = TagListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for TagListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagListResponse {
    #[serde(skip)]
    request: TagListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ApiResponse for TagListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for TagListResponse {
    type Request = TagListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}
