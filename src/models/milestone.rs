//! Milestone model.

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

/// A dated checkpoint in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub deadline: Option<Date>,

    #[serde(default)]
    pub completed: Option<bool>,

    #[serde(default)]
    pub project: Option<Relationship>,

    #[serde(default)]
    pub responsible_parties: Vec<Relationship>,

    #[serde(default)]
    pub tasklists: Vec<Relationship>,

    #[serde(default)]
    pub tags: Vec<Relationship>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Legacy write payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MilestoneFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<LegacyDate>,

    #[serde(rename = "responsible-party-ids", skip_serializing_if = "Option::is_none")]
    pub responsible_party_ids: Option<LegacyNumericList>,

    #[serde(rename = "tasklistIds", skip_serializing_if = "Option::is_none")]
    pub tasklist_ids: Option<LegacyNumericList>,

    #[serde(rename = "tagIds", skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<LegacyNumericList>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestonePath {
    pub id: i64,
}

/// Create a milestone. `POST /projects/{projectId}/milestones.json`.
#[derive(Debug, Clone, Default)]
pub struct MilestoneCreateRequest {
    pub project_id: i64,
    pub fields: MilestoneFields,
}

impl MilestoneCreateRequest {
    pub fn new(project_id: i64, title: impl Into<String>, deadline: LegacyDate) -> Self {
        Self {
            project_id,
            fields: MilestoneFields {
                title: Some(title.into()),
                deadline: Some(deadline),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for MilestoneCreateRequest {
    type Response = MilestoneCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/projects/{}/milestones.json", self.project_id))?;
        json_request(Method::POST, url, &Envelope("milestone", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneCreateResponse {
    #[serde(default, rename = "milestoneId")]
    pub id: LegacyNumber,
}

impl ApiResponse for MilestoneCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.id.get(), "milestone")?;
        Ok(response)
    }
}

/// Update a milestone. `PUT /milestones/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct MilestoneUpdateRequest {
    pub path: MilestonePath,
    pub fields: MilestoneFields,
}

impl MilestoneUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: MilestonePath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for MilestoneUpdateRequest {
    type Response = MilestoneUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/milestones/{}.json", self.path.id))?;
        json_request(Method::PUT, url, &Envelope("milestone", &self.fields))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MilestoneUpdateResponse;

impl ApiResponse for MilestoneUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MilestoneDeleteRequest {
    pub path: MilestonePath,
}

impl MilestoneDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: MilestonePath { id },
        }
    }
}

impl ApiRequest for MilestoneDeleteRequest {
    type Response = MilestoneDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/milestones/{}.json", self.path.id))?;
        Ok(bare_request(Method::DELETE, url))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MilestoneDeleteResponse;

impl ApiResponse for MilestoneDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MilestoneGetRequest {
    pub path: MilestonePath,
}

impl MilestoneGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: MilestonePath { id },
        }
    }
}

impl ApiRequest for MilestoneGetRequest {
    type Response = MilestoneGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!("/projects/api/v3/milestones/{}.json", self.path.id),
        )?;
        Ok(bare_request(Method::GET, url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneGetResponse {
    pub milestone: Milestone,
}

impl ApiResponse for MilestoneGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneListFilters {
    pub search_term: Option<String>,
    pub tag_ids: Vec<i64>,
    pub match_all_tags: Option<bool>,
    pub paging: PageFilters,
}

/// List milestones, optionally within one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneListRequest {
    pub project_id: Option<i64>,
    pub filters: MilestoneListFilters,
}

impl MilestoneListRequest {
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

impl ApiRequest for MilestoneListRequest {
    type Response = MilestoneListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match self.project_id {
            Some(id) => format!("/projects/api/v3/projects/{id}/milestones.json"),
            None => "/projects/api/v3/milestones.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .ids("tagIds", &self.filters.tag_ids)
            .opt("matchAllTags", self.filters.match_all_tags)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = MilestoneListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for MilestoneListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MilestoneListResponse {
    #[serde(skip)]
    request: MilestoneListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl ApiResponse for MilestoneListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for MilestoneListResponse {
    type Request = MilestoneListRequest;

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
    fn test_create_encodes_legacy_scalars() {
        let deadline = LegacyDate::from_ymd(2024, 6, 1).unwrap();
        let mut request = MilestoneCreateRequest::new(2, "Launch", deadline);
        request.fields.responsible_party_ids = Some(LegacyNumericList::new(vec![5, 6]));

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/2/milestones.json");
        let body: serde_json::Value =
            serde_json::from_slice(http.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"milestone": {
                "title": "Launch",
                "deadline": "20240601",
                "responsible-party-ids": "5,6"
            }})
        );
    }

    #[test]
    fn test_create_response() {
        let raw = RawResponse::new(201, r#"{"milestoneId": "31"}"#);
        let deadline = LegacyDate::from_ymd(2024, 6, 1).unwrap();
        let response = MilestoneCreateRequest::new(2, "Launch", deadline)
            .parse_response(raw)
            .unwrap();
        assert_eq!(response.id.get(), 31);
    }

    #[test]
    fn test_create_response_with_zero_id() {
        let deadline = LegacyDate::from_ymd(2024, 6, 1).unwrap();
        let request = MilestoneCreateRequest::new(2, "Launch", deadline);

        for body in [r#"{"milestoneId": "0"}"#, r#"{"milestoneId": 0}"#, r#"{}"#] {
            let err = request
                .parse_response(RawResponse::new(201, body))
                .unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "milestone" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_get_reads_current_deadline() {
        let raw = RawResponse::new(
            200,
            r#"{"milestone": {"id": 31, "name": "Launch", "deadline": "2024-06-01"}}"#,
        );
        let milestone = MilestoneGetRequest::new(31).parse_response(raw).unwrap().milestone;
        assert_eq!(milestone.deadline, Date::from_ymd(2024, 6, 1));
    }

    #[test]
    fn test_list_for_project() {
        let http = MilestoneListRequest::for_project(2).http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/projects/2/milestones.json");
    }

    #[test]
    fn test_list_iterate_keeps_project_and_tags() {
        let mut request = MilestoneListRequest::for_project(2);
        request.filters.tag_ids = vec![4];
        request.filters.match_all_tags = Some(true);
        assert_eq!(request.filters.paging.page, 1);
        assert_eq!(request.filters.paging.page_size, 50);

        let raw = RawResponse::new(
            200,
            r#"{
                "meta": {"page": {"hasMore": true}},
                "milestones": [{"id": 31, "name": "Launch"}]
            }"#,
        );
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        assert_eq!(next.filters.paging.page, 2);
        assert_eq!(next.project_id, Some(2));
        assert_eq!(next.filters.tag_ids, vec![4]);
        assert_eq!(next.filters.match_all_tags, Some(true));

        let http = next.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/projects/2/milestones.json");
        assert_eq!(
            http.url().query(),
            Some("tagIds=4&matchAllTags=true&page=2&pageSize=50")
        );

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": false}}}"#);
        assert!(next.parse_response(raw).unwrap().iterate().is_none());
    }
}
