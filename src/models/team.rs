//! Team model.

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
use crate::values::{LegacyNumber, LegacyNumericList, Relationship};

/// A named group of users, scoped to the site, a company or a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,

    pub name: String,

    /// Short handle used for @mentions.
    #[serde(default)]
    pub handle: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// "company", "project" or "subteam".
    #[serde(default)]
    pub team_type: Option<String>,

    #[serde(default)]
    pub parent_team: Option<Relationship>,

    #[serde(default)]
    pub company: Option<Relationship>,

    #[serde(default)]
    pub project: Option<Relationship>,

    #[serde(default)]
    pub members: Vec<Relationship>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Legacy write payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<LegacyNumericList>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamPath {
    pub id: i64,
}

fn legacy_team_url(server: &Url, path: TeamPath) -> Result<Url> {
    endpoint(server, &format!("/teams/{}.json", path.id))
}

/// Create a team. `POST /teams.json`.
#[derive(Debug, Clone, Default)]
pub struct TeamCreateRequest {
    pub fields: TeamFields,
}

impl TeamCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: TeamFields {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for TeamCreateRequest {
    type Response = TeamCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, "/teams.json")?;
        json_request(Method::POST, url, &Envelope("team", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamCreateResponse {
    #[serde(default)]
    pub id: LegacyNumber,
}

impl ApiResponse for TeamCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.id.get(), "team")?;
        Ok(response)
    }
}

/// Update a team. `PUT /teams/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct TeamUpdateRequest {
    pub path: TeamPath,
    pub fields: TeamFields,
}

impl TeamUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TeamPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for TeamUpdateRequest {
    type Response = TeamUpdateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = legacy_team_url(server, self.path)?;
        json_request(Method::PUT, url, &Envelope("team", &self.fields))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamUpdateResponse;

impl ApiResponse for TeamUpdateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamDeleteRequest {
    pub path: TeamPath,
}

impl TeamDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TeamPath { id },
        }
    }
}

impl ApiRequest for TeamDeleteRequest {
    type Response = TeamDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::DELETE, legacy_team_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamDeleteResponse;

impl ApiResponse for TeamDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamGetRequest {
    pub path: TeamPath,
}

impl TeamGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: TeamPath { id },
        }
    }
}

impl ApiRequest for TeamGetRequest {
    type Response = TeamGetResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, &format!("/projects/api/v3/teams/{}.json", self.path.id))?;
        Ok(bare_request(Method::GET, url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamGetResponse {
    pub team: Team,
}

impl ApiResponse for TeamGetResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamListFilters {
    pub search_term: Option<String>,
    pub paging: PageFilters,
}

/// List teams, optionally only those on one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamListRequest {
    pub project_id: Option<i64>,
    pub filters: TeamListFilters,
}

impl TeamListRequest {
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

impl ApiRequest for TeamListRequest {
    type Response = TeamListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match self.project_id {
            Some(id) => format!("/projects/api/v3/projects/{id}/teams.json"),
            None => "/projects/api/v3/teams.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = TeamListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for TeamListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamListResponse {
    #[serde(skip)]
    request: TeamListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub teams: Vec<Team>,
}

impl ApiResponse for TeamListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for TeamListResponse {
    type Request = TeamListRequest;

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
    fn test_create_joins_user_ids() {
        let mut request = TeamCreateRequest::new("Design");
        request.fields.handle = Some("design".to_string());
        request.fields.user_ids = Some(LegacyNumericList::new(vec![3, 4]));

        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/teams.json");
        let body: serde_json::Value =
            serde_json::from_slice(http.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"team": {"name": "Design", "handle": "design", "userIds": "3,4"}})
        );
    }

    #[test]
    fn test_create_response_missing_id() {
        for body in [r#"{"id": ""}"#, r#"{"id": "0"}"#, r#"{"id": null}"#, r#"{"STATUS": "OK"}"#] {
            let raw = RawResponse::new(201, body);
            let err = TeamCreateRequest::new("Design").parse_response(raw).unwrap_err();
            assert!(
                matches!(err, TeamworkError::MissingId { entity: "team" }),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_update_and_delete_are_legacy() {
        let http = TeamUpdateRequest::new(6).http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::PUT);
        assert_eq!(http.url().path(), "/teams/6.json");

        let delete = TeamDeleteRequest::new(6);
        assert_eq!(delete.http_request(&server()).unwrap().url().path(), "/teams/6.json");
        assert!(delete.parse_response(RawResponse::new(200, "")).is_ok());
    }

    #[test]
    fn test_get_decodes_members() {
        let raw = RawResponse::new(
            200,
            r#"{"team": {"id": 6, "name": "Design", "members": [{"id": 3, "type": "users"}]}}"#,
        );
        let team = TeamGetRequest::new(6).parse_response(raw).unwrap().team;
        assert_eq!(team.members.len(), 1);
    }

    #[test]
    fn test_list_for_project() {
        let http = TeamListRequest::for_project(2).http_request(&server()).unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/projects/2/teams.json");
    }

    #[test]
    fn test_list_iterate_keeps_project() {
        let mut request = TeamListRequest::for_project(2);
        request.filters.search_term = Some("des".to_string());
        assert_eq!(request.filters.paging, PageFilters::default());

        let raw = RawResponse::new(
            200,
            r#"{"meta": {"page": {"hasMore": true}}, "teams": [{"id": 6, "name": "Design"}]}"#,
        );
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        assert_eq!(next.filters.paging.page, 2);
        assert_eq!(next.project_id, Some(2));
        assert_eq!(next.filters.search_term.as_deref(), Some("des"));
        assert_eq!(
            next.http_request(&server()).unwrap().url().path(),
            "/projects/api/v3/projects/2/teams.json"
        );

        let raw = RawResponse::new(200, r#"{"meta": {"page": {"hasMore": false}}, "teams": []}"#);
        assert!(next.parse_response(raw).unwrap().iterate().is_none());
    }
}
