//! Project membership.
//!
//! Only the legacy API manages membership. Its list endpoint signals
//! further pages through the `X-Page` and `X-Pages` headers instead of a
//! `meta` block.

use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use url::Url;

use crate::engine::RawResponse;
use crate::error::Result;
use crate::pagination::{has_more_from_headers, PageFilters};
use crate::traits::{
    bare_request, decode_json, endpoint, endpoint_with_query, json_request, ApiRequest,
    ApiResponse, PagedRequest, Paginated, QueryParams,
};
use crate::values::{zero_as_none, LegacyNumber, LegacyNumericList};

/// A person as the legacy API describes them.
///
/// Identifiers arrive as strings and unset text fields as `""`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyPerson {
    pub id: LegacyNumber,

    #[serde(rename = "first-name", default)]
    pub first_name: String,

    #[serde(rename = "last-name", default)]
    pub last_name: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "email-address", default)]
    pub email: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub title: Option<String>,

    /// "0" means the person has no company.
    #[serde(
        rename = "company-id",
        default,
        with = "zero_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<i64>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "company-name", default)]
    pub company_name: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "phone-number-office", default)]
    pub phone_office: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "phone-number-mobile", default)]
    pub phone_mobile: Option<String>,

    #[serde(default)]
    pub administrator: bool,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "user-type", default)]
    pub user_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserIdList<'a> {
    user_id_list: &'a LegacyNumericList,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum MembershipChange<'a> {
    Add(UserIdList<'a>),
    Remove(UserIdList<'a>),
}

fn members_url(server: &Url, project_id: i64) -> Result<Url> {
    endpoint(server, &format!("/projects/{project_id}/people.json"))
}

/// Add users to a project. `PUT /projects/{projectId}/people.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectMemberAddRequest {
    pub project_id: i64,
    pub user_ids: LegacyNumericList,
}

impl ProjectMemberAddRequest {
    pub fn new(project_id: i64, user_ids: impl Into<Vec<i64>>) -> Self {
        Self {
            project_id,
            user_ids: LegacyNumericList::new(user_ids),
        }
    }
}

impl ApiRequest for ProjectMemberAddRequest {
    type Response = ProjectMemberChangeResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let body = MembershipChange::Add(UserIdList {
            user_id_list: &self.user_ids,
        });
        json_request(Method::PUT, members_url(server, self.project_id)?, &body)
    }
}

/// Remove users from a project. Same endpoint as adding.
#[derive(Debug, Clone, Default)]
pub struct ProjectMemberRemoveRequest {
    pub project_id: i64,
    pub user_ids: LegacyNumericList,
}

impl ProjectMemberRemoveRequest {
    pub fn new(project_id: i64, user_ids: impl Into<Vec<i64>>) -> Self {
        Self {
            project_id,
            user_ids: LegacyNumericList::new(user_ids),
        }
    }
}

impl ApiRequest for ProjectMemberRemoveRequest {
    type Response = ProjectMemberChangeResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let body = MembershipChange::Remove(UserIdList {
            user_id_list: &self.user_ids,
        });
        json_request(Method::PUT, members_url(server, self.project_id)?, &body)
    }
}

/// Result of adding or removing members.
#[derive(Debug, Clone, Default)]
pub struct ProjectMemberChangeResponse;

impl ApiResponse for ProjectMemberChangeResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

/// List a project's members. `GET /projects/{projectId}/people.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMemberListRequest {
    pub project_id: i64,
    pub paging: PageFilters,
}

impl ProjectMemberListRequest {
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            ..Default::default()
        }
    }
}

impl ApiRequest for ProjectMemberListRequest {
    type Response = ProjectMemberListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = format!("/projects/{}/people.json", self.project_id);
        let query = QueryParams::new().paging(&self.paging);
        Ok(bare_request(Method::GET, endpoint_with_query(server, &path, query)?))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let has_more = has_more_from_headers(&raw.headers);
        let mut response = ProjectMemberListResponse::from_http(raw)?;
        response.request = self.clone();
        response.has_more = has_more;
        Ok(response)
    }
}

impl PagedRequest for ProjectMemberListRequest {
    fn paging(&self) -> &PageFilters {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectMemberListResponse {
    #[serde(skip)]
    request: ProjectMemberListRequest,

    #[serde(skip)]
    has_more: bool,

    #[serde(default)]
    pub people: Vec<LegacyPerson>,
}

impl ApiResponse for ProjectMemberListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for ProjectMemberListResponse {
    type Request = ProjectMemberListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.has_more
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Url {
        Url::parse("https://x.test").unwrap()
    }

    fn body_json(request: &Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_add_and_remove_bodies() {
        let add = ProjectMemberAddRequest::new(2, vec![1, 2])
            .http_request(&server())
            .unwrap();
        assert_eq!(add.method(), Method::PUT);
        assert_eq!(add.url().path(), "/projects/2/people.json");
        assert_eq!(body_json(&add), serde_json::json!({"add": {"userIdList": "1,2"}}));

        let remove = ProjectMemberRemoveRequest::new(2, vec![3])
            .http_request(&server())
            .unwrap();
        assert_eq!(body_json(&remove), serde_json::json!({"remove": {"userIdList": "3"}}));
    }

    #[test]
    fn test_legacy_person_decoding() {
        let raw = RawResponse::new(
            200,
            r#"{"people": [{
                "id": "12",
                "first-name": "Ada",
                "last-name": "Lovelace",
                "email-address": "ada@example.com",
                "company-id": "0",
                "phone-number-office": "",
                "administrator": true
            }]}"#,
        )
        .with_header("X-Page", "1")
        .with_header("X-Pages", "1");
        let response = ProjectMemberListRequest::new(2).parse_response(raw).unwrap();
        let person = &response.people[0];
        assert_eq!(person.id.get(), 12);
        assert_eq!(person.company_id, None);
        assert_eq!(person.phone_office, None);
        assert_eq!(person.email.as_deref(), Some("ada@example.com"));
        assert!(response.iterate().is_none());
    }

    #[test]
    fn test_headers_drive_iteration() {
        let request = ProjectMemberListRequest::new(2);
        let raw = RawResponse::new(200, r#"{"people": []}"#)
            .with_header("X-Page", "1")
            .with_header("X-Pages", "3");
        let next = request.parse_response(raw).unwrap().iterate().unwrap();
        assert_eq!(next.paging.page, 2);
        assert_eq!(next.project_id, 2);
    }

    #[test]
    fn test_missing_headers_end_iteration() {
        let raw = RawResponse::new(200, r#"{"people": []}"#);
        let response = ProjectMemberListRequest::new(2).parse_response(raw).unwrap();
        assert!(response.iterate().is_none());
    }
}
