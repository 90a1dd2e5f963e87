//! People (users) on the site.

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
use crate::values::Relationship;

/// A person with access to the site, or a contact record.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Zero when the server left it out.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: i64,

    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// "account", "collaborator" or "contact".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub company: Option<Relationship>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_client_user: bool,

    #[serde(default)]
    pub is_service_account: bool,

    #[serde(default)]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Kind of person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Account,
    Collaborator,
    Contact,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserType::Account => "account",
            UserType::Collaborator => "collaborator",
            UserType::Contact => "contact",
        })
    }
}

/// Writable person fields, shared by create and update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<UserType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_office: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_mobile: Option<String>,

    /// Skip the invitation email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_invite: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserPath {
    pub id: i64,
}

fn person_url(server: &Url, path: UserPath) -> Result<Url> {
    endpoint(server, &format!("/projects/api/v3/people/{}.json", path.id))
}

/// Response carrying a single person.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub person: User,
}

// -----------------------------------------------------------------------------
// Create
// -----------------------------------------------------------------------------

/// Create a person. `POST /projects/api/v3/people.json`.
#[derive(Debug, Clone, Default)]
pub struct UserCreateRequest {
    pub fields: UserFields,
}

impl UserCreateRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            fields: UserFields {
                first_name: Some(first_name.into()),
                last_name: Some(last_name.into()),
                email: Some(email.into()),
                ..Default::default()
            },
        }
    }
}

impl ApiRequest for UserCreateRequest {
    type Response = UserCreateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(server, "/projects/api/v3/people.json")?;
        json_request(Method::POST, url, &Envelope("person", &self.fields))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateResponse {
    #[serde(default)]
    pub person: User,
}

impl ApiResponse for UserCreateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::CREATED;

    fn decode(raw: &RawResponse) -> Result<Self> {
        let response: Self = decode_json(raw)?;
        require_id(response.person.id, "person")?;
        Ok(response)
    }
}

// -----------------------------------------------------------------------------
// Update / Delete / Get / Me
// -----------------------------------------------------------------------------

/// Update a person. `PATCH /projects/api/v3/people/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateRequest {
    pub path: UserPath,
    pub fields: UserFields,
}

impl UserUpdateRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: UserPath { id },
            ..Default::default()
        }
    }
}

impl ApiRequest for UserUpdateRequest {
    type Response = UserResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = person_url(server, self.path)?;
        json_request(Method::PATCH, url, &Envelope("person", &self.fields))
    }
}

impl ApiResponse for UserResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserDeleteRequest {
    pub path: UserPath,
}

impl UserDeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: UserPath { id },
        }
    }
}

impl ApiRequest for UserDeleteRequest {
    type Response = UserDeleteResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::DELETE, person_url(server, self.path)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserDeleteResponse;

impl ApiResponse for UserDeleteResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::NO_CONTENT;

    fn decode(_raw: &RawResponse) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserGetRequest {
    pub path: UserPath,
}

impl UserGetRequest {
    pub fn new(id: i64) -> Self {
        Self {
            path: UserPath { id },
        }
    }
}

impl ApiRequest for UserGetRequest {
    type Response = UserResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, person_url(server, self.path)?))
    }
}

/// The authenticated user. `GET /projects/api/v3/me.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMeRequest;

impl ApiRequest for UserMeRequest {
    type Response = UserResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, endpoint(server, "/projects/api/v3/me.json")?))
    }
}

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListFilters {
    pub search_term: Option<String>,
    pub kind: Option<UserType>,
    pub paging: PageFilters,
}

/// List people site-wide or on one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListRequest {
    pub project_id: Option<i64>,
    pub filters: UserListFilters,
}

impl UserListRequest {
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

impl ApiRequest for UserListRequest {
    type Response = UserListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = match self.project_id {
            Some(id) => format!("/projects/api/v3/projects/{id}/people.json"),
            None => "/projects/api/v3/people.json".to_string(),
        };
        let query = QueryParams::new()
            .opt("searchTerm", self.filters.search_term.as_deref())
            .opt("type", self.filters.kind)
            .paging(&self.filters.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = UserListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for UserListRequest {
    fn paging(&self) -> &PageFilters {
        &self.filters.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.filters.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListResponse {
    #[serde(skip)]
    request: UserListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub people: Vec<User>,
}

impl ApiResponse for UserListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for UserListResponse {
    type Request = UserListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}
