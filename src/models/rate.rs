//! Billing rates.
//!
//! Rates exist at two levels: a default per user for the whole site, and
//! per project (one project rate plus optional per-user overrides). Every
//! rate is a [`Money`] amount; `None` means no rate is set.

use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::engine::RawResponse;
use crate::error::Result;
use crate::pagination::{ListMeta, PageFilters};
use crate::traits::{
    bare_request, decode_json, endpoint, endpoint_with_query, json_request, ApiRequest,
    ApiResponse, PagedRequest, Paginated, QueryParams,
};
use crate::values::{Money, Relationship};

/// A user's rate at some level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRate {
    pub user: Relationship,

    #[serde(default)]
    pub rate: Option<Money>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRateBody<'a> {
    user_rate: &'a Option<Money>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRateBody<'a> {
    project_rate: &'a Option<Money>,
}

/// Response carrying one user rate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRateResponse {
    #[serde(default)]
    pub user_rate: Option<Money>,
}

impl ApiResponse for UserRateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

/// Response carrying a project's rate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRateResponse {
    #[serde(default)]
    pub project_rate: Option<Money>,
}

impl ApiResponse for ProjectRateResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

// -----------------------------------------------------------------------------
// Installation level
// -----------------------------------------------------------------------------

/// List every user's site-wide rate.
/// `GET /projects/api/v3/rates/installation/users.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallationUserRateListRequest {
    pub paging: PageFilters,
}

impl InstallationUserRateListRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiRequest for InstallationUserRateListRequest {
    type Response = InstallationUserRateListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let query = QueryParams::new().paging(&self.paging);
        let url = endpoint_with_query(
            server,
            "/projects/api/v3/rates/installation/users.json",
            query,
        )?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = InstallationUserRateListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for InstallationUserRateListRequest {
    fn paging(&self) -> &PageFilters {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationUserRateListResponse {
    #[serde(skip)]
    request: InstallationUserRateListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub user_rates: Vec<UserRate>,
}

impl ApiResponse for InstallationUserRateListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for InstallationUserRateListResponse {
    type Request = InstallationUserRateListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}

fn installation_user_url(server: &Url, user_id: i64) -> Result<Url> {
    endpoint(
        server,
        &format!("/projects/api/v3/rates/installation/users/{user_id}.json"),
    )
}

/// Fetch a user's site-wide rate.
#[derive(Debug, Clone, Default)]
pub struct InstallationUserRateGetRequest {
    pub user_id: i64,
}

impl InstallationUserRateGetRequest {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

impl ApiRequest for InstallationUserRateGetRequest {
    type Response = UserRateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, installation_user_url(server, self.user_id)?))
    }
}

/// Set or clear a user's site-wide rate.
#[derive(Debug, Clone, Default)]
pub struct InstallationUserRateUpdateRequest {
    pub user_id: i64,
    pub rate: Option<Money>,
}

impl InstallationUserRateUpdateRequest {
    pub fn new(user_id: i64, rate: Option<Money>) -> Self {
        Self { user_id, rate }
    }
}

impl ApiRequest for InstallationUserRateUpdateRequest {
    type Response = UserRateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = installation_user_url(server, self.user_id)?;
        json_request(Method::PUT, url, &UserRateBody { user_rate: &self.rate })
    }
}

// -----------------------------------------------------------------------------
// Project level
// -----------------------------------------------------------------------------

fn project_rate_url(server: &Url, project_id: i64) -> Result<Url> {
    endpoint(server, &format!("/projects/api/v3/rates/projects/{project_id}.json"))
}

/// Fetch a project's rate.
#[derive(Debug, Clone, Default)]
pub struct ProjectRateGetRequest {
    pub project_id: i64,
}

impl ProjectRateGetRequest {
    pub fn new(project_id: i64) -> Self {
        Self { project_id }
    }
}

impl ApiRequest for ProjectRateGetRequest {
    type Response = ProjectRateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        Ok(bare_request(Method::GET, project_rate_url(server, self.project_id)?))
    }
}

/// Set or clear a project's rate.
#[derive(Debug, Clone, Default)]
pub struct ProjectRateUpdateRequest {
    pub project_id: i64,
    pub rate: Option<Money>,
}

impl ProjectRateUpdateRequest {
    pub fn new(project_id: i64, rate: Option<Money>) -> Self {
        Self { project_id, rate }
    }
}

impl ApiRequest for ProjectRateUpdateRequest {
    type Response = ProjectRateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = project_rate_url(server, self.project_id)?;
        json_request(Method::PUT, url, &ProjectRateBody { project_rate: &self.rate })
    }
}

/// List per-user rate overrides on a project.
/// `GET /projects/api/v3/rates/projects/{projectId}/users.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUserRateListRequest {
    pub project_id: i64,
    pub paging: PageFilters,
}

impl ProjectUserRateListRequest {
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            ..Default::default()
        }
    }
}

impl ApiRequest for ProjectUserRateListRequest {
    type Response = ProjectUserRateListResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let path = format!("/projects/api/v3/rates/projects/{}/users.json", self.project_id);
        let query = QueryParams::new().paging(&self.paging);
        let url = endpoint_with_query(server, &path, query)?;
        Ok(bare_request(Method::GET, url))
    }

    fn parse_response(&self, raw: RawResponse) -> Result<Self::Response> {
        let mut response = ProjectUserRateListResponse::from_http(raw)?;
        response.request = self.clone();
        Ok(response)
    }
}

impl PagedRequest for ProjectUserRateListRequest {
    fn paging(&self) -> &PageFilters {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut PageFilters {
        &mut self.paging
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUserRateListResponse {
    #[serde(skip)]
    request: ProjectUserRateListRequest,

    #[serde(default)]
    pub meta: ListMeta,

    #[serde(default)]
    pub user_rates: Vec<UserRate>,
}

impl ApiResponse for ProjectUserRateListResponse {
    const EXPECTED_STATUS: StatusCode = StatusCode::OK;

    fn decode(raw: &RawResponse) -> Result<Self> {
        decode_json(raw)
    }
}

impl Paginated for ProjectUserRateListResponse {
    type Request = ProjectUserRateListRequest;

    fn request(&self) -> &Self::Request {
        &self.request
    }

    fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}

/// Set or clear one user's rate on a project.
/// `PUT /projects/api/v3/rates/projects/{projectId}/users/{userId}.json`.
#[derive(Debug, Clone, Default)]
pub struct ProjectUserRateUpdateRequest {
    pub project_id: i64,
    pub user_id: i64,
    pub rate: Option<Money>,
}

impl ProjectUserRateUpdateRequest {
    pub fn new(project_id: i64, user_id: i64, rate: Option<Money>) -> Self {
        Self {
            project_id,
            user_id,
            rate,
        }
    }
}

impl ApiRequest for ProjectUserRateUpdateRequest {
    type Response = UserRateResponse;

    fn http_request(&self, server: &Url) -> Result<Request> {
        let url = endpoint(
            server,
            &format!(
                "/projects/api/v3/rates/projects/{}/users/{}.json",
                self.project_id, self.user_id
            ),
        )?;
        json_request(Method::PUT, url, &UserRateBody { user_rate: &self.rate })
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
    fn test_update_sends_cents() {
        let request = InstallationUserRateUpdateRequest::new(5, Some(Money::from_major(12.5)));
        let http = request.http_request(&server()).unwrap();
        assert_eq!(http.method(), Method::PUT);
        assert_eq!(http.url().path(), "/projects/api/v3/rates/installation/users/5.json");
        assert_eq!(body_json(&http), serde_json::json!({"userRate": 1250}));
    }

    #[test]
    fn test_update_can_clear_rate() {
        let http = ProjectRateUpdateRequest::new(2, None)
            .http_request(&server())
            .unwrap();
        assert_eq!(body_json(&http), serde_json::json!({"projectRate": null}));
    }

    #[test]
    fn test_project_user_rate_path() {
        let http = ProjectUserRateUpdateRequest::new(2, 5, Some(Money::from_cents(900)))
            .http_request(&server())
            .unwrap();
        assert_eq!(http.url().path(), "/projects/api/v3/rates/projects/2/users/5.json");
    }

    #[test]
    fn test_rate_decodes_from_each_shape() {
        let request = InstallationUserRateGetRequest::new(5);

        let bare = request
            .parse_response(RawResponse::new(200, r#"{"userRate": 1250}"#))
            .unwrap();
        assert_eq!(bare.user_rate, Some(Money::from_cents(1250)));

        let legacy = request
            .parse_response(RawResponse::new(200, r#"{"userRate": "12.50"}"#))
            .unwrap();
        assert_eq!(legacy.user_rate, Some(Money::from_cents(1250)));

        let detailed = request
            .parse_response(RawResponse::new(
                200,
                r#"{"userRate": {"amount": 1250, "currency": {"code": "EUR", "symbol": "€"}}}"#,
            ))
            .unwrap();
        let money = detailed.user_rate.unwrap();
        assert_eq!(money.cents, 1250);
        assert_eq!(money.currency.map(|c| c.code), Some("EUR".to_string()));

        let unset = request
            .parse_response(RawResponse::new(200, r#"{"userRate": null}"#))
            .unwrap();
        assert_eq!(unset.user_rate, None);
    }

    #[test]
    fn test_project_user_rates_list() {
        let request = ProjectUserRateListRequest::new(2);
        let raw = RawResponse::new(
            200,
            r#"{
                "meta": {"page": {"hasMore": true}},
                "userRates": [
                    {"user": {"id": 5, "type": "users"}, "rate": 9000},
                    {"user": {"id": 6, "type": "users"}, "rate": null}
                ]
            }"#,
        );
        let response = request.parse_response(raw).unwrap();
        assert_eq!(response.user_rates.len(), 2);
        assert_eq!(response.user_rates[1].rate, None);

        let next = response.iterate().unwrap();
        assert_eq!(next.project_id, 2);
        assert_eq!(next.paging.page, 2);
    }
}
