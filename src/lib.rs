//! Teamwork API client library.
//!
//! A Rust client for the Teamwork project-management REST API. Every
//! operation of every resource is a pair of types: a request that knows how
//! to build its HTTP call, and a response that knows how to validate and
//! decode the reply. A small [`Engine`] trait sends the built requests.
//!
//! # Quick Start
//!
//! ```no_run
//! use twapi::{execute, collect_all, CompanyCreateRequest, TaskListRequest, TeamworkClient};
//!
//! #[tokio::main]
//! async fn main() -> twapi::Result<()> {
//!     // Create client from environment variables
//!     let client = TeamworkClient::from_env()?;
//!
//!     // Create a company
//!     let created = execute(&client, &CompanyCreateRequest::new("Acme")).await?;
//!     println!("Company: {}", created.company.id);
//!
//!     // Walk every task on a tasklist
//!     let request = TaskListRequest::for_tasklist(42);
//!     let tasks = collect_all(&client, request, |page| page.tasks).await?;
//!     println!("Found {} tasks", tasks.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around a few core traits:
//!
//! - [`ApiRequest`] - Builds one outbound HTTP request
//! - [`ApiResponse`] - Checks the status code and decodes the body
//! - [`Paginated`] - Produces the request for the next page of a list
//! - [`Engine`] - Sends built requests; [`TeamworkClient`] is the default
//!
//! Resources span two API generations. Current endpoints live under
//! `/projects/api/v3` and use camelCase envelopes; legacy endpoints
//! (`/projects.json`, `/tasklists/{id}.json`, ...) use kebab-case fields,
//! string identifiers and compact date formats. The types in [`values`]
//! absorb those differences.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `TEAMWORK_SERVER` (required) - Site address, e.g. `https://example.teamwork.com`
//! - `TEAMWORK_API_TOKEN` - Bearer token, or
//! - `TEAMWORK_USERNAME` and `TEAMWORK_PASSWORD` - Basic auth credentials

pub mod cli;
pub mod values;

mod client;
mod engine;
mod error;
mod models;
mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::TeamworkClient;
pub use engine::{execute, execute_with_cancel, Engine, RawResponse};
pub use error::{Result, TeamworkError};
pub use pagination::{
    has_more_from_headers, ListMeta, PageFilters, PageMeta, DEFAULT_PAGE_SIZE, FIRST_PAGE,
    PAGES_HEADER, PAGE_HEADER,
};

// Re-export traits
pub use traits::{collect_all, ApiRequest, ApiResponse, PagedRequest, Paginated};

// Re-export models
pub use models::*;

pub use output::PrettyPrint;
