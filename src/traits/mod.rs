//! The request/response contract shared by every resource.
//!
//! Each operation is a pair of types: an [`ApiRequest`] that builds the
//! outbound call and an [`ApiResponse`] that validates and decodes the
//! reply. List operations add [`PagedRequest`] and [`Paginated`].

mod paginated;
mod request;
mod response;

pub use paginated::{collect_all, PagedRequest, Paginated};
pub use request::ApiRequest;
pub use response::ApiResponse;

pub(crate) use request::{
    bare_request, endpoint, endpoint_with_query, json_request, Envelope, QueryParams,
};
pub(crate) use response::{decode_json, require_id};
