//! Stepwise walking of list endpoints.

use crate::engine::{execute, Engine};
use crate::error::Result;
use crate::pagination::PageFilters;
use crate::traits::{ApiRequest, ApiResponse};

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// A list request that carries a paging cursor.
pub trait PagedRequest: ApiRequest + Clone {
    /// Current paging cursor.
    fn paging(&self) -> &PageFilters;

    /// Mutable access to the paging cursor.
    fn paging_mut(&mut self) -> &mut PageFilters;
}

/// A list response that remembers the request that produced it.
///
/// # Example
///
/// ```no_run
/// use twapi::{execute, CompanyListRequest, Paginated, TeamworkClient};
///
/// # async fn example() -> twapi::Result<()> {
/// let client = TeamworkClient::from_env()?;
/// let mut request = Some(CompanyListRequest::new());
/// while let Some(next) = request {
///     let page = execute(&client, &next).await?;
///     for company in &page.companies {
///         println!("{}", company.name);
///     }
///     request = page.iterate();
/// }
/// # Ok(())
/// # }
/// ```
pub trait Paginated: ApiResponse {
    /// The list request type this response came from.
    type Request: PagedRequest<Response = Self>;

    /// The originating request.
    fn request(&self) -> &Self::Request;

    /// Whether the server reported a further page.
    fn has_more(&self) -> bool;

    /// The request for the next page, or `None` when this was the last one.
    ///
    /// Only the page number changes; every other filter is kept. Also `None`
    /// when the page number cannot grow any further.
    fn iterate(&self) -> Option<Self::Request> {
        if !self.has_more() {
            return None;
        }
        let mut next = self.request().clone();
        let paging = next.paging_mut();
        *paging = paging.next()?;
        Some(next)
    }
}

/// Walk every page starting from `request`, collecting what `extract` pulls
/// out of each page.
///
/// Stops when a page reports no further results, or after a fixed safety
/// limit of pages.
///
/// # Errors
///
/// Returns the first error from any page.
pub async fn collect_all<E, R, T, F>(engine: &E, request: R, mut extract: F) -> Result<Vec<T>>
where
    E: Engine + ?Sized,
    R: PagedRequest,
    R::Response: Paginated<Request = R>,
    F: FnMut(R::Response) -> Vec<T>,
{
    let mut items = Vec::new();
    let mut next = Some(request);
    let mut fetched = 0;

    while let Some(request) = next {
        let response = execute(engine, &request).await?;
        next = response.iterate();
        items.extend(extract(response));
        fetched += 1;

        if fetched >= MAX_PAGES && next.is_some() {
            tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
            break;
        }
    }

    Ok(items)
}
