use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use super::error::ApiError;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// The `page` query parameter, 1 when absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page(pub u32);

#[derive(Deserialize)]
struct PageParams {
    page: Option<u32>,
}

impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Rejected page parameter: {rejection}");
                ApiError::BadRequest
            })?;
        Ok(Page(params.page.unwrap_or(1)))
    }
}

/// Returns the items of the given 1-based page. Page 0 and pages past the end
/// are empty.
pub fn paginate<I: IntoIterator>(items: I, Page(page): Page) -> Vec<I::Item> {
    let Some(index) = page.checked_sub(1) else {
        return vec![];
    };
    let start = (index as usize).saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
