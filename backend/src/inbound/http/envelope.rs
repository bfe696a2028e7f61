//! Success envelope shared by every JSON endpoint.
//!
//! Successful responses are `{"success": true, "data": …}`; failures are
//! rendered by [`super::error`].

use actix_web::HttpResponse;
use pagination::{CursorPage, Page, PagePolicy, PageRequest, PaginationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;

/// `{"success": true, "data": …}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap `data`.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `200 OK` with `data` in the envelope.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(data))
}

/// `201 Created` with `data` in the envelope.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::new(data))
}

/// Payload for endpoints that only acknowledge.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageDto {
    /// Human-readable acknowledgement.
    pub message: String,
}

/// `200 OK` carrying a plain acknowledgement.
pub fn acknowledged(message: impl Into<String>) -> HttpResponse {
    ok(MessageDto {
        message: message.into(),
    })
}

/// Numbered page of items.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Items across all pages.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u32,
}

impl<T> PageDto<T> {
    /// Map a domain page item by item.
    pub fn map<S>(page: Page<S>, f: impl FnMut(S) -> T) -> Self {
        let (number, limit, total, total_pages) =
            (page.page(), page.limit(), page.total(), page.total_pages());
        Self {
            items: page.into_items().into_iter().map(f).collect(),
            page: number,
            limit,
            total,
            total_pages,
        }
    }
}

/// Cursor-addressed slice of a feed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursorPageDto<T> {
    /// Items in feed order.
    pub items: Vec<T>,
    /// Token for the next slice; absent at the end of the feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> CursorPageDto<T> {
    /// Map a domain cursor page item by item.
    pub fn map<S>(page: CursorPage<S>, f: impl FnMut(S) -> T) -> Self {
        Self {
            items: page.items.into_iter().map(f).collect(),
            next_cursor: page.next_cursor,
        }
    }
}

/// `page` and `limit` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Listing default: 20 per page, at most 50.
#[must_use]
pub fn list_policy() -> PagePolicy {
    PagePolicy::default()
}

impl PageQuery {
    /// Validate against `policy`.
    ///
    /// # Errors
    /// Returns `400 invalid_request` naming the offending parameter.
    pub fn to_request(self, policy: PagePolicy) -> Result<PageRequest, Error> {
        PageRequest::new(self.page, self.limit, policy).map_err(|err| {
            let field = match err {
                PaginationError::PageOutOfRange => "page",
                PaginationError::LimitOutOfRange { .. } => "limit",
            };
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": field, "code": "out_of_range" }))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[actix_web::test]
    async fn wraps_payloads_in_the_success_envelope() {
        let response = created(json!({ "id": 7 }));
        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body, json!({ "success": true, "data": { "id": 7 } }));
    }

    #[rstest]
    fn pages_keep_their_position() {
        let request = PageRequest::new(Some(2), Some(2), list_policy()).expect("request");
        let page = Page::new(vec![3_u32, 4], request, 5);
        let dto = PageDto::map(page, |n| n * 10);
        assert_eq!(dto.items, vec![30, 40]);
        assert_eq!((dto.page, dto.limit, dto.total, dto.total_pages), (2, 2, 5, 3));
    }

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "limit")]
    #[case(None, Some(51), "limit")]
    fn rejects_out_of_range_paging(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] field: &str,
    ) {
        let err = PageQuery { page, limit }
            .to_request(list_policy())
            .expect_err("out of range");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!(field)));
    }
}
