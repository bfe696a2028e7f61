//! Validated page requests.

use serde::{Deserialize, Serialize};

/// Errors raised while validating paging parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The limit is zero or above the endpoint maximum.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest limit accepted by the endpoint.
        max: u32,
    },
}

/// Defaults and bounds applied to page requests for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    default_limit: u32,
    max_limit: u32,
}

impl PagePolicy {
    /// Build a policy; `default_limit` is clamped into `1..=max_limit`.
    #[must_use]
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Limit used when the client does not send one.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Largest limit accepted.
    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

/// One-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate raw query parameters against `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageOutOfRange`] for page `0` and
    /// [`PaginationError::LimitOutOfRange`] when the limit is zero or above
    /// the policy maximum.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        policy: PagePolicy,
    ) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::PageOutOfRange);
        }
        let limit = limit.unwrap_or(policy.default_limit);
        if limit == 0 || limit > policy.max_limit {
            return Err(PaginationError::LimitOutOfRange {
                max: policy.max_limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// First page using the policy default limit.
    #[must_use]
    pub const fn first(policy: PagePolicy) -> Self {
        Self {
            page: 1,
            limit: policy.default_limit,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip, suitable for SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults_to_first_page_with_policy_limit() {
        let request =
            PageRequest::new(None, None, PagePolicy::new(12, 50)).expect("defaults are valid");
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 12);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(Some(0), None, PaginationError::PageOutOfRange)]
    #[case(None, Some(0), PaginationError::LimitOutOfRange { max: 50 })]
    #[case(None, Some(51), PaginationError::LimitOutOfRange { max: 50 })]
    fn rejects_out_of_range_values(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: PaginationError,
    ) {
        let err = PageRequest::new(page, limit, PagePolicy::default()).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn accepts_limit_at_maximum() {
        let request = PageRequest::new(Some(3), Some(50), PagePolicy::default()).expect("valid");
        assert_eq!(request.offset(), 100);
    }

    #[rstest]
    fn policy_clamps_default_into_bounds() {
        let policy = PagePolicy::new(80, 50);
        assert_eq!(policy.default_limit(), 50);
        assert_eq!(PagePolicy::new(0, 0).max_limit(), 1);
    }
}
