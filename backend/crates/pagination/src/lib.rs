//! Pagination primitives shared by Courtside HTTP endpoints.
//!
//! Two styles are supported:
//!
//! - numbered pages ([`PageRequest`] and [`Page`]) for listings where clients
//!   jump between pages and want a total count;
//! - opaque cursors ([`Cursor`] and [`CursorPage`]) for feeds such as
//!   notifications where rows are appended continuously.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PagePolicy, PageRequest};
//!
//! let request = PageRequest::new(Some(2), Some(2), PagePolicy::default())?;
//! let page = Page::from_slice(vec![1, 2, 3, 4, 5], request);
//! assert_eq!(page.items(), &[3, 4]);
//! assert_eq!(page.total_pages(), 3);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

mod cursor;
mod page;
mod request;

pub use cursor::{Cursor, CursorError, CursorPage};
pub use page::{Page, PageLinks};
pub use request::{PagePolicy, PageRequest, PaginationError};
