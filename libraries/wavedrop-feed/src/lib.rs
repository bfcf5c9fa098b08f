//! Wavedrop - Feed Pagination
//!
//! The paginated upload feed: fixed-size pages appended to an owned,
//! deduplicated, append-only list with an in-flight guard and
//! generation-validated completions.
//!
//! # Example
//!
//! ```ignore
//! use wavedrop_core::FeedFilter;
//! use wavedrop_feed::FeedPager;
//!
//! let pager = FeedPager::new(storage, auth, notifier);
//! pager.load(FeedFilter::All).await?;
//! while !pager.is_exhausted() {
//!     pager.load_more().await?;
//! }
//! ```

mod pager;

pub use pager::{FeedPager, PAGE_SIZE};
