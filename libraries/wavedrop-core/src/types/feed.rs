//! Feed query types shared by the pager and the storage service.

use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Which uploads a feed shows.
///
/// Switching filter on a live pager is equivalent to a fresh load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedFilter {
    /// Every upload, newest first
    All,

    /// Uploads owned by one user, newest first
    Owner(UserId),
}

impl FeedFilter {
    /// The owner constraint, if this is an owner-scoped filter
    pub fn owner(&self) -> Option<&UserId> {
        match self {
            Self::All => None,
            Self::Owner(id) => Some(id),
        }
    }
}

/// One page of rows from a storage query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows in delivery order (`created_at` descending)
    pub rows: Vec<T>,

    /// Exact total row count for the query, when the backend reports one
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    /// A page with no count information
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            total_count: None,
        }
    }

    /// A page carrying the backend's exact total
    pub fn with_total(rows: Vec<T>, total: u64) -> Self {
        Self {
            rows,
            total_count: Some(total),
        }
    }
}
