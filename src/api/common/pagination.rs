//
//  redmine-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Redmine List Responses
//!
//! Redmine uses offset-based pagination. Every list envelope carries the
//! resource array next to three counters:
//!
//! ```json
//! {"issues": [...], "total_count": 42, "limit": 25, "offset": 25}
//! ```
//!
//! The library reports the counters as-is and never fetches further pages on
//! its own. Callers request the next page by passing a new `offset` through
//! [`Params`](super::Params).
//!
//! # Example
//!
//! ```rust
//! use redmine_cli::api::common::Pagination;
//!
//! let page = Pagination { total_count: 42, limit: 25, offset: 25 };
//! assert!(!page.has_next());
//! assert_eq!(page.next_offset(), None);
//! ```

use serde::Deserialize;

use super::codec::nullable;

/// Counters of a paginated list response.
///
/// Lists that are not paginated server-side (trackers, statuses, roles)
/// decode to all zeros.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `total_count` | Number of items matching the query across all pages |
/// | `limit` | Page size the server applied |
/// | `offset` | Index of the first item of this page |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "nullable")]
    pub total_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub limit: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub offset: u32,
}

impl Pagination {
    /// Checks whether more items exist after this page.
    pub fn has_next(&self) -> bool {
        self.limit > 0 && self.offset.saturating_add(self.limit) < self.total_count
    }

    /// Returns the offset of the next page, if any.
    pub fn next_offset(&self) -> Option<u32> {
        self.has_next().then(|| self.offset + self.limit)
    }
}
