use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Raw `?limit=&offset=` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A resolved window into a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Clamp the requested window to the configured bounds.
    /// Non-positive limits fall back to the default, negative offsets to zero.
    pub fn resolve(query: &PageQuery, config: &PaginationConfig) -> Self {
        let limit = match query.limit {
            Some(l) if l > 0 => l.min(config.max_limit),
            _ => config.default_limit,
        };
        let offset = query.offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }

    pub fn meta(&self, total_count: i64) -> MetaData {
        let pages = if total_count == 0 {
            0
        } else {
            total_count.saturating_add(self.limit - 1) / self.limit
        };
        MetaData {
            total_count,
            pages,
            current_page: (self.offset / self.limit).saturating_add(1),
            page_size: self.limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub total_count: i64,
    pub pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}
