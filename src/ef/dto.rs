use serde::Deserialize;

use crate::ef::repo::MAX_PAGE_SIZE;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

impl Pagination {
    /// Requested limit capped at [`MAX_PAGE_SIZE`], whatever the caller asks.
    pub fn limit(&self) -> i64 {
        self.limit.clamp(0, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}
