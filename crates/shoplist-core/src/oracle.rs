//! Vector-search oracle capability.
//!
//! The oracle maps a free-text product query to ranked supermarket product
//! records. It is an external service: the core only defines the interface,
//! the application provides the client and decides timeouts and retries.
//! Oracle calls happen before the core runs and are never interleaved with
//! parsing or merging.

use async_trait::async_trait;

use crate::error::{OracleErrorKind, ShoppingError};
use crate::models::ProductCandidate;

/// Product search over supermarket catalogs.
///
/// Implementations return candidates with a `distance` where available
/// (lower = closer). Zero results is a valid answer, not an error.
#[async_trait]
pub trait SearchOracle: Send + Sync {
    /// Short identifier used in logs (e.g. `"http"`, `"disabled"`).
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<ProductCandidate>, ShoppingError>;
}

/// Oracle used when no search backend is configured. Every call fails with
/// [`OracleErrorKind::Unavailable`].
pub struct DisabledSearchOracle;

#[async_trait]
impl SearchOracle for DisabledSearchOracle {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn search(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<ProductCandidate>, ShoppingError> {
        Err(ShoppingError::oracle(
            OracleErrorKind::Unavailable,
            "product search is disabled; set [search] provider in config",
        ))
    }
}
