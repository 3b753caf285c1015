use std::{collections::BTreeMap, time::Duration};

use serde_json::Value;

/// Cache capability supplied by the host application.
///
/// Both methods are optional: the defaults report a permanent miss and
/// discard writes, so a host may implement only the half it needs. The
/// client calls them synchronously from its completion path, so a slow
/// implementation delays the result.
///
/// Expiry belongs to the implementation. An entry older than the `max_age`
/// it was stored with must be reported as absent.
pub trait SearchCache: Send + Sync {
    /// Returns the array stored under `key` if it is still fresh.
    fn cached_array_for_key(&self, _key: &str) -> Option<Vec<Value>> {
        None
    }

    /// Stores a freshly fetched array.
    ///
    /// `params` are the caller-facing parameters of the request that
    /// produced the array.
    fn cache_array(
        &self,
        _array: &[Value],
        _key: &str,
        _params: &BTreeMap<String, String>,
        _max_age: Duration,
    ) {
    }
}
