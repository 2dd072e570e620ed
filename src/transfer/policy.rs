use crate::error::{Error, Result};
use crate::kerberos::ccache::{CacheType, Principal};

/// Where the copied credentials are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRoute {
    /// Straight into the target cache.
    Direct,
    /// Into a new uniquely named cache inside the target's collection.
    NewInCollection,
}

/// Picks the write route for a target cache that may already hold a
/// principal. A single-slot cache with a principal is never written unless
/// `force` is set.
pub fn choose_route(
    target_name: &str,
    target_type: &CacheType,
    existing: Option<&Principal>,
    force: bool,
) -> Result<WriteRoute> {
    let Some(principal) = existing else {
        return Ok(WriteRoute::Direct);
    };

    if force {
        log::warn!(
            "Overwriting principal {} in {} (--force)",
            principal,
            target_name
        );
        return Ok(WriteRoute::Direct);
    }

    if target_type.is_single_slot() {
        return Err(Error::WouldOverwrite {
            cache: target_name.to_string(),
            cache_type: target_type.to_string(),
            principal: principal.to_string(),
        });
    }

    Ok(WriteRoute::NewInCollection)
}
