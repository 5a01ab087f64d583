//! Order-preserving merge of enrichment results.
//!
//! The summary query fixes the page order; the enrichment fetch returns the
//! same entities in arbitrary order. [`restore_order`] indexes the
//! enrichment result by id and walks the ordered page once, so a page of
//! `n` entries costs O(n).

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

/// Anything that carries a store identifier.
pub trait Identified {
    fn id(&self) -> DbId;
}

/// What to do when an id from the ordered page has no enriched entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Omit the slot. The page shrinks by the number of missing ids.
    #[default]
    Drop,
    /// Reject the whole page with [`CoreError::StalePage`].
    Fail,
}

impl FromStr for MissingPolicy {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "fail" => Ok(Self::Fail),
            other => Err(CoreError::Validation(format!(
                "Invalid stale page policy '{other}'. Must be 'drop' or 'fail'"
            ))),
        }
    }
}

/// Result of a merge: the ordered entities and the ids that had none.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub items: Vec<T>,
    pub missing: Vec<DbId>,
}

/// Re-emit `unordered` in the order given by `ordered`.
///
/// Entities in `unordered` whose id is not in `ordered` are discarded. Ids
/// in `ordered` with no entity are handled per `policy`; no placeholder is
/// ever emitted for them.
pub fn restore_order<O, T>(
    ordered: &[O],
    unordered: Vec<T>,
    policy: MissingPolicy,
) -> Result<Merged<T>, CoreError>
where
    O: Identified,
    T: Identified,
{
    let mut by_id: HashMap<DbId, T> = unordered.into_iter().map(|e| (e.id(), e)).collect();

    let mut items = Vec::with_capacity(ordered.len());
    let mut missing = Vec::new();
    for key in ordered {
        match by_id.remove(&key.id()) {
            Some(entity) => items.push(entity),
            None => missing.push(key.id()),
        }
    }

    if policy == MissingPolicy::Fail && !missing.is_empty() {
        return Err(CoreError::StalePage { missing });
    }
    Ok(Merged { items, missing })
}
