//! Per-target in-flight guard
//!
//! At most one mutation runs per order (or per credit memo scope) at a
//! time. Mutations on different targets run freely. A permit releases its
//! key when dropped, including when the caller stops awaiting.

use crate::{ClientError, ClientResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InFlightKey {
    /// Mutations of one order, by storage id
    Order(String),
    /// Credit memo create/update for one order, by storage id
    CreditMemo(String),
}

impl fmt::Display for InFlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order(id) => write!(f, "order {}", id),
            Self::CreditMemo(id) => write!(f, "credit memos of order {}", id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    active: Arc<DashMap<InFlightKey, &'static str>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key` for `action`, or fail with [`ClientError::Busy`]
    pub fn acquire(&self, key: InFlightKey, action: &'static str) -> ClientResult<InFlightPermit> {
        match self.active.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::warn!(
                    target_key = %key,
                    running = *entry.get(),
                    attempted = action,
                    "Refusing duplicate in-flight mutation"
                );
                Err(ClientError::Busy(key.to_string()))
            }
            Entry::Vacant(entry) => {
                entry.insert(action);
                Ok(InFlightPermit {
                    active: Arc::clone(&self.active),
                    key,
                })
            }
        }
    }

    pub fn is_busy(&self, key: &InFlightKey) -> bool {
        self.active.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Held for the duration of one mutation
#[derive(Debug)]
pub struct InFlightPermit {
    active: Arc<DashMap<InFlightKey, &'static str>>,
    key: InFlightKey,
}

impl InFlightPermit {
    pub fn key(&self) -> &InFlightKey {
        &self.key
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
