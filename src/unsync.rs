//! Provides a *not* thread-safe cache implementation built upon
//! [`std::collections::HashMap`][std-hashmap].
//!
//! [std-hashmap]: https://doc.rust-lang.org/std/collections/struct.HashMap.html

mod builder;
mod cache;
mod iter;

use std::rc::Rc;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use iter::Iter;

use crate::common::deque::NodeHandle;

/// A listener invoked once per eviction with the evicted key and value.
///
/// It runs synchronously, inline with the operation that triggered the
/// eviction, after the entry has been removed from both the lookup index and
/// the recency order. Evictions are observed in order, one call per evicted
/// entry. Explicit invalidation and removal do not notify the listener.
pub type EvictionListener<K, V> = Box<dyn FnMut(Rc<K>, V)>;

pub(crate) struct ValueEntry<V> {
    pub(crate) value: V,
    recency_node: Option<NodeHandle>,
}

impl<V> ValueEntry<V> {
    pub(crate) fn new(value: V) -> Self {
        Self {
            value,
            recency_node: None,
        }
    }

    /// Transplants the recency-order node from the entry this one replaced.
    #[inline]
    pub(crate) fn replace_recency_node_with(&mut self, mut other: Self) {
        self.recency_node = other.recency_node.take();
    }

    #[inline]
    pub(crate) fn recency_node(&self) -> Option<NodeHandle> {
        self.recency_node
    }

    #[inline]
    pub(crate) fn set_recency_node(&mut self, node: Option<NodeHandle>) {
        self.recency_node = node;
    }

    #[inline]
    pub(crate) fn take_recency_node(&mut self) -> Option<NodeHandle> {
        self.recency_node.take()
    }
}
