use super::{Cache, EvictionListener};

use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    rc::Rc,
};

/// Builds a [`Cache`][cache-struct] with various configuration knobs.
///
/// [cache-struct]: ./struct.Cache.html
///
/// # Examples
///
/// ```rust
/// use micro_lru::unsync::Cache;
///
/// let mut cache = Cache::builder()
///     // Budget of 1,000 weight units.
///     .max_capacity(1_000)
///     // Observe evicted entries.
///     .eviction_listener(|key, value: String| {
///         println!("evicted {} -> {}", key, value);
///     })
///     // Create the cache.
///     .build();
///
/// cache.insert("zero", "0".to_string());
/// cache.get(&"zero");
/// ```
///
#[must_use]
pub struct CacheBuilder<K, V, C> {
    max_capacity: Option<u64>,
    initial_capacity: Option<usize>,
    eviction_listener: Option<EvictionListener<K, V>>,
    cache_type: PhantomData<C>,
}

impl<K, V> Default for CacheBuilder<K, V, Cache<K, V, RandomState>>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            eviction_listener: None,
            cache_type: Default::default(),
        }
    }
}

impl<K, V> CacheBuilder<K, V, Cache<K, V, RandomState>>
where
    K: Eq + Hash,
{
    /// Construct a new `CacheBuilder` that will be used to build a `Cache`
    /// with a weighted-size budget of `max_capacity`.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            max_capacity: Some(max_capacity),
            ..Default::default()
        }
    }

    /// Builds a `Cache<K, V>`.
    pub fn build(self) -> Cache<K, V, RandomState> {
        let build_hasher = RandomState::default();
        Cache::with_everything(
            self.max_capacity,
            self.initial_capacity,
            self.eviction_listener,
            build_hasher,
        )
    }

    /// Builds a `Cache<K, V, S>`, with the given `hasher`.
    pub fn build_with_hasher<S>(self, hasher: S) -> Cache<K, V, S>
    where
        S: BuildHasher + Clone,
    {
        Cache::with_everything(
            self.max_capacity,
            self.initial_capacity,
            self.eviction_listener,
            hasher,
        )
    }
}

impl<K, V, C> CacheBuilder<K, V, C> {
    /// Sets the max capacity of the cache, in weight units.
    ///
    /// A capacity of `0` disables the budget: the cache becomes unbounded
    /// and never evicts.
    pub fn max_capacity(self, max_capacity: u64) -> Self {
        Self {
            max_capacity: Some(max_capacity),
            ..self
        }
    }

    /// Sets the initial capacity (number of entries) of the cache.
    pub fn initial_capacity(self, number_of_entries: usize) -> Self {
        Self {
            initial_capacity: Some(number_of_entries),
            ..self
        }
    }

    /// Sets the eviction listener of the cache.
    ///
    /// The listener is called once per evicted entry, in eviction order,
    /// inline with the operation that triggered the eviction. It cannot be
    /// changed or removed after the cache is built.
    pub fn eviction_listener(self, listener: impl FnMut(Rc<K>, V) + 'static) -> Self {
        Self {
            eviction_listener: Some(Box::new(listener)),
            ..self
        }
    }
}
