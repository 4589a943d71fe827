use super::{CacheBuilder, EvictionListener, Iter, ValueEntry};
use crate::{common::deque::Deque, Policy, Weigh};

use smallvec::SmallVec;
use std::{
    borrow::Borrow,
    collections::{hash_map::RandomState, HashMap},
    fmt,
    hash::{BuildHasher, Hash},
    rc::Rc,
};

type CacheStore<K, V, S> = std::collections::HashMap<Rc<K>, ValueEntry<V>, S>;

/// An in-memory LRU cache that is _not_ thread-safe.
///
/// `Cache` utilizes a hash table [`std::collections::HashMap`][std-hashmap]
/// from the standard library for the central key-value storage, plus an
/// arena-backed deque recording the recency order of entries. The cache is
/// bounded by a *weighted size* budget: every entry is charged
/// `key.weight() + value.weight()` (see [`Weigh`][weigh-trait]), and after
/// every insert the least-recently-used entries are evicted until the total
/// charge fits the budget again.
///
/// [std-hashmap]: https://doc.rust-lang.org/std/collections/struct.HashMap.html
/// [weigh-trait]: ../trait.Weigh.html
///
/// # Eviction
///
/// Eviction happens only as part of [`insert`](#method.insert) (and the
/// explicit [`evict_lru`](#method.evict_lru) trim). A `get` promotes the
/// entry it hits but never evicts, and never changes the weighted size.
/// The eviction loop keeps removing the least-recently-used entry while the
/// cache is over budget. A single entry whose own charge exceeds the budget
/// is not exempt: inserting it evicts every other entry and then the
/// oversized entry itself, leaving the cache empty.
///
/// # Concurrency
///
/// The cache defines a strictly sequential contract. Callers that need
/// concurrent access must serialize operations externally, for example
/// behind a `Mutex` or inside a single-owner task.
///
/// # Examples
///
/// Cache entries are manually added using the insert method, and are stored
/// in the cache until either evicted or manually invalidated.
///
/// Here's an example of reading and updating a cache by using the main
/// thread:
///
///```rust
/// use micro_lru::unsync::Cache;
///
/// const NUM_KEYS: usize = 64;
///
/// fn value(n: usize) -> String {
///     format!("value {}", n)
/// }
///
/// // Create a cache with a budget of 10,000 weight units.
/// let mut cache = Cache::new(10_000);
///
/// // Insert 64 entries.
/// for key in 0..NUM_KEYS {
///     cache.insert(key, value(key));
/// }
///
/// // Invalidate every 4 element of the inserted entries.
/// for key in (0..NUM_KEYS).step_by(4) {
///     cache.invalidate(&key);
/// }
///
/// // Verify the result.
/// for key in 0..NUM_KEYS {
///     if key % 4 == 0 {
///         assert_eq!(cache.get(&key), None);
///     } else {
///         assert_eq!(cache.get(&key), Some(&value(key)));
///     }
/// }
/// ```
///
/// # Hashing Algorithm
///
/// By default, `Cache` uses a hashing algorithm selected to provide
/// resistance against HashDoS attacks. It will be the same one used by
/// `std::collections::HashMap`, which is currently SipHash 1-3.
///
/// The hashing algorithm can be replaced on a per-`Cache` basis using the
/// [`build_with_hasher`][build-with-hasher-method] method of the
/// `CacheBuilder`. Many alternative algorithms are available on crates.io,
/// such as the [aHash][ahash-crate] crate.
///
/// [build-with-hasher-method]: ./struct.CacheBuilder.html#method.build_with_hasher
/// [ahash-crate]: https://crates.io/crates/ahash
///
pub struct Cache<K, V, S = RandomState> {
    max_capacity: Option<u64>,
    weighted_size: u64,
    cache: CacheStore<K, V, S>,
    build_hasher: S,
    recency: Deque<Rc<K>>,
    eviction_listener: Option<EvictionListener<K, V>>,
}

impl<K, V, S> fmt::Debug for Cache<K, V, S>
where
    K: fmt::Debug + Eq + Hash,
    V: fmt::Debug,
    S: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d_map = f.debug_map();

        for (k, v) in self.iter() {
            d_map.entry(&k, &v);
        }

        d_map.finish()
    }
}

impl<K, V> Cache<K, V, RandomState>
where
    K: Hash + Eq,
{
    /// Constructs a new `Cache<K, V>` with a weighted-size budget of
    /// `max_capacity`.
    ///
    /// A `max_capacity` of `0` disables the budget: the cache becomes
    /// unbounded and never evicts.
    ///
    /// To adjust various configuration knobs such as `initial_capacity` or
    /// the eviction listener, use the [`CacheBuilder`][builder-struct].
    ///
    /// [builder-struct]: ./struct.CacheBuilder.html
    pub fn new(max_capacity: u64) -> Self {
        let build_hasher = RandomState::default();
        Self::with_everything(Some(max_capacity), None, None, build_hasher)
    }

    /// Returns a [`CacheBuilder`][builder-struct], which can builds a
    /// `Cache` with various configuration knobs.
    ///
    /// [builder-struct]: ./struct.CacheBuilder.html
    pub fn builder() -> CacheBuilder<K, V, Cache<K, V, RandomState>> {
        CacheBuilder::default()
    }
}

//
// public
//
impl<K, V, S> Cache<K, V, S> {
    /// Returns a read-only cache policy of this cache.
    ///
    /// At this time, cache policy cannot be modified after cache creation.
    /// A future version may support to modify it.
    pub fn policy(&self) -> Policy {
        Policy::new(self.max_capacity)
    }

    /// Returns the number of entries in this cache.
    ///
    /// # Example
    ///
    /// ```rust
    /// use micro_lru::unsync::Cache;
    ///
    /// let mut cache = Cache::new(100);
    /// cache.insert('n', "Netherland Dwarf");
    /// cache.insert('l', "Lop Eared");
    /// cache.insert('d', "Dutch");
    ///
    /// // Ensure an entry exists.
    /// assert!(cache.contains_key(&'n'));
    ///
    /// // Followings will print the actual numbers.
    /// println!("{}", cache.entry_count());   // -> 3
    /// ```
    ///
    pub fn entry_count(&self) -> u64 {
        self.cache.len() as u64
    }

    /// Returns the total weighted size of entries in this cache: the sum of
    /// `key.weight() + value.weight()` over all current entries.
    pub fn weighted_size(&self) -> u64 {
        self.weighted_size
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    pub(crate) fn with_everything(
        max_capacity: Option<u64>,
        initial_capacity: Option<usize>,
        eviction_listener: Option<EvictionListener<K, V>>,
        build_hasher: S,
    ) -> Self {
        let cache = HashMap::with_capacity_and_hasher(
            initial_capacity.unwrap_or_default(),
            build_hasher.clone(),
        );

        Self {
            // A budget of zero means "no budget".
            max_capacity: max_capacity.filter(|cap| *cap > 0),
            weighted_size: 0,
            cache,
            build_hasher,
            recency: Deque::with_capacity(initial_capacity.unwrap_or_default()),
            eviction_listener,
        }
    }

    /// Returns `true` if the cache contains a value for the key.
    ///
    /// Unlike the `get` method, this method does not promote the entry to
    /// the most-recently-used position.
    ///
    /// The key may be any borrowed form of the cache's key type, but `Hash`
    /// and `Eq` on the borrowed form _must_ match those for the key type.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Rc<K>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.contains_key(key)
    }

    /// Returns an immutable reference of the value corresponding to the key,
    /// promoting the entry to the most-recently-used position.
    ///
    /// A miss has no side effects: the recency order and the weighted size
    /// are left untouched.
    ///
    /// The key may be any borrowed form of the cache's key type, but `Hash`
    /// and `Eq` on the borrowed form _must_ match those for the key type.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Rc<K>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(entry) = self.cache.get_mut(key) {
            if let Some(node) = entry.recency_node() {
                self.recency.move_to_back(node);
            }
            Some(&entry.value)
        } else {
            None
        }
    }

    /// Discards all cached values.
    pub fn invalidate_all(&mut self) {
        // Phase 1: swap out the cache before resetting internal state so that
        // a panic in V::drop leaves `self` in a consistent (empty) state.
        let old_capacity = self.cache.capacity();
        let old_cache = std::mem::replace(
            &mut self.cache,
            HashMap::with_hasher(self.build_hasher.clone()),
        );
        self.recency.clear();
        self.weighted_size = 0;

        // If V::drop panics, `self` is already in a valid empty state.
        drop(old_cache);

        // Phase 2: best effort capacity restoration for future inserts.
        let _ = self.cache.try_reserve(old_capacity);
    }

    /// Creates an iterator visiting all key-value pairs in arbitrary order.
    /// The iterator element type is `(&K, &V)`.
    ///
    /// Unlike the `get` method, visiting entries via an iterator does not
    /// promote them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_lru::unsync::Cache;
    ///
    /// let mut cache = Cache::new(100);
    /// cache.insert("Julia", 14u32);
    ///
    /// let mut iter = cache.iter();
    /// let (k, v) = iter.next().unwrap(); // (&K, &V)
    /// assert_eq!(k, &"Julia");
    /// assert_eq!(v, &14);
    ///
    /// assert!(iter.next().is_none());
    /// ```
    ///
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self, self.cache.iter())
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq + Weigh,
    V: Weigh,
    S: BuildHasher + Clone,
{
    /// Inserts a key-value pair into the cache.
    ///
    /// If the cache has this key present, the value is updated, the entry is
    /// promoted to the most-recently-used position, and the weighted size is
    /// adjusted by the difference between the new and old value weights.
    /// Otherwise a new entry charged `key.weight() + value.weight()` is
    /// added at the most-recently-used position.
    ///
    /// Either way, the least-recently-used entries are then evicted until
    /// the cache fits its budget (see the type-level docs for the oversized
    /// entry policy). The eviction listener runs inline, once per evicted
    /// entry, before `insert` returns.
    pub fn insert(&mut self, key: K, value: V) {
        let key = Rc::new(key);
        let value_weight = value.weight();
        let entry = ValueEntry::new(value);

        if let Some(old_entry) = self.cache.insert(Rc::clone(&key), entry) {
            self.handle_update(key, value_weight, old_entry);
        } else {
            self.handle_insert(key, value_weight);
        }
        self.evict_to_fit();
    }

    /// Evicts the least-recently-used entry. No-op on an empty cache.
    ///
    /// This is the primitive the capacity budget applies repeatedly; it is
    /// exposed so callers can trim the cache by hand. The eviction listener,
    /// if configured, observes the removed entry.
    pub fn evict_lru(&mut self) {
        self.evict_lru_entry();
    }

    /// Discards any cached value for the key.
    ///
    /// This is an explicit removal, not an eviction: the eviction listener
    /// is not notified.
    ///
    /// The key may be any borrowed form of the cache's key type, but `Hash`
    /// and `Eq` on the borrowed form _must_ match those for the key type.
    pub fn invalidate<Q>(&mut self, key: &Q)
    where
        Rc<K>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key);
    }

    /// Discards any cached value for the key, returning the cached value.
    ///
    /// Like `invalidate`, this does not notify the eviction listener.
    ///
    /// The key may be any borrowed form of the cache's key type, but `Hash`
    /// and `Eq` on the borrowed form _must_ match those for the key type.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Rc<K>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(mut entry) = self.cache.remove(key) {
            let key_weight = match entry.take_recency_node() {
                Some(node) => self.recency.unlink(node).weight(),
                None => 0,
            };
            let charge = key_weight.saturating_add(entry.value.weight());
            self.weighted_size = self.weighted_size.saturating_sub(charge);
            Some(entry.value)
        } else {
            None
        }
    }

    /// Discards cached values that satisfy a predicate.
    ///
    /// `invalidate_entries_if` takes a closure that returns `true` or
    /// `false`. It will apply the closure to each cached value, and if the
    /// closure returns `true`, the value will be invalidated. Like the
    /// `invalidate` method, this does not notify the eviction listener.
    pub fn invalidate_entries_if(&mut self, mut predicate: impl FnMut(&K, &V) -> bool) {
        // Since we can't do cache.iter() and cache.remove() at the same time,
        // invalidation needs to run in two steps:
        // 1. Examine all entries in this cache and collect keys to invalidate.
        // 2. Remove entries for the keys.

        let keys_to_invalidate = self
            .cache
            .iter()
            .filter(|(key, entry)| (predicate)(key, &entry.value))
            .map(|(key, _)| Rc::clone(key))
            .collect::<SmallVec<[_; 8]>>();

        for key in keys_to_invalidate {
            self.invalidate(&*key);
        }
    }
}

//
// private
//
impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq + Weigh,
    V: Weigh,
    S: BuildHasher + Clone,
{
    fn handle_insert(&mut self, key: Rc<K>, value_weight: u64) {
        let charge = key.weight().saturating_add(value_weight);
        let node = self.recency.push_back(Rc::clone(&key));
        self.cache
            .get_mut(&key)
            .unwrap()
            .set_recency_node(Some(node));
        self.weighted_size = self.weighted_size.saturating_add(charge);
    }

    fn handle_update(&mut self, key: Rc<K>, value_weight: u64, old_entry: ValueEntry<V>) {
        let old_weight = old_entry.value.weight();
        let entry = self.cache.get_mut(&key).unwrap();
        entry.replace_recency_node_with(old_entry);
        let node = entry.recency_node();

        if let Some(node) = node {
            self.recency.move_to_back(node);
        }
        self.weighted_size = self
            .weighted_size
            .saturating_sub(old_weight)
            .saturating_add(value_weight);
    }

    #[inline]
    fn evict_to_fit(&mut self) {
        if let Some(max) = self.max_capacity {
            // Each eviction strictly shrinks the store, so this terminates
            // even when a single oversized entry has to evict itself.
            while self.weighted_size > max && self.evict_lru_entry() {}
        }
    }

    /// Removes the least-recently-used entry from both structures, updates
    /// the weighted size, and notifies the eviction listener. Returns
    /// `false` if the cache was empty.
    fn evict_lru_entry(&mut self) -> bool {
        // clippy::map_clone will give us a false positive warning here.
        #[allow(clippy::map_clone)]
        let key = self.recency.peek_front().map(|key| Rc::clone(key));
        let key = match key {
            Some(key) => key,
            None => return false,
        };

        if let Some(mut entry) = self.cache.remove(&key) {
            match entry.take_recency_node() {
                Some(node) => {
                    self.recency.unlink(node);
                }
                None => {
                    self.recency.pop_front();
                }
            }
            let charge = key.weight().saturating_add(entry.value.weight());
            self.weighted_size = self.weighted_size.saturating_sub(charge);

            // Notify only after the removal is fully committed.
            if let Some(listener) = self.eviction_listener.as_mut() {
                listener(key, entry.value);
            }
        } else {
            // The index lost track of this key; drop the orphan node.
            self.recency.pop_front();
        }
        true
    }
}

//
// for testing
//
#[cfg(test)]
impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn lru_to_mru_keys(&self) -> Vec<Rc<K>> {
        self.recency.iter().map(Rc::clone).collect()
    }

    fn assert_index_matches_recency_order(&self) {
        assert_eq!(self.cache.len(), self.recency.len());
        for key in self.recency.iter() {
            assert!(self.cache.contains_key(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cache;
    use crate::Weigh;

    use std::cell::RefCell;
    use std::rc::Rc;

    fn keys<K: Copy, V, S>(cache: &Cache<K, V, S>) -> Vec<K>
    where
        K: std::hash::Hash + Eq,
        S: std::hash::BuildHasher + Clone,
    {
        cache.lru_to_mru_keys().iter().map(|k| **k).collect()
    }

    #[test]
    fn insert_then_get() {
        let mut cache = Cache::new(20);
        // "test1" + "test1_value" is charged 5 + 11 = 16.
        cache.insert("test1", "test1_value");

        assert_eq!(cache.get(&"test1"), Some(&"test1_value"));
        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.weighted_size(), 16);
    }

    #[test]
    fn get_on_an_absent_key_has_no_side_effects() {
        let mut cache = Cache::new(100);
        cache.insert("a", "alice");
        cache.insert("b", "bob");
        let weighted = cache.weighted_size();

        assert_eq!(cache.get(&"zzz"), None);
        assert_eq!(cache.weighted_size(), weighted);
        assert_eq!(keys(&cache), ["a", "b"]);
    }

    #[test]
    fn get_promotes_and_eviction_takes_the_lru() {
        // "test1" + "value1" and "test2" + "value2" are charged 11 each.
        let mut cache = Cache::new(24);
        cache.insert("test1", "value1");
        cache.insert("test2", "value2");
        assert_eq!(cache.weighted_size(), 22);

        // Promote "test1" so "test2" becomes the LRU entry.
        assert_eq!(cache.get(&"test1"), Some(&"value1"));
        assert_eq!(keys(&cache), ["test2", "test1"]);

        // 33 > 24: evicts "test2" only.
        cache.insert("test3", "value3");
        assert!(cache.contains_key(&"test1"));
        assert!(!cache.contains_key(&"test2"));
        assert!(cache.contains_key(&"test3"));
        assert_eq!(cache.entry_count(), 2);
        assert_eq!(cache.weighted_size(), 22);
    }

    #[test]
    fn eviction_listener_sees_evictions_in_lru_order() {
        let evicted: Rc<RefCell<Vec<(Rc<&str>, &str)>>> = Rc::new(RefCell::new(Vec::new()));
        let collected = Rc::clone(&evicted);

        let mut cache = Cache::builder()
            .max_capacity(10)
            .eviction_listener(move |key, value| collected.borrow_mut().push((key, value)))
            .build();

        cache.insert("key1", "123456"); // 4 + 6 = 10, fits exactly
        assert_eq!(cache.weighted_size(), 10);
        cache.insert("k2", "k2"); // 14 > 10: evicts "key1"
        assert_eq!(cache.weighted_size(), 4);
        cache.insert("k3", "k3"); // 8, fits
        cache.insert("k4", "k4"); // 12 > 10: evicts "k2"
        assert_eq!(cache.weighted_size(), 8);

        let evicted = evicted.borrow();
        let evicted_keys = evicted.iter().map(|(k, _)| **k).collect::<Vec<_>>();
        assert_eq!(evicted_keys, ["key1", "k2"]);
        assert_eq!(evicted[0].1, "123456");
        assert_eq!(evicted[1].1, "k2");
    }

    #[test]
    fn unbounded_cache_never_evicts() {
        let evictions = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&evictions);

        // An unset max_capacity disables the budget entirely.
        let mut cache = Cache::builder()
            .eviction_listener(move |_key, _value: String| *counter.borrow_mut() += 1)
            .build();

        for i in 0..1000u32 {
            cache.insert(i, format!("value {}", i));
        }

        assert_eq!(cache.entry_count(), 1000);
        assert_eq!(*evictions.borrow(), 0);
        assert_eq!(cache.policy().max_capacity(), None);
    }

    #[test]
    fn zero_max_capacity_means_unbounded() {
        let mut cache = Cache::new(0);
        for i in 0..100u32 {
            cache.insert(i, "x".repeat(1000));
        }
        assert_eq!(cache.entry_count(), 100);
        assert!(!cache.policy().eviction_enabled());
    }

    #[test]
    fn update_adjusts_weighted_size_by_the_value_delta() {
        let mut cache = Cache::new(100);
        cache.insert("key", "12345678"); // 3 + 8 = 11
        assert_eq!(cache.weighted_size(), 11);

        cache.insert("key", "1234"); // -4
        assert_eq!(cache.weighted_size(), 7);

        cache.insert("key", "123456789a"); // +6
        assert_eq!(cache.weighted_size(), 13);

        assert_eq!(cache.entry_count(), 1);
        cache.assert_index_matches_recency_order();
    }

    #[test]
    fn update_promotes_the_entry() {
        let mut cache = Cache::new(100);
        cache.insert("a", "1");
        cache.insert("b", "2");
        cache.insert("c", "3");

        cache.insert("a", "9");
        assert_eq!(keys(&cache), ["b", "c", "a"]);
        assert_eq!(cache.get(&"a"), Some(&"9"));
    }

    #[test]
    fn an_oversized_entry_evicts_everything_including_itself() {
        let evicted: Rc<RefCell<Vec<&str>>> = Rc::new(RefCell::new(Vec::new()));
        let collected = Rc::clone(&evicted);

        let mut cache = Cache::builder()
            .max_capacity(10)
            .eviction_listener(move |key: Rc<&str>, _value: &str| {
                collected.borrow_mut().push(*key)
            })
            .build();

        cache.insert("k1", "1"); // 3
        cache.insert("k2", "2"); // 6
        // 3 + 16 = 19 exceeds the whole budget: the loop drains the store,
        // the oversized entry last.
        cache.insert("big", "0123456789abcdef");

        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.weighted_size(), 0);
        assert!(cache.is_empty());
        assert_eq!(*evicted.borrow(), ["k1", "k2", "big"]);
    }

    #[test]
    fn evict_lru_trims_one_entry() {
        let mut cache = Cache::new(0);
        cache.insert("a", "alice");
        cache.insert("b", "bob");
        cache.insert("c", "cindy");

        // Promote "a" so "b" is now the LRU entry.
        cache.get(&"a");
        cache.evict_lru();

        assert!(!cache.contains_key(&"b"));
        assert_eq!(cache.entry_count(), 2);
        assert_eq!(keys(&cache), ["c", "a"]);
    }

    #[test]
    fn evict_lru_on_an_empty_cache_is_a_no_op() {
        let mut cache: Cache<&str, &str> = Cache::new(10);
        cache.evict_lru();
        assert!(cache.is_empty());
        assert_eq!(cache.weighted_size(), 0);
    }

    #[test]
    fn explicit_removal_updates_accounting_without_notifying() {
        let evictions = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&evictions);

        let mut cache = Cache::builder()
            .max_capacity(100)
            .eviction_listener(move |_key: Rc<&str>, _value: &str| *counter.borrow_mut() += 1)
            .build();

        cache.insert("a", "alice"); // 1 + 5 = 6
        cache.insert("b", "bob"); // 1 + 3 = 4
        assert_eq!(cache.weighted_size(), 10);

        assert_eq!(cache.remove(&"a"), Some("alice"));
        assert_eq!(cache.weighted_size(), 4);
        assert_eq!(cache.entry_count(), 1);

        cache.invalidate(&"b");
        assert_eq!(cache.weighted_size(), 0);
        assert_eq!(cache.entry_count(), 0);

        // Removing absent keys changes nothing.
        assert_eq!(cache.remove(&"a"), None);
        cache.invalidate(&"zzz");
        assert_eq!(cache.weighted_size(), 0);

        // Explicit removal never fires the eviction listener.
        assert_eq!(*evictions.borrow(), 0);
    }

    #[test]
    fn removal_frees_budget_for_new_entries() {
        let mut cache = Cache::new(12);
        cache.insert("aa", "1111"); // 6
        cache.insert("bb", "2222"); // 6
        assert_eq!(cache.weighted_size(), 12);

        cache.remove(&"aa");
        cache.insert("cc", "3333"); // 6, fits without eviction

        assert_eq!(cache.entry_count(), 2);
        assert!(cache.contains_key(&"bb"));
        assert!(cache.contains_key(&"cc"));
        assert_eq!(cache.weighted_size(), 12);
    }

    #[test]
    fn invalidate_all() {
        let mut cache = Cache::new(100);
        cache.insert("a", "alice");
        cache.insert("b", "bob");
        cache.insert("c", "cindy");
        assert_eq!(cache.entry_count(), 3);

        cache.invalidate_all();
        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.weighted_size(), 0);

        cache.insert("d", "david");
        assert!(cache.get(&"a").is_none());
        assert_eq!(cache.get(&"d"), Some(&"david"));
        cache.assert_index_matches_recency_order();
    }

    #[test]
    fn invalidate_entries_if() {
        use std::collections::HashSet;

        let mut cache = Cache::new(100);
        cache.insert(0u32, "alice"); // 4 + 5 = 9
        cache.insert(1u32, "bob"); // 4 + 3 = 7
        cache.insert(2u32, "alex"); // 4 + 4 = 8
        assert_eq!(cache.weighted_size(), 24);

        let names = ["alice", "alex"].iter().cloned().collect::<HashSet<_>>();
        cache.invalidate_entries_if(move |_k, &v| names.contains(v));

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.weighted_size(), 7);
        assert!(cache.get(&0).is_none());
        assert_eq!(cache.get(&1), Some(&"bob"));
        assert!(cache.get(&2).is_none());
        cache.assert_index_matches_recency_order();

        cache.invalidate_entries_if(|_k, &v| v == "bob");
        assert!(cache.is_empty());
        assert_eq!(cache.weighted_size(), 0);
    }

    #[test]
    fn index_and_recency_order_stay_in_sync() {
        let mut cache = Cache::new(64);
        for i in 0..100u32 {
            cache.insert(i, format!("value {}", i));
            if i % 3 == 0 {
                cache.get(&(i / 2));
            }
            if i % 7 == 0 {
                cache.remove(&(i.saturating_sub(1)));
            }
            cache.assert_index_matches_recency_order();
        }
        assert!(cache.weighted_size() <= 64);
    }

    #[test]
    fn invalidate_all_panic_safety() {
        use std::panic::catch_unwind;
        use std::panic::AssertUnwindSafe;
        use std::sync::atomic::{AtomicU32, Ordering};

        static DROP_COUNT: AtomicU32 = AtomicU32::new(0);

        struct PanicOnDrop {
            id: u32,
            should_panic: bool,
        }

        impl Weigh for PanicOnDrop {
            fn weight(&self) -> u64 {
                1
            }
        }

        impl Drop for PanicOnDrop {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::Relaxed);
                if self.should_panic {
                    panic!("intentional panic in drop for id={}", self.id);
                }
            }
        }

        DROP_COUNT.store(0, Ordering::Relaxed);
        let mut cache = Cache::new(100);
        cache.insert(
            1u32,
            PanicOnDrop {
                id: 1,
                should_panic: false,
            },
        );
        cache.insert(
            2u32,
            PanicOnDrop {
                id: 2,
                should_panic: true,
            },
        );
        cache.insert(
            3u32,
            PanicOnDrop {
                id: 3,
                should_panic: false,
            },
        );
        assert_eq!(cache.entry_count(), 3);

        let result = catch_unwind(AssertUnwindSafe(|| {
            cache.invalidate_all();
        }));
        assert!(result.is_err());

        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.weighted_size(), 0);

        cache.insert(
            4u32,
            PanicOnDrop {
                id: 4,
                should_panic: false,
            },
        );
        assert_eq!(cache.entry_count(), 1);
        assert!(cache.contains_key(&4));
    }

    #[test]
    fn test_debug_format() {
        let mut cache = Cache::new(100);
        cache.insert('a', "alice");
        cache.insert('b', "bob");
        cache.insert('c', "cindy");

        let debug_str = format!("{:?}", cache);
        assert!(debug_str.starts_with('{'));
        assert!(debug_str.contains(r#"'a': "alice""#));
        assert!(debug_str.contains(r#"'b': "bob""#));
        assert!(debug_str.contains(r#"'c': "cindy""#));
        assert!(debug_str.ends_with('}'));
    }
}
