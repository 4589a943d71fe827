#[derive(Clone, Debug)]
/// The policy of a cache.
pub struct Policy {
    max_capacity: Option<u64>,
}

impl Policy {
    pub(crate) fn new(max_capacity: Option<u64>) -> Self {
        Self { max_capacity }
    }

    /// Returns the `max_capacity` of the cache, in weight units.
    ///
    /// `None` means the cache is unbounded and never evicts.
    pub fn max_capacity(&self) -> Option<u64> {
        self.max_capacity
    }

    /// Returns `true` if the cache has a capacity budget and will evict
    /// entries to stay within it.
    pub fn eviction_enabled(&self) -> bool {
        self.max_capacity.is_some()
    }
}
