use crate::layout::masonry::{ColumnStrategy, MasonryItem, MasonryLayout, Result};
use crate::models::MasonryModel;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

/// Maximum number of cached assignments to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache.
/// Column assignment never depends on container width, so width is not part of the key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    list_hash: u64,
    column_count: usize,
    strategy: ColumnStrategy,
}

#[derive(Debug, Clone)]
struct CachedAssignment {
    /// Column index per item, in input order
    column_indices: Vec<u32>,
    /// Number of items this assignment was computed for
    item_count: usize,
    /// Timestamp of when this cache entry was last used (for LRU eviction)
    last_used: std::time::Instant,
}

/// Cache of column assignments.
///
/// A layout pass after a resize hits the cache and only recomputes widths and
/// offsets. The list hash covers (id, height) of every item in order, so a
/// different item list misses.
pub struct LayoutCache {
    cache: RwLock<HashMap<CacheKey, CachedAssignment>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(MAX_CACHE_ENTRIES)),
        }
    }

    /// Computes a fast hash of the item list, sensitive to order, identity and height.
    pub fn compute_list_hash<T: MasonryItem>(items: &[T]) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 12);

        for item in items {
            hasher_input.extend_from_slice(&item.layout_id().to_le_bytes());
            hasher_input.extend_from_slice(&item.display_height().to_bits().to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    /// Returns cached column indices, or None on a miss or item count mismatch.
    pub fn get(
        &self,
        list_hash: u64,
        column_count: usize,
        strategy: ColumnStrategy,
        item_count: usize,
    ) -> Option<Vec<u32>> {
        let key = CacheKey {
            list_hash,
            column_count,
            strategy,
        };

        let mut cache = self.cache.write();
        let entry = cache.get_mut(&key)?;
        if entry.item_count != item_count {
            return None;
        }
        entry.last_used = std::time::Instant::now();
        Some(entry.column_indices.clone())
    }

    /// Stores column indices for a list.
    pub fn set(
        &self,
        list_hash: u64,
        column_count: usize,
        strategy: ColumnStrategy,
        column_indices: Vec<u32>,
    ) {
        let key = CacheKey {
            list_hash,
            column_count,
            strategy,
        };

        let entry = CachedAssignment {
            item_count: column_indices.len(),
            column_indices,
            last_used: std::time::Instant::now(),
        };

        let mut cache = self.cache.write();

        if cache.len() >= MAX_CACHE_ENTRIES && !cache.contains_key(&key) {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(key, entry);
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn evict_oldest(cache: &mut HashMap<CacheKey, CachedAssignment>) {
        let oldest_key = cache
            .iter()
            .min_by_key(|(_, v)| v.last_used)
            .map(|(k, _)| k.clone());

        if let Some(key) = oldest_key {
            cache.remove(&key);
        }
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Combines a masonry layout with an assignment cache.
pub struct CachedMasonryComputer {
    pub layout: MasonryLayout,
    pub cache: LayoutCache,
}

impl CachedMasonryComputer {
    pub fn new() -> Self {
        Self::with_layout(MasonryLayout::default())
    }

    pub fn with_layout(layout: MasonryLayout) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(),
        }
    }

    /// Computes the layout, reusing a cached column assignment when the list is unchanged.
    pub fn compute<T: MasonryItem>(&self, items: &[T], container_width: f32) -> Result<MasonryModel> {
        let list_hash = LayoutCache::compute_list_hash(items);
        let column_count = self.layout.column_count;
        let strategy = self.layout.strategy;

        if let Some(indices) = self.cache.get(list_hash, column_count, strategy, items.len()) {
            trace!(list_hash, "Masonry assignment cache hit");
            return self.layout.model_from_indices(items, &indices, container_width);
        }

        let indices = self.layout.column_indices(items)?;
        let model = self.layout.model_from_indices(items, &indices, container_width)?;
        self.cache.set(list_hash, column_count, strategy, indices);

        Ok(model)
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedMasonryComputer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;
    use crate::models::InspoPost;

    #[test]
    fn test_list_hash_consistency() {
        let items = InspoPost::samples();
        assert_eq!(
            LayoutCache::compute_list_hash(&items),
            LayoutCache::compute_list_hash(&items)
        );
    }

    #[test]
    fn test_list_hash_changes_on_height() {
        let items1 = vec![InspoPost::new(1, 280.0, "A", "@a", "Glam")];
        let items2 = vec![InspoPost::new(1, 281.0, "A", "@a", "Glam")];
        assert_ne!(
            LayoutCache::compute_list_hash(&items1),
            LayoutCache::compute_list_hash(&items2)
        );
    }

    #[test]
    fn test_list_hash_changes_on_order() {
        let mut items = InspoPost::samples();
        let hash1 = LayoutCache::compute_list_hash(&items);
        items.swap(0, 1);
        assert_ne!(hash1, LayoutCache::compute_list_hash(&items));
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = LayoutCache::new();
        assert!(cache.get(7, 2, ColumnStrategy::RoundRobin, 3).is_none());

        cache.set(7, 2, ColumnStrategy::RoundRobin, vec![0, 1, 0]);
        assert_eq!(
            cache.get(7, 2, ColumnStrategy::RoundRobin, 3),
            Some(vec![0, 1, 0])
        );
        // Different column count or strategy is a different entry.
        assert!(cache.get(7, 3, ColumnStrategy::RoundRobin, 3).is_none());
        assert!(cache.get(7, 2, ColumnStrategy::ShortestColumn, 3).is_none());
        // Item count mismatch is a miss.
        assert!(cache.get(7, 2, ColumnStrategy::RoundRobin, 4).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = LayoutCache::new();
        for i in 0..(MAX_CACHE_ENTRIES + 5) {
            cache.set(i as u64, 2, ColumnStrategy::RoundRobin, vec![0]);
        }
        assert!(cache.len() <= MAX_CACHE_ENTRIES);
    }

    #[test]
    fn test_resize_reuses_assignment() {
        let computer = CachedMasonryComputer::new();
        let items = InspoPost::samples();

        let narrow = computer.compute(&items, 344.0).unwrap();
        assert_eq!(computer.cache.len(), 1);
        let wide = computer.compute(&items, 644.0).unwrap();
        assert_eq!(computer.cache.len(), 1);

        assert_eq!(narrow.column_width, 150.0);
        assert_eq!(wide.column_width, 300.0);
        let narrow_cols: Vec<u32> = narrow.placements().iter().map(|p| p.column_index).collect();
        let wide_cols: Vec<u32> = wide.placements().iter().map(|p| p.column_index).collect();
        assert_eq!(narrow_cols, wide_cols);
    }

    #[test]
    fn test_cached_matches_direct() {
        let computer = CachedMasonryComputer::new();
        let items = InspoPost::samples();
        let direct = computer.layout.compute(&items, 390.0).unwrap();
        computer.compute(&items, 390.0).unwrap();
        let cached = computer.compute(&items, 390.0).unwrap();
        assert_eq!(direct, cached);
    }

    #[test]
    fn test_empty_items_still_produce_columns() {
        let computer = CachedMasonryComputer::new();
        let model = computer.compute::<InspoPost>(&[], 390.0).unwrap();
        assert_eq!(model.columns.len(), 2);
    }

    #[test]
    fn test_invalid_column_count_not_cached() {
        let computer = CachedMasonryComputer::with_layout(MasonryLayout::new(0, 12.0, 16.0));
        let result = computer.compute(&InspoPost::samples(), 390.0);
        assert_eq!(result, Err(LayoutError::InvalidConfiguration(0)));
        assert!(computer.cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let computer = CachedMasonryComputer::new();
        computer.compute(&InspoPost::samples(), 390.0).unwrap();
        assert!(!computer.cache.is_empty());
        computer.invalidate();
        assert!(computer.cache.is_empty());
    }
}
