// Bookkeeping for asynchronous card image loads
// Kept free of GTK types so the dedup and stale-result rules run without a display

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// What a card is currently showing, and which load it will accept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSlot {
    token: u64,
    url: Option<String>,
}

impl LoadSlot {
    /// Starts tracking `url` under `token`. Any earlier load becomes stale.
    pub fn begin(&mut self, url: Option<&str>, token: u64) {
        self.url = url.map(str::to_string);
        self.token = if self.url.is_some() { token } else { 0 };
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// True when a result for `url` under `token` is still wanted.
    pub fn accepts(&self, token: u64, url: &str) -> bool {
        self.token != 0 && self.token == token && self.url.as_deref() == Some(url)
    }
}

/// Outcome of asking for an image.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadRequest<V> {
    /// Already decoded.
    Cached(V),
    /// First waiter for this URL; the caller must queue a fetch.
    Fetch,
    /// A fetch for this URL is already in flight.
    Waiting,
}

/// Per-URL request dedup, waiter lists and a bounded LRU of finished values.
///
/// `W` identifies a waiting card, `V` is the decoded result.
pub struct LoadTracker<W, V> {
    pending: HashSet<String>,
    waiters: HashMap<String, Vec<(W, u64)>>,
    cache: lru::LruCache<String, V>,
}

impl<W, V> LoadTracker<W, V>
where
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            pending: HashSet::new(),
            waiters: HashMap::new(),
            cache: lru::LruCache::new(capacity),
        }
    }

    pub fn request(&mut self, url: &str, waiter: W, token: u64) -> LoadRequest<V> {
        if let Some(value) = self.cache.get(url) {
            return LoadRequest::Cached(value.clone());
        }

        self.waiters
            .entry(url.to_string())
            .or_default()
            .push((waiter, token));

        if self.pending.insert(url.to_string()) {
            LoadRequest::Fetch
        } else {
            LoadRequest::Waiting
        }
    }

    /// Forgets a URL whose fetch could not be queued.
    pub fn abandon(&mut self, url: &str) {
        self.pending.remove(url);
        self.waiters.remove(url);
    }

    /// Records a finished fetch and returns every waiter to notify.
    ///
    /// Failed fetches (`None`) are not cached, so a later request retries.
    pub fn complete(&mut self, url: &str, value: Option<V>) -> Vec<(W, u64)> {
        self.pending.remove(url);
        if let Some(value) = value {
            self.cache.put(url.to_string(), value);
        }
        self.waiters.remove(url).unwrap_or_default()
    }

    #[cfg(test)]
    fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    #[cfg(test)]
    fn is_cached(&self, url: &str) -> bool {
        self.cache.contains(url)
    }
}
