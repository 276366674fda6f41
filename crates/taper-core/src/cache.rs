//! A process-local read-through cache with manual invalidation.
//!
//! Entries never expire on their own; writers call [`ReadThroughCache::invalidate`]
//! after changing the underlying data.

use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc};

use tokio::sync::RwLock;

/// Caches values of type `V` by key `K`.
///
/// Clones share the same map.
#[derive(Debug)]
pub struct ReadThroughCache<K, V> {
  inner: Arc<RwLock<Slots<K, V>>>,
}

#[derive(Debug)]
struct Slots<K, V> {
  values:     HashMap<K, V>,
  /// Bumped by every invalidation; a fetch that started under an older
  /// generation does not store its result.
  generation: u64,
}

impl<K, V> Clone for ReadThroughCache<K, V> {
  fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

impl<K, V> Default for ReadThroughCache<K, V> {
  fn default() -> Self {
    Self { inner: Arc::new(RwLock::new(Slots { values: HashMap::new(), generation: 0 })) }
  }
}

impl<K, V> ReadThroughCache<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  pub fn new() -> Self { Self::default() }

  /// Return the cached value for `key`, or run `fetch` and cache its result.
  ///
  /// Errors from `fetch` are returned and nothing is cached. If the cache is
  /// invalidated while `fetch` runs, its result is returned to this caller
  /// but not stored.
  pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
  {
    let started = {
      let slots = self.inner.read().await;
      if let Some(hit) = slots.values.get(&key) {
        return Ok(hit.clone());
      }
      slots.generation
    };

    let value = fetch().await?;

    let mut slots = self.inner.write().await;
    if slots.generation == started {
      slots.values.insert(key, value.clone());
    }
    Ok(value)
  }

  pub async fn get(&self, key: &K) -> Option<V> {
    self.inner.read().await.values.get(key).cloned()
  }

  pub async fn invalidate(&self, key: &K) {
    let mut slots = self.inner.write().await;
    slots.values.remove(key);
    slots.generation += 1;
  }

  pub async fn invalidate_all(&self) {
    let mut slots = self.inner.write().await;
    slots.values.clear();
    slots.generation += 1;
  }
}
