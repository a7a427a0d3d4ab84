// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Buffer pooling for query snapshots
//!
//! Every signature query copies its candidate entity ids into a buffer
//! before running callbacks. Nested queries (player x monster, bullet x
//! monster) take one buffer per level, so buffers are recycled through a
//! small pool instead of being allocated every frame.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Configuration for buffer pool behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial capacity for each buffer in the pool
    pub initial_capacity: usize,
    /// Maximum number of buffers to keep in the pool
    pub max_pool_size: usize,
    /// Whether to log when the pool has to allocate
    pub log_resize_events: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 64,
            max_pool_size: 8,
            log_resize_events: false,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with custom settings
    pub fn new(initial_capacity: usize, max_pool_size: usize) -> Self {
        PoolConfig {
            initial_capacity,
            max_pool_size,
            log_resize_events: false,
        }
    }

    /// Enable logging for allocation events
    pub fn with_logging(mut self) -> Self {
        self.log_resize_events = true;
        self
    }
}

/// Statistics for monitoring pool performance
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of times a buffer was successfully borrowed from the pool
    pub hits: usize,
    /// Number of times a new buffer had to be allocated
    pub misses: usize,
    /// Current number of buffers in the pool
    pub pool_size: usize,
    /// Peak number of idle buffers ever held
    pub peak_size: usize,
}

impl PoolStats {
    /// Calculate the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

// A panic inside a query callback is fatal for the frame, but it must not
// leave every later query unable to take a buffer.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A pool of reusable `Vec` buffers
pub struct VecPool<T> {
    pool: Arc<Mutex<Vec<Vec<T>>>>,
    config: PoolConfig,
    stats: Arc<Mutex<PoolStats>>,
}

impl<T> VecPool<T> {
    /// Create a new pool with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a new pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        VecPool {
            pool: Arc::new(Mutex::new(Vec::new())),
            config,
            stats: Arc::new(Mutex::new(PoolStats::default())),
        }
    }

    /// Acquire an empty buffer from the pool
    ///
    /// If the pool is empty, allocates a new buffer. The buffer is
    /// automatically returned to the pool when the guard is dropped.
    pub fn acquire(&self) -> VecGuard<T> {
        // LOCK ORDERING: pool lock is released before the stats lock is taken
        let (buffer, was_hit, pool_len) = {
            let mut pool = lock(&self.pool);
            let was_hit = !pool.is_empty();
            let buf = match pool.pop() {
                Some(mut b) => {
                    b.clear();
                    b
                }
                None => Vec::with_capacity(self.config.initial_capacity),
            };
            (buf, was_hit, pool.len())
        };

        {
            let mut stats = lock(&self.stats);
            if was_hit {
                stats.hits += 1;
            } else {
                stats.misses += 1;
                if self.config.log_resize_events {
                    log::debug!("VecPool: allocating new buffer (hit rate: {:.1}%)", stats.hit_rate());
                }
            }
            stats.pool_size = pool_len;
        }

        VecGuard {
            buffer: Some(buffer),
            pool: Arc::clone(&self.pool),
            stats: Arc::clone(&self.stats),
            max_pool_size: self.config.max_pool_size,
        }
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        lock(&self.stats).clone()
    }

    /// Drop all idle buffers
    pub fn clear(&self) {
        lock(&self.pool).clear();
        lock(&self.stats).pool_size = 0;
    }

    /// Get the current number of idle buffers in the pool
    pub fn len(&self) -> usize {
        lock(&self.pool).len()
    }

    /// Check if the pool holds no idle buffers
    pub fn is_empty(&self) -> bool {
        lock(&self.pool).is_empty()
    }
}

impl<T> Default for VecPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VecPool<T> {
    fn clone(&self) -> Self {
        VecPool {
            pool: Arc::clone(&self.pool),
            config: self.config.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

/// RAII guard for a pooled `Vec`
///
/// When dropped, returns the buffer to the pool for reuse.
pub struct VecGuard<T> {
    buffer: Option<Vec<T>>,
    pool: Arc<Mutex<Vec<Vec<T>>>>,
    stats: Arc<Mutex<PoolStats>>,
    max_pool_size: usize,
}

impl<T> std::ops::Deref for VecGuard<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the buffer out
        self.buffer.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<T> std::ops::DerefMut for VecGuard<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T> Drop for VecGuard<T> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            let mut pool = lock(&self.pool);
            if pool.len() < self.max_pool_size {
                pool.push(buffer);

                let mut stats = lock(&self.stats);
                stats.pool_size = pool.len();
                if stats.pool_size > stats.peak_size {
                    stats.peak_size = stats.pool_size;
                }
            }
            // If pool is full, buffer is dropped (deallocated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.max_pool_size, 8);
        assert!(!config.log_resize_events);
    }

    #[test]
    fn test_pool_acquire_and_return() {
        let pool: VecPool<Entity> = VecPool::new();

        {
            let mut guard = pool.acquire();
            guard.push(Entity::new(1, 0));
            assert_eq!(guard.len(), 1);
        }

        assert_eq!(pool.len(), 1);
        let stats = pool.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_pool_reuse_clears_buffer() {
        let pool: VecPool<Entity> = VecPool::new();

        {
            let mut guard = pool.acquire();
            guard.push(Entity::new(1, 0));
        }
        {
            let guard = pool.acquire();
            assert!(guard.is_empty());
        }

        let stats = pool.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn test_nested_acquire_uses_distinct_buffers() {
        let pool: VecPool<u32> = VecPool::with_config(PoolConfig::new(4, 2));

        let mut outer = pool.acquire();
        outer.push(1);
        {
            let mut inner = pool.acquire();
            inner.push(2);
            assert_eq!(outer.as_slice(), &[1]);
            assert_eq!(inner.as_slice(), &[2]);
        }
        assert_eq!(pool.len(), 1);
        drop(outer);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pool_max_size() {
        let pool: VecPool<u32> = VecPool::with_config(PoolConfig::new(8, 2));

        {
            let _g1 = pool.acquire();
            let _g2 = pool.acquire();
            let _g3 = pool.acquire();
        }

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().peak_size, 2);
    }

    #[test]
    fn test_pool_clear() {
        let pool: VecPool<u32> = VecPool::new();
        {
            let _g1 = pool.acquire();
            let _g2 = pool.acquire();
        }
        assert_eq!(pool.len(), 2);

        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.stats().pool_size, 0);
    }
}
