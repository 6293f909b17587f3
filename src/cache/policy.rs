//! Eviction Policy Module
//!
//! Recency trackers backing the bounded cache provider. Two policies are
//! available: plain LRU and ARC (adaptive replacement).

use std::collections::VecDeque;
use std::fmt;

use crate::error::{CacheError, Result};

// == Eviction Tracker Contract ==
/// Bookkeeping interface the bounded cache drives on every access.
///
/// The tracker only tracks keys; the owning cache holds the entries and
/// removes whatever key `admit` reports as evicted.
pub trait EvictionTracker: Send + Sync + fmt::Debug {
    /// Records a read hit on a resident key.
    fn touch(&mut self, key: &str);

    /// Records an insert (or overwrite) of `key`.
    ///
    /// Returns the key evicted to make room, if the policy displaced one.
    /// At most one resident key is evicted per admit.
    fn admit(&mut self, key: &str) -> Option<String>;

    /// Forgets a key entirely (explicit delete or expiry removal).
    fn remove(&mut self, key: &str);

    /// Forgets everything.
    fn clear(&mut self);
}

/// Builds the tracker for a policy name; unknown names fail construction.
pub fn tracker_for(policy: &str, capacity: usize) -> Result<Box<dyn EvictionTracker>> {
    match policy {
        "lru" => Ok(Box::new(LruTracker::new(capacity))),
        "arc" => Ok(Box::new(ArcTracker::new(capacity))),
        other => Err(CacheError::Config(format!(
            "unsupported eviction policy: {other}"
        ))),
    }
}

// == LRU Tracker ==
/// Least-recently-used tracking over a recency queue.
///
/// Front = most recently used, back = eviction candidate.
#[derive(Debug)]
pub struct LruTracker {
    order: VecDeque<String>,
    capacity: usize,
}

impl LruTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            capacity,
        }
    }
}

impl EvictionTracker for LruTracker {
    fn touch(&mut self, key: &str) {
        remove_from(&mut self.order, key);
        self.order.push_front(key.to_string());
    }

    fn admit(&mut self, key: &str) -> Option<String> {
        self.touch(key);
        if self.order.len() > self.capacity {
            self.order.pop_back()
        } else {
            None
        }
    }

    fn remove(&mut self, key: &str) {
        remove_from(&mut self.order, key);
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

// == ARC Tracker ==
/// Adaptive replacement cache tracking (Megiddo & Modha).
///
/// Resident keys live in `t1` (seen once) or `t2` (seen at least twice);
/// `b1`/`b2` are ghost lists remembering recently evicted keys from each.
/// A ghost hit re-tunes the target size `p` of `t1`, letting the policy
/// adapt between recency- and frequency-biased behavior.
#[derive(Debug)]
pub struct ArcTracker {
    capacity: usize,
    /// Target size for t1
    p: usize,
    t1: VecDeque<String>,
    t2: VecDeque<String>,
    b1: VecDeque<String>,
    b2: VecDeque<String>,
}

impl ArcTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            p: 0,
            t1: VecDeque::new(),
            t2: VecDeque::new(),
            b1: VecDeque::new(),
            b2: VecDeque::new(),
        }
    }

    fn resident(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Demotes one resident key to the appropriate ghost list and returns
    /// it for eviction. `ghost_b2_hit` biases the choice per the ARC
    /// REPLACE rule.
    fn replace(&mut self, ghost_b2_hit: bool) -> Option<String> {
        if self.resident() < self.capacity {
            return None;
        }
        let from_t1 = !self.t1.is_empty()
            && (self.t1.len() > self.p || (ghost_b2_hit && self.t1.len() == self.p));
        if from_t1 {
            let victim = self.t1.pop_back()?;
            self.b1.push_front(victim.clone());
            Some(victim)
        } else {
            let victim = self.t2.pop_back()?;
            self.b2.push_front(victim.clone());
            Some(victim)
        }
    }
}

impl EvictionTracker for ArcTracker {
    fn touch(&mut self, key: &str) {
        // A second access promotes the key to the frequency list.
        if remove_from(&mut self.t1, key) || remove_from(&mut self.t2, key) {
            self.t2.push_front(key.to_string());
        }
    }

    fn admit(&mut self, key: &str) -> Option<String> {
        // Overwrite of a resident key counts as a hit.
        if contains(&self.t1, key) || contains(&self.t2, key) {
            self.touch(key);
            return None;
        }

        if remove_from(&mut self.b1, key) {
            // Ghost hit in b1: grow the recency side.
            let delta = (self.b2.len() / self.b1.len().max(1)).max(1);
            self.p = (self.p + delta).min(self.capacity);
            let evicted = self.replace(false);
            self.t2.push_front(key.to_string());
            return evicted;
        }

        if remove_from(&mut self.b2, key) {
            // Ghost hit in b2: grow the frequency side.
            let delta = (self.b1.len() / self.b2.len().max(1)).max(1);
            self.p = self.p.saturating_sub(delta);
            let evicted = self.replace(true);
            self.t2.push_front(key.to_string());
            return evicted;
        }

        // Brand new key.
        let evicted = if self.t1.len() + self.b1.len() == self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_back();
                self.replace(false)
            } else {
                // t1 fills the whole cache: evict its LRU outright.
                self.t1.pop_back()
            }
        } else if self.resident() + self.b1.len() + self.b2.len() >= self.capacity {
            if self.resident() + self.b1.len() + self.b2.len() >= 2 * self.capacity {
                self.b2.pop_back();
            }
            self.replace(false)
        } else {
            None
        };

        self.t1.push_front(key.to_string());
        evicted
    }

    fn remove(&mut self, key: &str) {
        let _ = remove_from(&mut self.t1, key)
            || remove_from(&mut self.t2, key)
            || remove_from(&mut self.b1, key)
            || remove_from(&mut self.b2, key);
    }

    fn clear(&mut self) {
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }
}

// == Helpers ==
/// Removes a key from a queue, reporting whether it was present.
fn remove_from(queue: &mut VecDeque<String>, key: &str) -> bool {
    if let Some(pos) = queue.iter().position(|k| k == key) {
        queue.remove(pos);
        true
    } else {
        false
    }
}

fn contains(queue: &VecDeque<String>, key: &str) -> bool {
    queue.iter().any(|k| k == key)
}
