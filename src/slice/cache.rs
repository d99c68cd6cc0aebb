//! Remote position registry.
//!
//! While a worker slices its region it will meet records whose mate or
//! supplementary alignment lives somewhere else in the genome. Those
//! linked records must end up in the output too, but the worker that sees
//! the link is rarely the one whose region covers it, and with a
//! restricted region list, no worker's region may cover it at all. The
//! [`ReadCache`] collects these forward references during the first pass;
//! after every worker has finished, the engine drains it and the second
//! pass resolves each position with a targeted lookup.
//!
//! Registration is idempotent: the identity of a [`RemotePosition`] is the
//! full (read id, chromosome, position) triple, and registering the same
//! triple from any number of threads produces a single entry.
//!
//! # Example
//!
//! ```
//! use bamslice::{ReadCache, RemotePosition};
//!
//! let cache = ReadCache::new();
//! cache.register(RemotePosition::new("read1", "2", 500));
//! cache.register(RemotePosition::new("read1", "2", 500)); // duplicate
//! cache.register(RemotePosition::new("read2", "2", 500));
//!
//! assert_eq!(cache.registered(), 2);
//! let lookups = cache.drain();
//! assert_eq!(lookups.len(), 1); // one position on chromosome 2
//! assert_eq!(lookups[0].read_ids, vec!["read1", "read2"]);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A forward reference from a kept record to a linked record elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePosition {
    /// Name of the read whose linked record lives at the position
    pub read_id: String,
    /// Chromosome of the linked record
    pub chromosome: String,
    /// Start position of the linked record (1-based)
    pub position: i64,
}

impl RemotePosition {
    pub fn new<R, C>(read_id: R, chromosome: C, position: i64) -> Self
    where
        R: Into<String>,
        C: Into<String>,
    {
        RemotePosition {
            read_id: read_id.into(),
            chromosome: chromosome.into(),
            position,
        }
    }
}

/// One drained position: every read registered at one coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLookup {
    pub chromosome: String,
    pub position: i64,
    /// Read names registered at this position, sorted
    pub read_ids: Vec<String>,
}

/// chromosome -> position -> read ids; BTreeMap keeps positions ordered
/// so a drain walks each chromosome sequentially.
type PositionMap = FxHashMap<String, BTreeMap<i64, FxHashSet<String>>>;

/// Thread-safe registry of remote positions awaiting resolution.
///
/// Many workers register concurrently during the first pass; the engine
/// drains once, after the pass-one barrier.
#[derive(Debug, Default)]
pub struct ReadCache {
    positions: Mutex<PositionMap>,
    registered: AtomicU64,
}

impl ReadCache {
    pub fn new() -> Self {
        ReadCache::default()
    }

    fn lock(&self) -> MutexGuard<'_, PositionMap> {
        // A worker can only poison this lock by panicking mid-insert;
        // the map itself is still structurally sound, so keep going.
        self.positions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a remote position. Idempotent: re-registering an already
    /// known (read id, chromosome, position) triple changes nothing.
    pub fn register(&self, remote: RemotePosition) {
        let mut positions = self.lock();
        let inserted = positions
            .entry(remote.chromosome)
            .or_default()
            .entry(remote.position)
            .or_default()
            .insert(remote.read_id);
        if inserted {
            self.registered.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of distinct triples registered so far.
    pub fn registered(&self) -> u64 {
        self.registered.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.registered() == 0
    }

    /// Take every registered position, grouped by chromosome in position
    /// order, leaving the registry empty.
    ///
    /// Callers must only drain after every registering worker has
    /// finished; the engine's pass-one barrier guarantees this.
    pub fn drain(&self) -> Vec<RemoteLookup> {
        let positions = std::mem::take(&mut *self.lock());
        self.registered.store(0, Ordering::Relaxed);

        let mut by_chromosome: Vec<_> = positions.into_iter().collect();
        by_chromosome.sort_by(|a, b| a.0.cmp(&b.0));

        let mut lookups = Vec::new();
        for (chromosome, by_position) in by_chromosome {
            for (position, read_ids) in by_position {
                let mut read_ids: Vec<String> = read_ids.into_iter().collect();
                read_ids.sort();
                lookups.push(RemoteLookup {
                    chromosome: chromosome.clone(),
                    position,
                    read_ids,
                });
            }
        }
        lookups
    }
}
