//! Remote resolver: the gather pass.
//!
//! After the first pass has finished and the registry is drained, every
//! remote position is an independent lookup: fetch the registered read's
//! records at that coordinate and append them to the output. Lookups
//! share nothing but the source and the writer, so they run in parallel.
//! A position that yields no records is a miss, counted for diagnostics
//! and otherwise ignored: the linked record may have been filtered
//! upstream or may be unrecoverable.

use crate::error::Result;
use crate::slice::cache::RemoteLookup;
use crate::slice::writer::{RecordSink, SliceWriter};
use crate::source::AlignmentSource;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// What the resolution pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Point lookups issued (one per read id per position)
    pub lookups: u64,
    /// Lookups that returned at least one record
    pub hits: u64,
    /// Lookups that returned nothing
    pub misses: u64,
    /// Records written by this pass
    pub written: u64,
}

/// Second-pass resolver for drained remote positions.
pub struct RemoteResolver<'a, S: AlignmentSource, K: RecordSink> {
    source: &'a S,
    writer: &'a SliceWriter<K>,
    abort: &'a AtomicBool,
}

impl<'a, S: AlignmentSource, K: RecordSink> RemoteResolver<'a, S, K> {
    pub fn new(source: &'a S, writer: &'a SliceWriter<K>, abort: &'a AtomicBool) -> Self {
        RemoteResolver {
            source,
            writer,
            abort,
        }
    }

    /// Resolve every lookup, in parallel across positions.
    ///
    /// Must only run once the first pass has completed; the engine's
    /// barrier enforces that ordering.
    pub fn resolve(&self, lookups: &[RemoteLookup]) -> Result<ResolveOutcome> {
        let issued = AtomicU64::new(0);
        let hits = AtomicU64::new(0);
        let misses = AtomicU64::new(0);
        let written = AtomicU64::new(0);

        lookups.par_iter().try_for_each(|lookup| -> Result<()> {
            if self.abort.load(Ordering::Relaxed) {
                return Ok(());
            }
            for read_id in &lookup.read_ids {
                issued.fetch_add(1, Ordering::Relaxed);
                let records = self
                    .source
                    .find_read_at(&lookup.chromosome, lookup.position, read_id)
                    .map_err(|e| {
                        self.abort.store(true, Ordering::Relaxed);
                        e
                    })?;

                if records.is_empty() {
                    misses.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                hits.fetch_add(1, Ordering::Relaxed);
                for record in &records {
                    self.writer.write(record).map_err(|e| {
                        self.abort.store(true, Ordering::Relaxed);
                        e
                    })?;
                    written.fetch_add(1, Ordering::Relaxed);
                }
            }
            Ok(())
        })?;

        Ok(ResolveOutcome {
            lookups: issued.into_inner(),
            hits: hits.into_inner(),
            misses: misses.into_inner(),
            written: written.into_inner(),
        })
    }
}
