//! Slice job orchestration.
//!
//! [`SliceEngine`] turns a region list (or the whole genome) into a
//! two-pass job:
//!
//! 1. **Scatter**: admitted regions are split into partition windows and
//!    sliced by [`RegionSlicer`](crate::RegionSlicer) workers on a bounded
//!    pool. Workers share the remote position registry and the writer;
//!    nothing else.
//! 2. **Gather**: once every worker has finished (the barrier), the
//!    registry is drained and
//!    [`RemoteResolver`](crate::RemoteResolver) pulls in the linked
//!    records from outside the requested regions.
//!
//! Output is complete (every overlapping and every resolved remote record
//! is written at least once) but carries no ordering or strict-uniqueness
//! guarantee.
//!
//! # Failure model
//!
//! A region with start past end or an unknown chromosome is skipped with
//! a warning and counted; the job continues. A source or sink failure is
//! fatal: the first failing worker raises the job abort flag, in-flight
//! siblings stop at their next record, nothing new is scheduled, and the
//! error surfaces from the run. Output written before the failure stands.

use crate::error::{Result, SliceError};
use crate::model::Region;
use crate::slice::cache::ReadCache;
use crate::slice::config::SliceConfig;
use crate::slice::region_slicer::{RegionOutcome, RegionSlicer};
use crate::slice::resolver::RemoteResolver;
use crate::slice::writer::{RecordSink, SliceWriter};
use crate::source::AlignmentSource;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::io;
use std::sync::atomic::AtomicBool;

/// Counters describing a finished slice job. Diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSummary {
    /// Regions passed in (or derived from the genome)
    pub regions_requested: usize,
    /// Regions admitted after validation
    pub regions_sliced: usize,
    /// Regions dropped at admission (malformed or unknown chromosome)
    pub regions_skipped: usize,
    /// Partition windows the admitted regions were split into
    pub partitions: usize,
    /// Partitions that hit the record budget and stopped early
    pub partitions_halted: u64,
    /// Overlapping records counted by the first pass
    pub records_processed: u64,
    /// Records written across both passes
    pub records_written: u64,
    /// Distinct remote positions registered by the first pass
    pub remote_positions: u64,
    /// Point lookups that found the linked record
    pub remote_hits: u64,
    /// Point lookups that found nothing (not an error)
    pub remote_misses: u64,
}

/// Orchestrator for partitioned two-pass slicing.
pub struct SliceEngine<'a, S: AlignmentSource> {
    source: &'a S,
    config: SliceConfig,
}

impl<'a, S: AlignmentSource> SliceEngine<'a, S> {
    pub fn new(source: &'a S, config: SliceConfig) -> Self {
        SliceEngine { source, config }
    }

    /// Slice the entire genome: one region per chromosome in the source,
    /// partitioned like any requested region.
    pub fn slice_genome<K: RecordSink>(&self, writer: &SliceWriter<K>) -> Result<SliceSummary> {
        let regions: Vec<Region> = self
            .source
            .chromosomes()
            .iter()
            .map(|c| Region::new(c.name.clone(), 1, c.length))
            .collect();
        self.slice_regions(&regions, writer)
    }

    /// Slice the requested regions.
    pub fn slice_regions<K: RecordSink>(
        &self,
        regions: &[Region],
        writer: &SliceWriter<K>,
    ) -> Result<SliceSummary> {
        let mut summary = SliceSummary {
            regions_requested: regions.len(),
            ..SliceSummary::default()
        };

        let (admitted, skipped) = self.admit_regions(regions);
        summary.regions_sliced = admitted.len();
        summary.regions_skipped = skipped;

        let partitions: Vec<Region> = admitted
            .iter()
            .flat_map(|r| r.partition(self.config.partition_size))
            .collect();
        summary.partitions = partitions.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .build()
            .map_err(|e| SliceError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?;

        log::info!(
            "slicing {} partitions ({} regions) on {} threads",
            partitions.len(),
            admitted.len(),
            pool.current_num_threads()
        );

        let cache = ReadCache::new();
        let abort = AtomicBool::new(false);

        let outcomes: Vec<RegionOutcome> = pool.install(|| {
            partitions
                .par_iter()
                .map(|region| {
                    RegionSlicer::new(
                        region.clone(),
                        self.source,
                        &cache,
                        writer,
                        &self.config,
                        &abort,
                    )
                    .slice()
                    .map_err(|e| {
                        abort.store(true, std::sync::atomic::Ordering::Relaxed);
                        e
                    })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        // Barrier passed: every worker is done, the registry is stable.
        for outcome in &outcomes {
            summary.records_processed += outcome.processed;
            summary.records_written += outcome.written;
            if outcome.halted {
                summary.partitions_halted += 1;
            }
        }
        summary.remote_positions = cache.registered();

        log::info!(
            "scatter pass complete: {} records written, {} remote positions registered",
            summary.records_written,
            summary.remote_positions
        );

        let lookups = cache.drain();
        let resolver = RemoteResolver::new(self.source, writer, &abort);
        let resolved = pool.install(|| resolver.resolve(&lookups))?;
        summary.remote_hits = resolved.hits;
        summary.remote_misses = resolved.misses;
        summary.records_written += resolved.written;

        log::info!(
            "slice complete: {} records written ({} resolved remotely), {} lookup misses",
            summary.records_written,
            resolved.written,
            summary.remote_misses
        );

        Ok(summary)
    }

    /// Validate regions against the source, skipping and logging the
    /// unusable ones. Starts below 1 are clamped rather than rejected.
    fn admit_regions(&self, regions: &[Region]) -> (Vec<Region>, usize) {
        let known: FxHashSet<&str> = self
            .source
            .chromosomes()
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        let mut admitted = Vec::with_capacity(regions.len());
        let mut skipped = 0;
        for region in regions {
            let start = region.start.max(1);
            if start > region.end {
                log::warn!("skipping malformed region {}: start is past end", region);
                skipped += 1;
                continue;
            }
            if !known.contains(region.chromosome.as_str()) {
                log::warn!(
                    "skipping region {}: chromosome not present in source",
                    region
                );
                skipped += 1;
                continue;
            }
            admitted.push(Region::new(region.chromosome.clone(), start, region.end));
        }
        (admitted, skipped)
    }
}
