//! Region worker: slices one region of the genome.
//!
//! A [`RegionSlicer`] owns exactly one region. It streams the records the
//! source reports as overlapping, re-verifies the overlap itself, emits
//! every match to the shared writer, and registers a
//! [`RemotePosition`](crate::RemotePosition) for each linked mate or
//! supplementary alignment that falls outside the region's tolerance
//! window. The worker's only shared state is the registry, the writer,
//! and the job abort flag; its counters are local.

use crate::error::Result;
use crate::model::Region;
use crate::slice::cache::{ReadCache, RemotePosition};
use crate::slice::config::SliceConfig;
use crate::slice::writer::{RecordSink, SliceWriter};
use crate::source::AlignmentSource;
use std::sync::atomic::{AtomicBool, Ordering};

/// What one region worker did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionOutcome {
    /// Overlapping records counted against the partition budget
    pub processed: u64,
    /// Records emitted to the writer
    pub written: u64,
    /// Remote positions registered for later resolution
    pub registered: u64,
    /// True when the partition budget cut processing short
    pub halted: bool,
}

/// Worker that slices a single region.
pub struct RegionSlicer<'a, S: AlignmentSource, K: RecordSink> {
    region: Region,
    source: &'a S,
    cache: &'a ReadCache,
    writer: &'a SliceWriter<K>,
    max_reads: u64,
    read_length_buffer: i64,
    abort: &'a AtomicBool,
}

impl<'a, S: AlignmentSource, K: RecordSink> RegionSlicer<'a, S, K> {
    pub fn new(
        region: Region,
        source: &'a S,
        cache: &'a ReadCache,
        writer: &'a SliceWriter<K>,
        config: &SliceConfig,
        abort: &'a AtomicBool,
    ) -> Self {
        RegionSlicer {
            region,
            source,
            cache,
            writer,
            max_reads: config.max_partition_reads,
            read_length_buffer: config.read_length_buffer,
            abort,
        }
    }

    /// Slice the region: stream, filter, emit, register.
    ///
    /// Stops early without error when the partition budget is exceeded
    /// (remaining records in the stream are dropped) or when the job
    /// abort flag is raised by a failing sibling. Source and writer
    /// failures are fatal and propagate.
    pub fn slice(self) -> Result<RegionOutcome> {
        let mut outcome = RegionOutcome::default();
        let stream = self.source.query_region(&self.region)?;

        for next in stream {
            if self.abort.load(Ordering::Relaxed) {
                break;
            }
            let record = next?;

            // The source already filters by region; re-verify anyway so an
            // over-fetching reader cannot leak records into the output.
            if !self.region.overlaps_record(&record) {
                continue;
            }

            outcome.processed += 1;
            if self.max_reads > 0 && outcome.processed > self.max_reads {
                log::debug!(
                    "region {}: record budget {} exceeded, halting",
                    self.region,
                    self.max_reads
                );
                outcome.halted = true;
                break;
            }

            // It overlaps, so it is kept, unconditionally.
            self.writer.write(&record)?;
            outcome.written += 1;

            // Mate outside the tolerance window: remember where to find it.
            if record.is_paired() && !record.is_mate_unmapped() {
                if let Some((mate_chromosome, mate_start)) = record.mate() {
                    if !self.region.contains_with_buffer(
                        mate_chromosome,
                        mate_start,
                        self.read_length_buffer,
                    ) {
                        self.cache.register(RemotePosition::new(
                            record.read_id.clone(),
                            mate_chromosome,
                            mate_start,
                        ));
                        outcome.registered += 1;
                    }
                }
            }

            // Same rule for a supplementary alignment.
            if let Some(supplementary) = &record.supplementary {
                if !self.region.contains_with_buffer(
                    &supplementary.chromosome,
                    supplementary.position,
                    self.read_length_buffer,
                ) {
                    self.cache.register(RemotePosition::new(
                        record.read_id.clone(),
                        supplementary.chromosome.clone(),
                        supplementary.position,
                    ));
                    outcome.registered += 1;
                }
            }
        }

        Ok(outcome)
    }
}
