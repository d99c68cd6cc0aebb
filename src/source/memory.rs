//! In-memory alignment source.
//!
//! [`MemorySource`] keeps records in per-chromosome vectors sorted by
//! start coordinate and answers both query primitives by scanning them.
//! It backs the crate's tests and is adequate for small in-process
//! datasets; indexed file formats belong behind their own
//! [`AlignmentSource`] implementations.
//!
//! The source counts how many region and point queries it has answered,
//! which lets callers (and tests) confirm, for example, that a job with
//! no cross-region links performs zero second-pass lookups.

use crate::error::Result;
use crate::model::{AlignmentRecord, Region};
use crate::source::{AlignmentSource, Chromosome, RecordStream};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Alignment source holding all records in memory.
#[derive(Debug, Default)]
pub struct MemorySource {
    chromosomes: Vec<Chromosome>,
    records: FxHashMap<String, Vec<AlignmentRecord>>,
    region_queries: AtomicU64,
    point_queries: AtomicU64,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Declare a reference sequence. Order of declaration is header order.
    pub fn add_chromosome<N: Into<String>>(&mut self, name: N, length: i64) {
        self.chromosomes.push(Chromosome::new(name, length));
    }

    /// Add a record, keeping its chromosome's records sorted by start.
    pub fn add_record(&mut self, record: AlignmentRecord) {
        let records = self.records.entry(record.chromosome.clone()).or_default();
        let at = records.partition_point(|r| r.start <= record.start);
        records.insert(at, record);
    }

    /// Number of region queries answered so far.
    pub fn region_queries(&self) -> u64 {
        self.region_queries.load(Ordering::Relaxed)
    }

    /// Number of point (read-at-position) queries answered so far.
    pub fn point_queries(&self) -> u64 {
        self.point_queries.load(Ordering::Relaxed)
    }
}

impl AlignmentSource for MemorySource {
    fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    fn query_region(&self, region: &Region) -> Result<RecordStream<'_>> {
        self.region_queries.fetch_add(1, Ordering::Relaxed);
        let (start, end) = (region.start, region.end);
        let records = self.records.get(&region.chromosome);
        Ok(Box::new(
            records
                .into_iter()
                .flatten()
                .filter(move |r| r.start <= end && r.end >= start)
                .cloned()
                .map(Ok),
        ))
    }

    fn find_read_at(
        &self,
        chromosome: &str,
        position: i64,
        read_id: &str,
    ) -> Result<Vec<AlignmentRecord>> {
        self.point_queries.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .records
            .get(chromosome)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.start == position && r.read_id == read_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
