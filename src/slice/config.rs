//! Slice job configuration.
//!
//! Consumed by the engine, produced elsewhere: command-line parsing and
//! file-based configuration belong to the surrounding tool.

/// Default partition window (bases). Sized to bound per-partition memory
/// and time; a tunable, not a correctness requirement.
pub const DEFAULT_PARTITION_SIZE: i64 = 1_000_000;

/// Default read-length tolerance buffer (bases) used when deciding
/// whether a linked mate or supplementary alignment lies inside a region.
pub const DEFAULT_READ_LENGTH_BUFFER: i64 = 151;

/// Configuration consumed by [`SliceEngine`](crate::SliceEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceConfig {
    /// Maximum bases per partition; admitted regions are split into
    /// windows of at most this size. 0 disables splitting.
    pub partition_size: i64,

    /// Per-partition record budget: a partition stops consuming its
    /// stream after this many overlapping records. 0 means unlimited.
    /// Hitting the budget is a deliberate throughput/completeness
    /// trade-off, not an error.
    pub max_partition_reads: u64,

    /// Read-length tolerance buffer applied to the lower bound of the
    /// inside-region test for linked mates and supplementary alignments.
    pub read_length_buffer: i64,

    /// Worker pool size for both passes. 0 uses the available
    /// parallelism.
    pub worker_threads: usize,
}

impl Default for SliceConfig {
    fn default() -> Self {
        SliceConfig {
            partition_size: DEFAULT_PARTITION_SIZE,
            max_partition_reads: 0,
            read_length_buffer: DEFAULT_READ_LENGTH_BUFFER,
            worker_threads: 0,
        }
    }
}
