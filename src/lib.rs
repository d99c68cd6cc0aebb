//! Partitioned genomic-region slicing engine.
//!
//! Given an indexed, coordinate-sorted alignment collection and a set of
//! regions of interest, `bamslice` extracts every record overlapping
//! those regions plus every linked record (the mate of a pair or a
//! supplementary alignment) that lives outside them. It does this in
//! two passes: a scatter pass slices regions in parallel on a bounded
//! worker pool while noting the positions of linked records it cannot
//! reach, and a gather pass resolves each noted position with a targeted
//! lookup.
//!
//! The alignment format itself stays outside the crate: records arrive
//! through the [`AlignmentSource`] trait and leave through a
//! [`RecordSink`]. Output is complete (every overlapping and every
//! resolved remote record is written at least once) but carries no
//! ordering or strict-uniqueness guarantee.
//!
//! # Example
//!
//! ```
//! use bamslice::{
//!     AlignmentRecord, MemorySource, RecordBuffer, Region, SliceConfig, SliceEngine,
//!     SliceWriter,
//! };
//!
//! # fn main() -> bamslice::Result<()> {
//! let mut source = MemorySource::new();
//! source.add_chromosome("1", 10_000);
//! source.add_record(AlignmentRecord::new("r1", "1", 500, 650));
//!
//! let writer = SliceWriter::new(RecordBuffer::new());
//! let engine = SliceEngine::new(&source, SliceConfig::default());
//! let summary = engine.slice_regions(&[Region::parse("1:1-1000")?], &writer)?;
//!
//! assert_eq!(summary.records_written, 1);
//! assert_eq!(writer.into_inner().records()[0].read_id, "r1");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod slice;
pub mod source;

pub use error::{Result, SliceError};
pub use model::{AlignmentRecord, Region, SupplementaryAlignment};
pub use slice::{
    ReadCache, RecordBuffer, RecordSink, RegionOutcome, RegionSlicer, RemoteLookup,
    RemotePosition, RemoteResolver, ResolveOutcome, SliceConfig, SliceEngine, SliceSummary,
    SliceWriter,
};
pub use source::{AlignmentSource, Chromosome, MemorySource, RecordStream};
