//! Alignment source abstraction.
//!
//! The slicing engine never touches an alignment file directly; it talks
//! to an [`AlignmentSource`], the seam behind which the format reader
//! (BAM, CRAM, anything with a coordinate index) lives. A source must
//! answer two kinds of random-access question:
//!
//! - stream every record overlapping a region ([`AlignmentSource::query_region`]),
//!   including unmapped records whose placement anchors them inside it;
//! - fetch the records of one named read anchored at one coordinate
//!   ([`AlignmentSource::find_read_at`]), the targeted lookup the second
//!   pass uses to pull in mates and supplementary alignments.
//!
//! Sources are shared by every worker in a job, so implementations must
//! be `Sync`; file-backed implementations are expected to open a
//! per-query cursor rather than share a seek position.

pub mod memory;

pub use memory::MemorySource;

use crate::error::Result;
use crate::model::{AlignmentRecord, Region};

/// One reference sequence known to a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    /// Reference sequence name
    pub name: String,
    /// Length in bases
    pub length: i64,
}

impl Chromosome {
    pub fn new<N: Into<String>>(name: N, length: i64) -> Self {
        Chromosome {
            name: name.into(),
            length,
        }
    }
}

/// Streaming iterator of records returned by a region query.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<AlignmentRecord>> + 'a>;

/// Random access into an indexed, coordinate-sorted alignment collection.
pub trait AlignmentSource: Sync {
    /// Reference sequences in the source, in header order. Used for
    /// genome-wide partitioning and for rejecting regions on unknown
    /// chromosomes.
    fn chromosomes(&self) -> &[Chromosome];

    /// Stream every record overlapping `region`, in no guaranteed order.
    ///
    /// # Errors
    ///
    /// A source that cannot be opened or seeked returns
    /// [`SliceError::SourceUnavailable`](crate::SliceError::SourceUnavailable),
    /// which aborts the whole slice job.
    fn query_region(&self, region: &Region) -> Result<RecordStream<'_>>;

    /// Fetch the records of read `read_id` anchored at `position` on
    /// `chromosome`. Zero results is not an error; the linked record may
    /// be genuinely absent.
    fn find_read_at(
        &self,
        chromosome: &str,
        position: i64,
        read_id: &str,
    ) -> Result<Vec<AlignmentRecord>>;
}
