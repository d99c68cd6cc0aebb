//! Two-pass partitioned slicing: scatter workers, shared registry,
//! concurrent sink, gather resolver, and the engine that sequences them.

pub mod cache;
pub mod config;
pub mod engine;
pub mod region_slicer;
pub mod resolver;
pub mod writer;

pub use cache::{ReadCache, RemoteLookup, RemotePosition};
pub use config::{SliceConfig, DEFAULT_PARTITION_SIZE, DEFAULT_READ_LENGTH_BUFFER};
pub use engine::{SliceEngine, SliceSummary};
pub use region_slicer::{RegionOutcome, RegionSlicer};
pub use resolver::{RemoteResolver, ResolveOutcome};
pub use writer::{RecordBuffer, RecordSink, SliceWriter};
