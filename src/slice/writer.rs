//! Output sink for sliced records.
//!
//! [`SliceWriter`] makes a single-threaded [`RecordSink`] safe for the
//! engine's concurrent writers: every region worker in the first pass and
//! every resolver task in the second pass writes through the same
//! `SliceWriter`. A mutex serializes the underlying sink; an atomic
//! counter tracks how many records went through.
//!
//! The writer makes no ordering guarantee and performs no deduplication
//! across passes: a record emitted in the first pass can legitimately be
//! emitted again by the resolver when it independently satisfies a remote
//! lookup. Consumers needing strict uniqueness deduplicate by read id
//! downstream.

use crate::error::{Result, SliceError};
use crate::model::AlignmentRecord;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Destination for extracted records.
///
/// Implemented by the external alignment writer; [`RecordBuffer`] is the
/// in-memory implementation used in tests and small in-process jobs.
pub trait RecordSink: Send {
    fn write_record(&mut self, record: &AlignmentRecord) -> io::Result<()>;
}

/// Concurrency-safe wrapper around a [`RecordSink`].
#[derive(Debug)]
pub struct SliceWriter<K: RecordSink> {
    sink: Mutex<K>,
    written: AtomicU64,
}

impl<K: RecordSink> SliceWriter<K> {
    pub fn new(sink: K) -> Self {
        SliceWriter {
            sink: Mutex::new(sink),
            written: AtomicU64::new(0),
        }
    }

    /// Append one record to the output.
    ///
    /// # Errors
    ///
    /// A sink failure surfaces as [`SliceError::Write`] and is fatal to
    /// the job: partial output is unreliable for downstream consumers.
    pub fn write(&self, record: &AlignmentRecord) -> Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        sink.write_record(record).map_err(SliceError::Write)?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Records written through this writer so far.
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Unwrap the underlying sink once slicing is done.
    pub fn into_inner(self) -> K {
        self.sink.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// In-memory sink collecting records into a vector.
///
/// # Example
///
/// ```
/// use bamslice::{AlignmentRecord, RecordBuffer, SliceWriter};
///
/// let writer = SliceWriter::new(RecordBuffer::new());
/// writer.write(&AlignmentRecord::new("r1", "1", 100, 200)).unwrap();
/// assert_eq!(writer.written(), 1);
///
/// let buffer = writer.into_inner();
/// assert_eq!(buffer.records()[0].read_id, "r1");
/// ```
#[derive(Debug, Default)]
pub struct RecordBuffer {
    records: Vec<AlignmentRecord>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        RecordBuffer::default()
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AlignmentRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSink for RecordBuffer {
    fn write_record(&mut self, record: &AlignmentRecord) -> io::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
