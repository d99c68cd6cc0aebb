//! Genomic region value type.
//!
//! A [`Region`] is a contiguous interval on one chromosome, 1-based and
//! inclusive on both ends (the `samtools` convention). Regions carry the
//! two predicates the slicing engine is built on:
//!
//! - [`Region::overlaps_record`]: the exact, closed-interval overlap test
//!   used to decide whether a record is kept.
//! - [`Region::contains_with_buffer`]: the tolerance test used to decide
//!   whether a linked mate or supplementary alignment counts as "inside"
//!   this region. The tolerance is asymmetric: the buffer widens the lower
//!   bound only, because a linked record's start coordinate can precede the
//!   region boundary by up to one read length while the alignment itself
//!   still belongs to the region. The upper bound is taken as-is.
//!
//! # Examples
//!
//! ```
//! use bamslice::Region;
//!
//! # fn main() -> bamslice::Result<()> {
//! let region = Region::parse("chr1:1,000-2,000")?;
//! assert_eq!(region.chromosome, "chr1");
//! assert_eq!(region.start, 1000);
//! assert_eq!(region.end, 2000);
//! assert_eq!(region.length(), 1001);
//!
//! // Buffer applies below the region only
//! assert!(region.contains_with_buffer("chr1", 950, 100));
//! assert!(!region.contains_with_buffer("chr1", 2050, 100));
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SliceError};
use crate::model::record::AlignmentRecord;
use std::fmt;

/// A contiguous genomic interval on one chromosome.
///
/// Coordinates are 1-based and inclusive on both ends. `start <= end` is
/// expected; construction does not enforce it (callers may hold raw user
/// input), admission into a slice job does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// Chromosome (reference sequence) name
    pub chromosome: String,
    /// First base of the interval (1-based, inclusive)
    pub start: i64,
    /// Last base of the interval (inclusive)
    pub end: i64,
}

impl Region {
    /// Create a region from raw parts.
    pub fn new<C: Into<String>>(chromosome: C, start: i64, end: i64) -> Self {
        Region {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Parse a `chrom:start-end` region string.
    ///
    /// Thousands separators in the coordinates are tolerated
    /// (`chr1:1,000-2,000`). The chromosome name is everything before the
    /// last `:`, so contig names containing colons are handled.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::MalformedRegion`] if the string is not of the
    /// form `chrom:start-end`, a coordinate does not parse, or start is
    /// past end.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = |reason: &str| SliceError::MalformedRegion {
            region: s.to_string(),
            reason: reason.to_string(),
        };

        let (chromosome, coords) = s
            .rsplit_once(':')
            .ok_or_else(|| malformed("expected 'chrom:start-end'"))?;
        if chromosome.is_empty() {
            return Err(malformed("empty chromosome name"));
        }

        let (start_text, end_text) = coords
            .split_once('-')
            .ok_or_else(|| malformed("expected 'start-end' coordinates"))?;

        let parse_coord = |text: &str| -> Result<i64> {
            text.replace(',', "")
                .parse::<i64>()
                .map_err(|_| malformed(&format!("invalid coordinate '{}'", text)))
        };

        let start = parse_coord(start_text)?;
        let end = parse_coord(end_text)?;
        if start < 1 {
            return Err(malformed("start must be >= 1"));
        }
        if start > end {
            return Err(malformed("start is past end"));
        }

        Ok(Region::new(chromosome, start, end))
    }

    /// Number of bases covered (inclusive of both ends).
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Closed-interval overlap with an arbitrary interval on a chromosome.
    pub fn overlaps(&self, chromosome: &str, start: i64, end: i64) -> bool {
        chromosome == self.chromosome && start <= self.end && end >= self.start
    }

    /// Does an alignment record overlap this region?
    ///
    /// Boundary-exact on both ends: a record ending on `start` or starting
    /// on `end` overlaps; one base further out does not.
    pub fn overlaps_record(&self, record: &AlignmentRecord) -> bool {
        self.overlaps(&record.chromosome, record.start, record.end)
    }

    /// Is `position` inside this region, widened downward by `buffer`?
    ///
    /// The test is `position >= start - buffer && position <= end` on a
    /// matching chromosome. The buffer is applied on the lower bound only:
    /// a mate whose start precedes the region by less than one read length
    /// still overlaps the region with its body, while past the upper bound
    /// the start coordinate alone decides.
    pub fn contains_with_buffer(&self, chromosome: &str, position: i64, buffer: i64) -> bool {
        chromosome == self.chromosome
            && position >= self.start - buffer
            && position <= self.end
    }

    /// Split this region into consecutive windows of at most `window` bases.
    ///
    /// The windows tile the region exactly: every base appears in exactly
    /// one window and the last window is clipped to `end`. A `window` of
    /// zero (or less) disables splitting and returns the region unchanged.
    pub fn partition(&self, window: i64) -> Vec<Region> {
        if window <= 0 || self.length() <= window {
            return vec![self.clone()];
        }
        let mut windows = Vec::with_capacity((self.length() / window + 1) as usize);
        let mut lo = self.start;
        while lo <= self.end {
            let hi = (lo + window - 1).min(self.end);
            windows.push(Region::new(self.chromosome.clone(), lo, hi));
            lo = hi + 1;
        }
        windows
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}
