//! Genomic coordinate types.
//!
//! - [`GenomicInterval`]: a 0-based, half-open interval on one sequence
//! - [`Strand`]: feature orientation as written in GFF3 column 7
//!
//! GFF3 itself uses 1-based inclusive coordinates; records convert with
//! [`crate::formats::gff::Gff3Record::interval`].
//!
//! ```
//! use gffload::formats::primitives::GenomicInterval;
//!
//! let a = GenomicInterval::new("chr1".to_string(), 100, 200)?;
//! assert_eq!(a.length(), 100);
//! assert_eq!(a.to_string(), "chr1:100-200");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::formats::primitives::{FormatError, Result};
use std::fmt;
use std::str::FromStr;

/// A genomic interval with sequence id and coordinates.
///
/// Coordinates are **0-based, half-open** `[start, end)`; `start < end` is
/// enforced by [`GenomicInterval::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    /// Sequence (chromosome, contig) identifier.
    pub chrom: String,

    /// Start position (0-based, inclusive).
    pub start: u64,

    /// End position (0-based, exclusive).
    pub end: u64,
}

impl GenomicInterval {
    /// Creates a new genomic interval.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidInterval`] if `start >= end`.
    pub fn new(chrom: String, start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(FormatError::InvalidInterval { start, end });
        }

        Ok(GenomicInterval { chrom, start, end })
    }

    /// Returns the length of this interval.
    #[inline]
    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Feature strand.
///
/// GFF3 distinguishes a feature that is not stranded (`.`) from one whose
/// strand is relevant but unknown (`?`).
///
/// ```
/// use gffload::formats::primitives::Strand;
/// use std::str::FromStr;
///
/// assert_eq!(Strand::from_str("+")?, Strand::Forward);
/// assert_eq!(Strand::from_str("-")?, Strand::Reverse);
/// assert_eq!(Strand::from_str(".")?, Strand::Unstranded);
/// assert_eq!(Strand::from_str("?")?, Strand::Unknown);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    /// Plus strand (+)
    Forward,

    /// Minus strand (-)
    Reverse,

    /// Not stranded (.)
    Unstranded,

    /// Stranded, orientation unknown (?)
    Unknown,
}

impl Strand {
    /// The GFF3 column-7 symbol for this strand.
    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
            Strand::Unknown => "?",
        }
    }
}

impl FromStr for Strand {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." => Ok(Strand::Unstranded),
            "?" => Ok(Strand::Unknown),
            _ => Err(FormatError::InvalidStrand(s.to_string())),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
