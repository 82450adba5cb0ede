//! GFF3 (Generic Feature Format version 3) parser.
//!
//! GFF3 describes genomic features one per line in 9 tab-delimited columns:
//! 1. **seqid**: Reference sequence identifier
//! 2. **source**: Program or database that produced the feature
//! 3. **type**: Feature type (gene, mRNA, exon, ...)
//! 4. **start**: Start position (1-based, inclusive)
//! 5. **end**: End position (1-based, inclusive)
//! 6. **score**: Floating point score (or `.`)
//! 7. **strand**: `+`, `-`, `.` (unstranded) or `?` (unknown)
//! 8. **phase**: CDS phase `0`, `1`, `2` (or `.`)
//! 9. **attributes**: `key=value` groups separated by `;`, values separated by `,`
//!
//! Attribute keys and values are percent-decoded (see
//! [`crate::formats::primitives::escape`]); no other column is.
//!
//! Only single-line records are handled here. Parent/child hierarchies and
//! `##FASTA` sections are left to the caller.
//!
//! # Examples
//!
//! ```
//! use gffload::formats::gff::Gff3Record;
//! use gffload::formats::primitives::Strand;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record: Gff3Record = "chr1\t.\tgene\t100\t500\t.\t+\t.\tID=gene1;Name=abc,def".parse()?;
//!
//! assert_eq!(record.seqid, "chr1");
//! assert_eq!(record.feature_type, "gene");
//! assert_eq!(record.strand, Strand::Forward);
//! assert_eq!(record.id(), Some("gene1"));
//! assert_eq!(record.attributes.values("Name"), vec!["abc", "def"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming
//!
//! ```no_run
//! use gffload::formats::gff::Gff3Stream;
//!
//! # fn main() -> gffload::Result<()> {
//! let mut stream = Gff3Stream::from_path("annotation.gff3.gz")?;
//! while stream.has_next() {
//!     let record = stream.next_record()?;
//!     println!("{} {}:{}-{}", record.feature_type, record.seqid, record.start, record.end);
//! }
//! # Ok(())
//! # }
//! ```

use crate::formats::primitives::{
    escape,
    fields::{parse_optional, parse_required, split_fields, MISSING},
    FormatError, GenomicInterval, RecordStream, Result, Strand, TabDelimitedRecord,
};
use indexmap::{IndexMap, IndexSet};
use std::str::FromStr;

/// Number of columns in a GFF3 feature line.
pub const GFF3_FIELDS: usize = 9;

/// Streaming GFF3 reader with one-line lookahead.
pub type Gff3Stream<R> = RecordStream<R, Gff3Record>;

/// Column 9 of a GFF3 line.
///
/// Keys keep their order of first appearance; each key maps to an ordered
/// set of values. Lookup ignores order, and so does equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    inner: IndexMap<String, IndexSet<String>>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under `key`, creating the key if needed.
    ///
    /// Values already present under the key are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .entry(key.into())
            .or_default()
            .insert(value.into());
    }

    /// All values for `key`, in order.
    pub fn get(&self, key: &str) -> Option<&IndexSet<String>> {
        self.inner.get(key)
    }

    /// The first value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(|s| s.as_str())
    }

    /// Values for `key` as string slices (empty if the key is absent).
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.inner
            .get(key)
            .map(|values| values.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Iterates over keys and their value sets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Parses column 9.
    ///
    /// `.` and the empty string yield no attributes; empty groups (e.g. a
    /// trailing `;`) are skipped. Splitting happens before decoding, so
    /// escaped `;`, `=` and `,` never split anything.
    pub fn parse(column: &str) -> Result<Self> {
        let mut attributes = Attributes::new();

        if column == MISSING || column.trim().is_empty() {
            return Ok(attributes);
        }

        for group in column.split(';') {
            let group = group.trim();
            if group.is_empty() {
                continue;
            }

            let (key, value) = group
                .split_once('=')
                .ok_or_else(|| FormatError::InvalidAttribute(group.to_string()))?;
            let key = escape::decode(key.trim());
            if key.is_empty() {
                return Err(FormatError::InvalidAttribute(group.to_string()));
            }

            let entry = attributes.inner.entry(key.into_owned()).or_default();
            for v in value.split(',').filter(|v| !v.is_empty()) {
                entry.insert(escape::decode(v).into_owned());
            }
        }

        Ok(attributes)
    }

    /// Renders column 9, escaping reserved characters.
    pub fn to_column(&self) -> String {
        if self.inner.is_empty() {
            return MISSING.to_string();
        }

        self.inner
            .iter()
            .map(|(key, values)| {
                let joined = values
                    .iter()
                    .map(|v| escape::encode(v))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}={}", escape::encode(key), joined)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

/// One GFF3 feature line.
///
/// `start <= end` is expected but not enforced: input files do not always
/// respect it, and [`crate::convert::location::make_location`] normalizes
/// the order when positions are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Gff3Record {
    /// Reference sequence identifier
    pub seqid: String,
    /// Source of the feature
    pub source: String,
    /// Feature type (gene, mRNA, exon, CDS, ...)
    pub feature_type: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Score (None if `.`)
    pub score: Option<f64>,
    /// Strand
    pub strand: Strand,
    /// CDS phase (0, 1, 2, or None if `.`)
    pub phase: Option<u8>,
    /// Column 9
    pub attributes: Attributes,
}

impl Gff3Record {
    /// The `ID` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attributes.first("ID")
    }

    /// The `Name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.first("Name")
    }

    /// All `Parent` identifiers.
    pub fn parents(&self) -> Vec<&str> {
        self.attributes.values("Parent")
    }

    /// First value of an arbitrary attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.first(key)
    }

    /// Feature length in base pairs, regardless of coordinate order.
    ///
    /// ```
    /// use gffload::formats::gff::Gff3Record;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let record: Gff3Record = "chr1\t.\texon\t1000\t2000\t.\t+\t.\t.".parse()?;
    /// assert_eq!(record.length(), 1001);
    /// # Ok(())
    /// # }
    /// ```
    pub fn length(&self) -> u64 {
        self.start.abs_diff(self.end) + 1
    }

    /// Genomic interval in 0-based half-open coordinates `[start, end)`.
    pub fn interval(&self) -> Result<GenomicInterval> {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        GenomicInterval::new(self.seqid.clone(), lo.saturating_sub(1), hi)
    }
}

fn parse_position(value: &str, field: &str) -> Result<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidField {
            field: field.to_string(),
            reason: format!("'{}' (must be a non-negative integer)", value),
        });
    }
    parse_required(value, field)
}

fn parse_score(value: &str) -> Result<Option<f64>> {
    match parse_optional::<f64>(value, "score")? {
        Some(score) if !score.is_finite() => Err(FormatError::InvalidField {
            field: "score".to_string(),
            reason: format!("'{}' (must be a finite number)", value),
        }),
        score => Ok(score),
    }
}

fn parse_phase(value: &str) -> Result<Option<u8>> {
    match value {
        MISSING => Ok(None),
        "0" => Ok(Some(0)),
        "1" => Ok(Some(1)),
        "2" => Ok(Some(2)),
        _ => Err(FormatError::InvalidField {
            field: "phase".to_string(),
            reason: format!("'{}' (must be 0, 1, 2 or '.')", value),
        }),
    }
}

impl TabDelimitedRecord for Gff3Record {
    fn from_line(line: &str) -> Result<Self> {
        let fields = split_fields(line, Some(GFF3_FIELDS))?;

        let start = parse_position(fields[3], "start")?;
        let end = parse_position(fields[4], "end")?;
        let score = parse_score(fields[5])?;
        let strand = Strand::from_str(fields[6])?;
        let phase = parse_phase(fields[7])?;
        let attributes = Attributes::parse(fields[8])?;

        Ok(Gff3Record {
            seqid: fields[0].to_string(),
            source: fields[1].to_string(),
            feature_type: fields[2].to_string(),
            start,
            end,
            score,
            strand,
            phase,
            attributes,
        })
    }

    fn to_line(&self) -> String {
        let score = self
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| MISSING.to_string());
        let phase = self
            .phase
            .map(|p| p.to_string())
            .unwrap_or_else(|| MISSING.to_string());

        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqid,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            score,
            self.strand,
            phase,
            self.attributes.to_column()
        )
    }

    fn expected_fields() -> Option<usize> {
        Some(GFF3_FIELDS)
    }
}

impl FromStr for Gff3Record {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        Gff3Record::from_line(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENE: &str = "chr1\t.\tgene\t100\t500\t.\t+\t.\tID=gene1;Name=abc,def";

    #[test]
    fn test_parse_gene_line() {
        let record = Gff3Record::from_line(GENE).unwrap();

        assert_eq!(record.seqid, "chr1");
        assert_eq!(record.source, ".");
        assert_eq!(record.feature_type, "gene");
        assert_eq!(record.start, 100);
        assert_eq!(record.end, 500);
        assert_eq!(record.score, None);
        assert_eq!(record.strand, Strand::Forward);
        assert_eq!(record.phase, None);
        assert_eq!(record.attributes.values("ID"), vec!["gene1"]);
        assert_eq!(record.attributes.values("Name"), vec!["abc", "def"]);
    }

    #[test]
    fn test_parse_cds_with_score_and_phase() {
        let line = "ctg123\tGenBank\tCDS\t1201\t1500\t0.87\t-\t2\tID=cds1;Parent=mRNA1,mRNA2";
        let record = Gff3Record::from_line(line).unwrap();

        assert_eq!(record.score, Some(0.87));
        assert_eq!(record.strand, Strand::Reverse);
        assert_eq!(record.phase, Some(2));
        assert_eq!(record.parents(), vec!["mRNA1", "mRNA2"]);
    }

    #[test]
    fn test_eight_columns_rejected() {
        let line = "chr1\t.\tgene\t100\t500\t.\t+\t.";
        let err = Gff3Record::from_line(line).unwrap_err();
        assert!(matches!(err, FormatError::FieldCount { expected: 9, actual: 8 }));
    }

    #[test]
    fn test_ten_columns_rejected() {
        let line = format!("{}\textra", GENE);
        assert!(matches!(
            Gff3Record::from_line(&line),
            Err(FormatError::FieldCount { actual: 10, .. })
        ));
    }

    #[test]
    fn test_non_numeric_coordinates_rejected() {
        let start = "chr1\t.\tgene\tone\t500\t.\t+\t.\tID=g";
        let end = "chr1\t.\tgene\t100\t5e2\t.\t+\t.\tID=g";
        let negative = "chr1\t.\tgene\t-1\t500\t.\t+\t.\tID=g";

        for line in [start, end, negative] {
            match Gff3Record::from_line(line) {
                Err(FormatError::InvalidField { .. }) => {}
                other => panic!("expected invalid field for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_invalid_strand_rejected() {
        let line = "chr1\t.\tgene\t100\t500\t.\tx\t.\tID=g";
        assert!(matches!(
            Gff3Record::from_line(line),
            Err(FormatError::InvalidStrand(_))
        ));
    }

    #[test]
    fn test_unknown_strand_accepted() {
        let line = "chr1\t.\tgene\t100\t500\t.\t?\t.\tID=g";
        assert_eq!(Gff3Record::from_line(line).unwrap().strand, Strand::Unknown);
    }

    #[test]
    fn test_invalid_score_and_phase_rejected() {
        let score = "chr1\t.\tgene\t100\t500\thigh\t+\t.\tID=g";
        let phase = "chr1\t.\tCDS\t100\t500\t.\t+\t3\tID=g";
        let phase_text = "chr1\t.\tCDS\t100\t500\t.\t+\tzero\tID=g";

        for line in [score, phase, phase_text] {
            assert!(Gff3Record::from_line(line).is_err(), "accepted {:?}", line);
        }
    }

    #[test]
    fn test_non_finite_score_rejected() {
        for score in ["NaN", "nan", "inf", "-inf", "infinity", "-infinity"] {
            let line = format!("chr1\t.\tgene\t100\t500\t{}\t+\t.\tID=g", score);
            match Gff3Record::from_line(&line) {
                Err(FormatError::InvalidField { field, .. }) => assert_eq!(field, "score"),
                other => panic!("score {:?} gave {:?}", score, other),
            }
        }

        let line = "chr1\t.\tgene\t100\t500\t-1.5e3\t+\t.\tID=g";
        assert_eq!(Gff3Record::from_line(line).unwrap().score, Some(-1500.0));
    }

    #[test]
    fn test_signed_numbers_rejected() {
        let lines = [
            ("start", "chr1\t.\tgene\t+100\t500\t.\t+\t.\tID=g"),
            ("end", "chr1\t.\tgene\t100\t+500\t.\t+\t.\tID=g"),
            ("end", "chr1\t.\tgene\t100\t-500\t.\t+\t.\tID=g"),
            ("phase", "chr1\t.\tCDS\t100\t500\t.\t+\t+1\tID=g"),
            ("phase", "chr1\t.\tCDS\t100\t500\t.\t+\t00\tID=g"),
        ];

        for (expected, line) in lines {
            match Gff3Record::from_line(line) {
                Err(FormatError::InvalidField { field, .. }) => assert_eq!(field, expected),
                other => panic!("{:?} gave {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_swapped_coordinates_parse() {
        let line = "chr1\t.\tgene\t500\t100\t.\t+\t.\tID=g";
        let record = Gff3Record::from_line(line).unwrap();

        assert_eq!(record.start, 500);
        assert_eq!(record.end, 100);
        assert_eq!(record.length(), 401);

        let interval = record.interval().unwrap();
        assert_eq!(interval.start, 99);
        assert_eq!(interval.end, 500);
    }

    #[test]
    fn test_attribute_percent_decoding() {
        let line = "chr1\t.\tgene\t1\t2\t.\t+\t.\tNote=a%3Bb%3Dc;Alias=x%2Cy,z;Tab%09key=v%25";
        let record = Gff3Record::from_line(line).unwrap();

        assert_eq!(record.attribute("Note"), Some("a;b=c"));
        assert_eq!(record.attributes.values("Alias"), vec!["x,y", "z"]);
        assert_eq!(record.attribute("Tab\tkey"), Some("v%"));
    }

    #[test]
    fn test_other_columns_not_decoded() {
        let line = "chr%3B1\t.\tgene\t1\t2\t.\t+\t.\t.";
        let record = Gff3Record::from_line(line).unwrap();
        assert_eq!(record.seqid, "chr%3B1");
    }

    #[test]
    fn test_attribute_edge_cases() {
        let attrs = Attributes::parse("ID=g1; Name=n1;;").unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.first("Name"), Some("n1"));

        assert!(Attributes::parse(".").unwrap().is_empty());
        assert!(matches!(
            Attributes::parse("ID=g1;broken"),
            Err(FormatError::InvalidAttribute(_))
        ));
        assert!(Attributes::parse("=value").is_err());
    }

    #[test]
    fn test_repeated_key_merges_values() {
        let attrs = Attributes::parse("Dbxref=a;Dbxref=b,a").unwrap();
        assert_eq!(attrs.values("Dbxref"), vec!["a", "b"]);
    }

    #[test]
    fn test_attribute_order_ignored_for_equality() {
        let a = Attributes::parse("ID=g1;Name=n").unwrap();
        let b = Attributes::parse("Name=n;ID=g1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_line_preserves_semantics() {
        let line = "ctg1\tsrc\tmRNA\t10\t20\t1.5\t-\t0\tID=m1;Parent=g1,g2;Note=semi%3Bcolon";
        let record = Gff3Record::from_line(line).unwrap();

        assert_eq!(record.to_line(), line);
        assert_eq!(Gff3Record::from_line(&record.to_line()).unwrap(), record);
    }

    #[test]
    fn test_to_line_empty_attributes() {
        let record = Gff3Record::from_line("chr1\t.\tregion\t1\t1000\t.\t.\t.\t.").unwrap();
        assert!(record.to_line().ends_with("\t.\t.\t."));
    }

    #[test]
    fn test_from_iterator() {
        let attrs: Attributes = vec![("ID", "g1"), ("Alias", "a"), ("Alias", "b")]
            .into_iter()
            .collect();
        assert_eq!(attrs.to_column(), "ID=g1;Alias=a,b");
    }
}
