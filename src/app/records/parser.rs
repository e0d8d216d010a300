//! Line classification and decoding
//!
//! Offsets are in bytes. Lines are split on `\n` with any trailing `\r`
//! removed before measuring. A known-type line is never dropped: fields
//! beyond the end of a short line are left empty.

use std::path::Path;

use tracing::{debug, info, warn};

use super::layout::{LineEncoding, DISCRIMINATOR_OFFSET, MIN_DATA_LINE_LEN};
use super::{BeneficiaryRecord, FlatRecord, UnderwritingRuleRecord};
use crate::errors::{ParseError, ParseResult};

/// Counters describing how each line of the flat file was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines read, including headers and trailers
    pub lines: usize,
    /// Lines under the minimum data length
    pub non_data: usize,
    /// Data lines with an unknown discriminator
    pub ignored: usize,
    /// Accepted lines shorter than the full record width
    pub truncated: usize,
    /// Accepted lines decoded as Windows-1252 rather than UTF-8
    pub legacy_encoded: usize,
}

/// Both record collections in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    pub beneficiaries: Vec<BeneficiaryRecord>,
    pub underwriting_rules: Vec<UnderwritingRuleRecord>,
    pub stats: ParseStats,
}

impl ParsedRecords {
    pub fn is_empty(&self) -> bool {
        self.beneficiaries.is_empty() && self.underwriting_rules.is_empty()
    }
}

/// Parse flat file content
pub fn parse_bytes(content: &[u8]) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    // A final newline terminates the last line rather than starting a new one
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    let lines = (!content.is_empty())
        .then(|| body.split(|&b| b == b'\n'))
        .into_iter()
        .flatten();

    for (index, raw) in lines.enumerate() {
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        parsed.stats.lines += 1;

        if line.len() < MIN_DATA_LINE_LEN {
            parsed.stats.non_data += 1;
            continue;
        }

        let line_no = index + 1;
        match line[DISCRIMINATOR_OFFSET] {
            b'2' => push_decoded(&mut parsed.beneficiaries, &mut parsed.stats, line, line_no),
            b'3' => push_decoded(
                &mut parsed.underwriting_rules,
                &mut parsed.stats,
                line,
                line_no,
            ),
            _ => parsed.stats.ignored += 1,
        }
    }

    parsed
}

fn push_decoded<R: FlatRecord>(
    records: &mut Vec<R>,
    stats: &mut ParseStats,
    line: &[u8],
    line_no: usize,
) {
    let layout = R::layout();
    let decoded = layout.decode(line);

    if decoded.truncated {
        debug!(
            "Line {} shorter than a full {} record ({} < {} bytes)",
            line_no,
            layout.shape,
            line.len(),
            layout.width()
        );
        stats.truncated += 1;
    }
    if decoded.encoding == LineEncoding::Windows1252 {
        debug!("Line {} is not UTF-8, decoded as Windows-1252", line_no);
        stats.legacy_encoded += 1;
    }

    if let Some(record) = R::from_fields(decoded.values) {
        records.push(record);
    }
}

/// Read and parse the flat file at `path`
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read. Malformed lines never
/// fail the parse.
pub async fn parse_file(path: &Path) -> ParseResult<ParsedRecords> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let parsed = parse_bytes(&content);
    let stats = parsed.stats;
    info!(
        "Parsed {}: {} beneficiary and {} underwriting rule records from {} lines",
        path.display(),
        parsed.beneficiaries.len(),
        parsed.underwriting_rules.len(),
        stats.lines
    );
    if stats.legacy_encoded > 0 {
        warn!(
            "{} lines were not UTF-8 and were decoded as Windows-1252",
            stats.legacy_encoded
        );
    }
    debug!("Parse statistics: {:?}", stats);

    Ok(parsed)
}
