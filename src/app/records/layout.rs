//! Fixed-width record layouts
//!
//! Each record shape is a table of `(column, start, end)` byte ranges. The
//! same table drives decoding and the spreadsheet header row, so the column
//! order in the output always matches the declaration order here.
//!
//! Offsets are bytes. Lines that are not valid UTF-8 come from the legacy
//! Windows-1252 export and are decoded as such.

use encoding_rs::WINDOWS_1252;

/// One fixed-width column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Column name used as the spreadsheet header
    pub name: &'static str,
    /// Inclusive start byte offset
    pub start: usize,
    /// Exclusive end byte offset
    pub end: usize,
}

const fn field(name: &'static str, start: usize, end: usize) -> Field {
    Field { name, start, end }
}

/// Byte offset of the record-type discriminator
pub const DISCRIMINATOR_OFFSET: usize = 9;

/// Lines shorter than this are headers, trailers or blank
pub const MIN_DATA_LINE_LEN: usize = DISCRIMINATOR_OFFSET + 1;

/// Layout of one record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Record shape name for logs
    pub shape: &'static str,
    /// Discriminator byte selecting this layout
    pub discriminator: u8,
    pub fields: &'static [Field],
}

/// Character encoding of one flat file line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEncoding {
    Utf8,
    /// Legacy single-byte export; one byte per character
    Windows1252,
}

impl LineEncoding {
    /// UTF-8 when the whole line is valid UTF-8, Windows-1252 otherwise
    pub fn detect(line: &[u8]) -> Self {
        if std::str::from_utf8(line).is_ok() {
            LineEncoding::Utf8
        } else {
            LineEncoding::Windows1252
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            LineEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            LineEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
        }
    }
}

/// Field values sliced from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Trimmed values in layout order
    pub values: Vec<String>,
    /// Line ended before the full record width; trailing fields were cut
    pub truncated: bool,
    pub encoding: LineEncoding,
}

impl Layout {
    /// Byte length of a full record
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.end).max().unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Slice and trim every field of `line`
    ///
    /// Fields past the end of the line come back empty, so a right-trimmed
    /// line still yields a record. `line` must not include its terminator.
    pub fn decode(&self, line: &[u8]) -> DecodedLine {
        let encoding = LineEncoding::detect(line);
        let values = self
            .fields
            .iter()
            .map(|f| slice_trimmed(line, f.start, f.end, encoding))
            .collect();

        DecodedLine {
            values,
            truncated: line.len() < self.width(),
            encoding,
        }
    }
}

/// Bytes `start..end` of `line`, clamped to the line, decoded and trimmed
pub fn slice_trimmed(line: &[u8], start: usize, end: usize, encoding: LineEncoding) -> String {
    let end = end.min(line.len());
    let start = start.min(end);
    encoding.decode(&line[start..end]).trim().to_string()
}

pub static BENEFICIARY: Layout = Layout {
    shape: "beneficiary",
    discriminator: b'2',
    fields: &[
        field("sequenceNumber", 0, 9),
        field("memberNo", 10, 19),
        field("beneficiaryCode", 19, 21),
        field("firstName", 21, 45),
        field("surname", 45, 69),
        field("initials", 69, 73),
        field("dateOfBirth", 73, 81),
        field("identificationNumber", 81, 97),
    ],
};

pub static UNDERWRITING_RULE: Layout = Layout {
    shape: "underwriting rule",
    discriminator: b'3',
    fields: &[
        field("sequenceNumber", 0, 9),
        field("memberNo", 10, 19),
        field("beneficiaryCode", 19, 21),
        field("underwritingRuleType", 21, 25),
        field("underwritingRuleCode", 25, 33),
        field("startDate", 33, 41),
        field("endDate", 41, 49),
        field("narrative", 49, 229),
        field("referenceNo", 229, 247),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_widths() {
        assert_eq!(BENEFICIARY.width(), 97);
        assert_eq!(UNDERWRITING_RULE.width(), 247);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        for layout in [&BENEFICIARY, &UNDERWRITING_RULE] {
            for pair in layout.fields.windows(2) {
                assert!(pair[0].start < pair[0].end);
                assert!(pair[0].end <= pair[1].start, "{:?}", pair);
            }
            // Discriminator column belongs to no field
            assert!(layout
                .fields
                .iter()
                .all(|f| !(f.start..f.end).contains(&DISCRIMINATOR_OFFSET)));
        }
    }

    #[test]
    fn test_slice_trimmed_clamps() {
        let utf8 = LineEncoding::Utf8;
        assert_eq!(slice_trimmed(b"  abc  ", 0, 7, utf8), "abc");
        assert_eq!(slice_trimmed(b"abc", 1, 10, utf8), "bc");
        assert_eq!(slice_trimmed(b"abc", 5, 10, utf8), "");
    }

    #[test]
    fn test_encoding_detection() {
        assert_eq!(LineEncoding::detect("RENÉ".as_bytes()), LineEncoding::Utf8);
        assert_eq!(LineEncoding::detect(b"REN\xc9"), LineEncoding::Windows1252);
    }

    #[test]
    fn test_windows_1252_names_decoded() {
        let value = slice_trimmed(b"REN\xc9 ", 0, 5, LineEncoding::Windows1252);
        assert_eq!(value, "RENÉ");
        // 0x80-0x9f differ from Latin-1
        assert_eq!(LineEncoding::Windows1252.decode(b"\x80\x9a"), "€š");
    }

    #[test]
    fn test_decode_legacy_line() {
        let mut line = format!("{:<9}2{:<9}{:<2}", "1", "M1", "01").into_bytes();
        line.extend_from_slice(b"REN\xc9");
        line.resize(97, b' ');

        let decoded = BENEFICIARY.decode(&line);
        assert_eq!(decoded.encoding, LineEncoding::Windows1252);
        assert_eq!(decoded.values[3], "RENÉ");
        assert!(!decoded.truncated);
    }

    #[test]
    fn test_decode_discriminator_only_line() {
        let line = format!("{:<9}3", "1");
        let decoded = UNDERWRITING_RULE.decode(line.as_bytes());

        assert!(decoded.truncated);
        assert_eq!(decoded.values.len(), 9);
        assert_eq!(decoded.values[0], "1");
        assert!(decoded.values[1..].iter().all(String::is_empty));
    }

    #[test]
    fn test_decode_truncated_tail() {
        let mut line = format!("{:<9}2{:<9}{:<2}", "1", "M1", "01").into_bytes();
        line.resize(85, b' ');

        let decoded = BENEFICIARY.decode(&line);
        assert!(decoded.truncated);
        assert_eq!(decoded.encoding, LineEncoding::Utf8);
        assert_eq!(decoded.values.len(), 8);
        assert_eq!(decoded.values[0], "1");
        assert_eq!(decoded.values[1], "M1");
        assert_eq!(decoded.values[7], "");
    }
}
