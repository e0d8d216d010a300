//! Spreadsheet output
//!
//! One sheet per record shape, header row from the layout column names, all
//! cells written as text exactly as decoded. A shape with no records gets no
//! sheet.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, warn};

use crate::app::records::{BeneficiaryRecord, FlatRecord, UnderwritingRuleRecord};
use crate::constants::sheets;
use crate::errors::ReportResult;

/// One written sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    /// Data rows, excluding the header
    pub rows: usize,
}

/// What the writer produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub sheets: Vec<SheetSummary>,
}

impl ReportSummary {
    /// Whether a workbook file was written
    pub fn written(&self) -> bool {
        !self.sheets.is_empty()
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.written() {
            return write!(
                f,
                "no type 2 or type 3 records, no workbook written to {}",
                self.path.display()
            );
        }
        write!(f, "workbook saved to {} (", self.path.display())?;
        for (index, sheet) in self.sheets.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {} rows", sheet.name, sheet.rows)?;
        }
        write!(f, ")")
    }
}

/// Write both record collections to a workbook at `out_path`
///
/// Any existing file at `out_path` is replaced. When both collections are
/// empty no workbook is written and a stale file at `out_path` is removed.
///
/// # Errors
///
/// Returns `ReportError` if the workbook cannot be built or saved.
pub fn write_report(
    beneficiaries: &[BeneficiaryRecord],
    underwriting_rules: &[UnderwritingRuleRecord],
    out_path: &Path,
) -> ReportResult<ReportSummary> {
    let mut summary = ReportSummary {
        path: out_path.to_path_buf(),
        sheets: Vec::new(),
    };

    if beneficiaries.is_empty() && underwriting_rules.is_empty() {
        warn!("No type 2 or type 3 records found; no workbook written");
        if out_path.exists() {
            std::fs::remove_file(out_path)?;
        }
        return Ok(summary);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    if !beneficiaries.is_empty() {
        summary.sheets.push(add_sheet(
            &mut workbook,
            &header,
            sheets::BENEFICIARIES,
            beneficiaries,
        )?);
    }
    if !underwriting_rules.is_empty() {
        summary.sheets.push(add_sheet(
            &mut workbook,
            &header,
            sheets::UNDERWRITING_RULES,
            underwriting_rules,
        )?);
    }

    workbook.save(out_path)?;
    info!(
        "Extracted Type 2 and 3 datasets saved to {}",
        out_path.display()
    );
    Ok(summary)
}

fn add_sheet<R: FlatRecord>(
    workbook: &mut Workbook,
    header: &Format,
    name: &str,
    records: &[R],
) -> ReportResult<SheetSummary> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    for (col, column) in R::layout().column_names().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column, header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in record.values().into_iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }
    worksheet.autofit();

    Ok(SheetSummary {
        name: name.to_string(),
        rows: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::TempDir;

    fn beneficiary(seq: &str, first: &str) -> BeneficiaryRecord {
        BeneficiaryRecord {
            sequence_number: seq.to_string(),
            member_no: "M1".to_string(),
            first_name: first.to_string(),
            ..Default::default()
        }
    }

    fn rule(seq: &str) -> UnderwritingRuleRecord {
        UnderwritingRuleRecord {
            sequence_number: seq.to_string(),
            narrative: "General waiting period".to_string(),
            ..Default::default()
        }
    }

    fn read_rows(path: &Path, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        Data::Empty => String::new(),
                        other => format!("{:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_both_sheets_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.xlsx");

        let summary = write_report(
            &[beneficiary("1", "ANNA"), beneficiary("2", "BEN")],
            &[rule("3")],
            &path,
        )
        .unwrap();

        assert!(summary.written());
        assert_eq!(
            summary.sheets,
            vec![
                SheetSummary {
                    name: "beneficiaries_flatfile".to_string(),
                    rows: 2
                },
                SheetSummary {
                    name: "underwriting_rules_flatfile".to_string(),
                    rows: 1
                },
            ]
        );

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["beneficiaries_flatfile", "underwriting_rules_flatfile"]
        );

        let rows = read_rows(&path, "beneficiaries_flatfile");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "sequenceNumber");
        assert_eq!(rows[0][7], "identificationNumber");
        assert_eq!(rows[1][0], "1");
        assert_eq!(rows[1][3], "ANNA");
        assert_eq!(rows[2][3], "BEN");
    }

    #[test]
    fn test_empty_collection_gets_no_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules_only.xlsx");

        let summary = write_report(&[], &[rule("1"), rule("2")], &path).unwrap();

        assert_eq!(summary.sheets.len(), 1);
        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["underwriting_rules_flatfile"]);
    }

    #[test]
    fn test_no_records_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        let summary = write_report(&[], &[], &path).unwrap();

        assert!(!summary.written());
        assert!(summary.sheets.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_summary_display_distinguishes_no_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.xlsx");

        let empty = write_report(&[], &[], &path).unwrap();
        assert!(empty.to_string().starts_with("no type 2 or type 3 records, no workbook"));

        let written = write_report(&[beneficiary("1", "A")], &[rule("2"), rule("3")], &path).unwrap();
        let line = written.to_string();
        assert!(line.starts_with("workbook saved to"));
        assert!(line.ends_with("(beneficiaries_flatfile: 1 rows, underwriting_rules_flatfile: 2 rows)"));
    }

    #[test]
    fn test_rewrite_yields_identical_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("twice.xlsx");
        let beneficiaries = [beneficiary("1", "A"), beneficiary("2", "B")];
        let rules = [rule("3")];

        write_report(&beneficiaries, &rules, &path).unwrap();
        let first = (
            read_rows(&path, "beneficiaries_flatfile"),
            read_rows(&path, "underwriting_rules_flatfile"),
        );
        write_report(&beneficiaries, &rules, &path).unwrap();
        let second = (
            read_rows(&path, "beneficiaries_flatfile"),
            read_rows(&path, "underwriting_rules_flatfile"),
        );

        assert_eq!(first, second);
    }
}
