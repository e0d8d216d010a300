//! Flat file records
//!
//! The provider's report is a fixed-width text file. Each data line carries a
//! record-type discriminator at byte 9; type `2` lines describe beneficiaries
//! and type `3` lines describe underwriting rules. Every other line is
//! ignored.

pub mod layout;
pub mod parser;

pub use layout::{DecodedLine, Field, Layout, LineEncoding, BENEFICIARY, UNDERWRITING_RULE};
pub use parser::{parse_bytes, parse_file, ParseStats, ParsedRecords};

/// A record shape decoded from one fixed-width line
pub trait FlatRecord: Sized {
    /// Column table for this shape
    fn layout() -> &'static Layout;

    /// Build the record from values in layout order
    ///
    /// Returns `None` if the number of values does not match the layout.
    fn from_fields(fields: Vec<String>) -> Option<Self>;

    /// Field values in layout order
    fn values(&self) -> Vec<&str>;
}

/// Type `2` record: one beneficiary of a member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeneficiaryRecord {
    pub sequence_number: String,
    pub member_no: String,
    pub beneficiary_code: String,
    pub first_name: String,
    pub surname: String,
    pub initials: String,
    /// Raw `YYYYMMDD` text as supplied
    pub date_of_birth: String,
    pub identification_number: String,
}

/// Type `3` record: a waiting-period rule applied to a beneficiary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnderwritingRuleRecord {
    pub sequence_number: String,
    pub member_no: String,
    pub beneficiary_code: String,
    pub underwriting_rule_type: String,
    pub underwriting_rule_code: String,
    pub start_date: String,
    pub end_date: String,
    pub narrative: String,
    pub reference_no: String,
}

impl FlatRecord for BeneficiaryRecord {
    fn layout() -> &'static Layout {
        &BENEFICIARY
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [
            sequence_number,
            member_no,
            beneficiary_code,
            first_name,
            surname,
            initials,
            date_of_birth,
            identification_number,
        ]: [String; 8] = fields.try_into().ok()?;

        Some(Self {
            sequence_number,
            member_no,
            beneficiary_code,
            first_name,
            surname,
            initials,
            date_of_birth,
            identification_number,
        })
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.sequence_number.as_str(),
            self.member_no.as_str(),
            self.beneficiary_code.as_str(),
            self.first_name.as_str(),
            self.surname.as_str(),
            self.initials.as_str(),
            self.date_of_birth.as_str(),
            self.identification_number.as_str(),
        ]
    }
}

impl FlatRecord for UnderwritingRuleRecord {
    fn layout() -> &'static Layout {
        &UNDERWRITING_RULE
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [
            sequence_number,
            member_no,
            beneficiary_code,
            underwriting_rule_type,
            underwriting_rule_code,
            start_date,
            end_date,
            narrative,
            reference_no,
        ]: [String; 9] = fields.try_into().ok()?;

        Some(Self {
            sequence_number,
            member_no,
            beneficiary_code,
            underwriting_rule_type,
            underwriting_rule_code,
            start_date,
            end_date,
            narrative,
            reference_no,
        })
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.sequence_number.as_str(),
            self.member_no.as_str(),
            self.beneficiary_code.as_str(),
            self.underwriting_rule_type.as_str(),
            self.underwriting_rule_code.as_str(),
            self.start_date.as_str(),
            self.end_date.as_str(),
            self.narrative.as_str(),
            self.reference_no.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_values_follow_layout_order() {
        let record = BeneficiaryRecord::from_fields(strings(&[
            "1", "M1", "01", "JANE", "DOE", "J", "19800101", "8001010000000",
        ]))
        .unwrap();

        assert_eq!(record.first_name, "JANE");
        assert_eq!(
            record.values().len(),
            BeneficiaryRecord::layout().fields.len()
        );
        assert_eq!(record.values()[6], "19800101");
    }

    #[test]
    fn test_from_fields_rejects_wrong_arity() {
        assert!(BeneficiaryRecord::from_fields(strings(&["1", "2"])).is_none());
        assert!(UnderwritingRuleRecord::from_fields(strings(&["1"; 8])).is_none());
        assert!(UnderwritingRuleRecord::from_fields(strings(&["1"; 9])).is_some());
    }

    #[test]
    fn test_underwriting_values_match_columns() {
        let record = UnderwritingRuleRecord::from_fields(strings(&[
            "2", "M1", "00", "WP", "GEN3M", "20240101", "20240331", "General waiting", "REF1",
        ]))
        .unwrap();
        let columns: Vec<&str> = UnderwritingRuleRecord::layout().column_names().collect();

        assert_eq!(columns.len(), record.values().len());
        assert_eq!(columns[7], "narrative");
        assert_eq!(record.values()[7], "General waiting");
    }
}
