use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

use crate::error::PanelError;
use crate::form::VisitInfo;

lazy_static! {
    static ref EXCEL_NAME_REGEX: Regex = Regex::new(r"(?i)\.(xlsx|xls)$").unwrap();
}

/// Field groups that carry a validity marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    DateStart,
    DateEnd,
    Purpose,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::DateStart, FieldId::DateEnd, FieldId::Purpose];

    /// Id of the input inside the field group
    pub fn input_id(&self) -> &'static str {
        match self {
            FieldId::DateStart => "dateDebut",
            FieldId::DateEnd => "dateFin",
            FieldId::Purpose => "objetVisite",
        }
    }
}

/// Visual marker of a field group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Unmarked,
    Valid,
    Invalid,
}

impl Validity {
    /// CSS class carried by the field group, if any
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Validity::Unmarked => None,
            Validity::Valid => Some("valid"),
            Validity::Invalid => Some("invalid"),
        }
    }
}

/// Markers for the three visit field groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldMarks {
    pub date_start: Validity,
    pub date_end: Validity,
    pub purpose: Validity,
}

impl FieldMarks {
    pub fn get(&self, field: FieldId) -> Validity {
        match field {
            FieldId::DateStart => self.date_start,
            FieldId::DateEnd => self.date_end,
            FieldId::Purpose => self.purpose,
        }
    }

    pub fn any_invalid(&self) -> bool {
        FieldId::ALL
            .iter()
            .any(|field| self.get(*field) == Validity::Invalid)
    }
}

/// Result of validating the visit fields before a submission
#[derive(Debug)]
pub struct Validation {
    pub marks: FieldMarks,
    pub outcome: Result<(), PanelError>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// True when the name ends in `.xlsx` or `.xls`, ignoring case
///
/// # Examples
/// ```
/// use deck_upload::validator::is_excel_file_name;
///
/// assert!(is_excel_file_name("Visites.XLSX"));
/// assert!(!is_excel_file_name("visites.csv"));
/// ```
pub fn is_excel_file_name(name: &str) -> bool {
    EXCEL_NAME_REGEX.is_match(name)
}

/// Markers for the two date groups
///
/// Both dates present with start after end marks both groups invalid.
/// Otherwise every present date is valid and an absent one stays unmarked.
pub fn date_marks(start: &str, end: &str) -> (Validity, Validity) {
    let start = start.trim();
    let end = end.trim();

    if !start.is_empty() && !end.is_empty() && compare_dates(start, end) == Ordering::Greater {
        return (Validity::Invalid, Validity::Invalid);
    }

    let mark = |value: &str| {
        if value.is_empty() {
            Validity::Unmarked
        } else {
            Validity::Valid
        }
    };
    (mark(start), mark(end))
}

/// Marker for the purpose group; the purpose is optional and never invalid
pub fn purpose_mark(purpose: &str) -> Validity {
    if purpose.trim().is_empty() {
        Validity::Unmarked
    } else {
        Validity::Valid
    }
}

/// Validate all visit fields at submission time
pub fn validate_visit_fields(visit: &VisitInfo) -> Validation {
    let (date_start, date_end) = date_marks(&visit.date_start, &visit.date_end);
    let marks = FieldMarks {
        date_start,
        date_end,
        purpose: purpose_mark(&visit.purpose),
    };

    let outcome = if marks.any_invalid() {
        Err(PanelError::InvalidDateRange)
    } else {
        Ok(())
    };

    Validation { marks, outcome }
}

// Date inputs yield ISO dates; anything else falls back to string order,
// which is what the browser compared in the first place.
fn compare_dates(start: &str, end: &str) -> Ordering {
    match (parse_date(start), parse_date(end)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => start.cmp(end),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
