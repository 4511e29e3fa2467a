use serde::{Deserialize, Serialize};
use std::fmt;

use crate::selection::SelectedFile;

/// Column the server groups the workbook rows by
///
/// The wire values are the column headers the server expects, spaces and
/// capitalisation included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortColumn {
    #[default]
    #[serde(rename = "code site")]
    CodeSite,
    #[serde(rename = "DR IAM")]
    DrIam,
    #[serde(rename = "ville")]
    Ville,
    #[serde(rename = "ST FO")]
    StFo,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::CodeSite,
        SortColumn::DrIam,
        SortColumn::Ville,
        SortColumn::StFo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::CodeSite => "code site",
            SortColumn::DrIam => "DR IAM",
            SortColumn::Ville => "ville",
            SortColumn::StFo => "ST FO",
        }
    }

    /// Parse a radio value or a `sort_column` echoed by the server
    ///
    /// Matching ignores case and whitespace, so `"DR IAm"` and `"driam"`
    /// both map to [`SortColumn::DrIam`].
    pub fn from_value(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        Self::ALL
            .into_iter()
            .find(|column| normalize(column.as_str()) == wanted)
    }

    /// Columns whose breakdown duplicates the primary breakdown
    pub fn is_redundant(&self) -> bool {
        matches!(self, SortColumn::DrIam | SortColumn::Ville | SortColumn::StFo)
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Visit information typed into the options section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitInfo {
    pub date_start: String,
    pub date_end: String,
    pub purpose: String,
}

impl VisitInfo {
    pub fn clear(&mut self) {
        self.date_start.clear();
        self.date_end.clear();
        self.purpose.clear();
    }
}

/// Value of one multipart part
#[derive(Debug, Clone, PartialEq)]
pub enum PartValue<'a> {
    Text(&'a str),
    File { filename: &'a str, bytes: &'a [u8] },
}

/// Named part of the upload body
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart<'a> {
    pub name: &'static str,
    pub value: PartValue<'a>,
}

/// Everything sent to the upload endpoint for one submission
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub file: SelectedFile,
    pub sort_column: SortColumn,
    pub visit: VisitInfo,
}

impl UploadForm {
    /// Multipart parts in wire order
    pub fn parts(&self) -> Vec<FormPart<'_>> {
        vec![
            FormPart {
                name: "file",
                value: PartValue::File {
                    filename: &self.file.name,
                    bytes: &self.file.bytes,
                },
            },
            FormPart {
                name: "sort_column",
                value: PartValue::Text(self.sort_column.as_str()),
            },
            FormPart {
                name: "date_debut",
                value: PartValue::Text(&self.visit.date_start),
            },
            FormPart {
                name: "date_fin",
                value: PartValue::Text(&self.visit.date_end),
            },
            FormPart {
                name: "objet_visite",
                value: PartValue::Text(&self.visit.purpose),
            },
        ]
    }
}
