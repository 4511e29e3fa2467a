#![cfg(feature = "cli")]

use std::error::Error;
use std::path::Path;

/// Headers of the columns the server requires
pub const SAMPLE_HEADERS: [&str; 4] = ["code site", "DR IAM", "ville", "ST FO"];

const BASIC_ROWS: [[&str; 4]; 8] = [
    ["SITE001", "DR_NORD", "Paris", "ST_A"],
    ["SITE002", "DR_SUD", "Lyon", "ST_B"],
    ["SITE001", "DR_NORD", "Lille", "ST_A"],
    ["SITE003", "DR_EST", "Strasbourg", "ST_C"],
    ["SITE002", "DR_SUD", "Marseille", "ST_B"],
    ["SITE001", "DR_NORD", "Roubaix", "ST_A"],
    ["SITE003", "DR_EST", "Nancy", "ST_C"],
    ["SITE004", "DR_OUEST", "Nantes", "ST_D"],
];

const RICH_EXTRA_ROWS: [[&str; 4]; 16] = [
    ["SITE005", "DR_CENTRE", "Clermont-Ferrand", "ST_E"],
    ["SITE001", "DR_NORD", "Amiens", "ST_A"],
    ["SITE002", "DR_SUD", "Toulon", "ST_B"],
    ["SITE006", "DR_EST", "Metz", "ST_C"],
    ["SITE003", "DR_EST", "Mulhouse", "ST_C"],
    ["SITE004", "DR_OUEST", "Brest", "ST_D"],
    ["SITE005", "DR_CENTRE", "Limoges", "ST_E"],
    ["SITE006", "DR_EST", "Reims", "ST_C"],
    ["SITE007", "DR_SUD", "Montpellier", "ST_B"],
    ["SITE001", "DR_NORD", "Créteil", "ST_A"],
    ["SITE002", "DR_SUD", "Nice", "ST_B"],
    ["SITE008", "DR_OUEST", "Bordeaux", "ST_D"],
    ["SITE003", "DR_EST", "Colmar", "ST_C"],
    ["SITE009", "DR_CENTRE", "Orléans", "ST_E"],
    ["SITE010", "DR_NORD", "Rouen", "ST_A"],
    ["SITE001", "DR_NORD", "Versailles", "ST_A"],
];

// One value missing per row: DR, then ville, then code site.
const RICH_GAP_ROWS: [[&str; 4]; 3] = [
    ["SITE011", "", "Toulouse", "ST_F"],
    ["SITE012", "DR_SUD", "", "ST_B"],
    ["", "DR_NORD", "Dijon", "ST_A"],
];

/// Rows of the sample workbook, header excluded
///
/// The basic set has 8 rows. The rich set has 27, three of which leave one
/// cell empty.
pub fn sample_rows(rich: bool) -> Vec<[&'static str; 4]> {
    let mut rows = BASIC_ROWS.to_vec();
    if rich {
        rows.extend_from_slice(&RICH_EXTRA_ROWS);
        rows.extend_from_slice(&RICH_GAP_ROWS);
    }
    rows
}

/// Build the sample workbook in memory
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
pub fn sample_workbook(rich: bool) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, header) in SAMPLE_HEADERS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }

    for (r, row) in sample_rows(rich).iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            // Missing values stay as empty cells
            if !value.is_empty() {
                worksheet.write_string((r + 1) as u32, c as u16, *value)?;
            }
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Write the sample workbook to `path`
pub fn write_sample_workbook(path: impl AsRef<Path>, rich: bool) -> Result<usize, Box<dyn Error>> {
    let buffer = sample_workbook(rich)?;
    std::fs::write(path, &buffer)?;
    Ok(buffer.len())
}
