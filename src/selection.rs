use log::{debug, warn};

use crate::error::PanelError;
use crate::validator::is_excel_file_name;

/// File chosen by drop or by the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Holds at most one selected file
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<SelectedFile>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a candidate name without touching the current selection
    pub fn check(name: &str) -> Result<(), PanelError> {
        if is_excel_file_name(name) {
            Ok(())
        } else {
            warn!("rejected candidate file {:?}", name);
            Err(PanelError::UnsupportedFile(name.to_string()))
        }
    }

    /// Replace the selection with `file` if it is an Excel workbook
    ///
    /// A rejected candidate leaves the previous selection in place.
    pub fn accept(&mut self, file: SelectedFile) -> Result<&SelectedFile, PanelError> {
        Self::check(&file.name)?;
        debug!("selected {} ({} bytes)", file.name, file.size());
        Ok(&*self.current.insert(file))
    }

    /// Drop the selection, returning the file that was held
    pub fn remove(&mut self) -> Option<SelectedFile> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.current.is_some()
    }
}

/// Human readable size with one decimal, 1024 based
///
/// # Examples
/// ```
/// use deck_upload::selection::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(2048), "2.0 KB");
/// assert_eq!(format_file_size(3 * 1024 * 1024 / 2), "1.5 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
