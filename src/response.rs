//! Upload endpoint reply
//!
//! Two generations of the server exist. The basic one answers with `files`
//! only; the detailed one adds `files_details`, `total_st_fo`,
//! `group_count` and `message`. Both deserialize into [`UploadResponse`],
//! the newer fields being optional.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

use crate::error::MSG_CONNECTION_PREFIX;

/// Map that keeps the key order of the JSON object it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedCounts<T>(pub Vec<(String, T)>);

impl<T> Default for OrderedCounts<T> {
    fn default() -> Self {
        OrderedCounts(Vec::new())
    }
}

impl<T> OrderedCounts<T> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

struct OrderedCountsVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedCountsVisitor<T> {
    type Value = OrderedCounts<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of group names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, T>()? {
            entries.push((key, value));
        }
        Ok(OrderedCounts(entries))
    }

    // The server sends `{}` when there is nothing to show, but be lenient
    // with `null` as well.
    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedCounts::default())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedCounts<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedCountsVisitor(PhantomData))
    }
}

/// Composite per-group statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PrimaryDetail {
    pub lines: u64,
    pub st_fo: u64,
    pub files: u64,
}

/// One entry of `primary_stats`: composite object or a bare row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrimaryEntry {
    Detailed(PrimaryDetail),
    Count(u64),
}

impl PrimaryEntry {
    pub fn lines(&self) -> u64 {
        match self {
            PrimaryEntry::Detailed(detail) => detail.lines,
            PrimaryEntry::Count(count) => *count,
        }
    }
}

/// Aggregate statistics computed by the server
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_rows: u64,
    pub total_st_fo: Option<u64>,
    pub primary_count: u64,
    pub primary_stats: OrderedCounts<PrimaryEntry>,
    pub primary_label: String,
    pub stats_title: String,
    pub sort_column: String,
    pub sort_stats: OrderedCounts<u64>,
    pub group_count: Option<u64>,
    pub show_details: bool,
    pub file_count: u64,
    pub file_size: String,
}

/// Generated file with its row count
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileDetail {
    pub filename: String,
    pub lines: u64,
}

/// Raw reply of `POST /upload/`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    pub message: Option<String>,
    pub stats: Option<Stats>,
    pub files: Vec<String>,
    pub files_details: Option<Vec<FileDetail>>,
    pub error: Option<String>,
}

/// Generated file as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub lines: Option<u64>,
}

/// Successful reply, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub stats: Stats,
    pub files: Vec<FileEntry>,
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Split into the rendered result or the message for the error panel
    ///
    /// `files_details` wins over `files` when it is present and non-empty.
    pub fn into_result(self, fallback_error: &str) -> Result<UploadResult, String> {
        if !self.success {
            return Err(self
                .error
                .filter(|msg| !msg.is_empty())
                .unwrap_or_else(|| fallback_error.to_string()));
        }

        let stats = self
            .stats
            .ok_or_else(|| format!("{}missing field `stats`", MSG_CONNECTION_PREFIX))?;

        let files = match self.files_details {
            Some(details) if !details.is_empty() => details
                .into_iter()
                .map(|d| FileEntry {
                    name: d.filename,
                    lines: Some(d.lines),
                })
                .collect(),
            _ => self
                .files
                .into_iter()
                .map(|name| FileEntry { name, lines: None })
                .collect(),
        };

        Ok(UploadResult {
            stats,
            files,
            message: self.message,
        })
    }
}
