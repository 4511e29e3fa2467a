//! Declarative rendering
//!
//! The controller exposes its state as a [`ViewState`]. [`render`] maps that
//! value to the list of [`NodeUpdate`]s that bring the document in line with
//! it. Nothing here touches a live document, which is what lets the whole
//! pipeline run under `cargo test`.

use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::form::SortColumn;
use crate::response::{FileEntry, PrimaryEntry, Stats, UploadResult};
use crate::templates::Templates;
use crate::validator::{FieldId, FieldMarks, Validity};
use crate::visibility::{Section, Visibility};

pub const ICON_FILE: &str = "📄";
pub const ICON_SORT: &str = "📋";
pub const ICON_DEFAULT: &str = "🏢";

/// Icon shown next to the primary breakdown for a primary label
pub fn primary_icon(label: &str) -> &'static str {
    match label {
        "ville" => "🏙️",
        "ST FO" => "📋",
        "DR" => "🏢",
        _ => ICON_DEFAULT,
    }
}

/// `word` with an `s` appended when `count` is above one
pub fn plural(count: u64, word: &str) -> String {
    if count > 1 {
        format!("{}s", word)
    } else {
        word.to_string()
    }
}

fn lines_text(count: u64) -> String {
    format!("{} {}", count, plural(count, "ligne"))
}

/// Count column of a primary row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    Lines(u64),
    Detailed { lines: u64, st_fo: u64, files: u64 },
}

impl RowCount {
    pub fn lines(&self) -> u64 {
        match self {
            RowCount::Lines(lines) => *lines,
            RowCount::Detailed { lines, .. } => *lines,
        }
    }

    pub fn text(&self) -> String {
        match *self {
            RowCount::Lines(lines) => lines_text(lines),
            RowCount::Detailed {
                lines,
                st_fo,
                files,
            } => format!(
                "{} | {} ST FO | {} {}",
                lines_text(lines),
                st_fo,
                files,
                plural(files, "fichier")
            ),
        }
    }
}

impl From<&PrimaryEntry> for RowCount {
    fn from(entry: &PrimaryEntry) -> Self {
        match entry {
            PrimaryEntry::Detailed(d) => RowCount::Detailed {
                lines: d.lines,
                st_fo: d.st_fo,
                files: d.files,
            },
            PrimaryEntry::Count(count) => RowCount::Lines(*count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRow {
    pub name: String,
    pub icon: &'static str,
    pub count: RowCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRow {
    pub name: String,
    pub count: u64,
}

impl SortRow {
    pub fn count_text(&self) -> String {
        lines_text(self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub icon: &'static str,
    pub name: String,
    pub lines: Option<u64>,
    pub href: String,
}

impl FileRow {
    pub fn lines_text(&self) -> Option<String> {
        self.lines.map(lines_text)
    }
}

/// Fixed summary fields at the top of the stats section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub total_rows: u64,
    pub total_st_fo: Option<u64>,
    pub primary_count: u64,
    pub primary_label: String,
    pub file_count: u64,
    pub file_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBreakdown {
    pub title: String,
    pub rows: Vec<SortRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsView {
    pub primary_title: String,
    pub primary_rows: Vec<PrimaryRow>,
    /// `None` when the sort column duplicates the primary breakdown
    pub sort: Option<SortBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub summary: SummaryView,
    /// `None` when the server asked for no details
    pub details: Option<DetailsView>,
    pub files: Vec<FileRow>,
}

/// Everything the document shows, as one value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub file_name: Option<String>,
    pub visibility: Visibility,
    pub marks: FieldMarks,
    pub drag_over: bool,
    /// Empty the visit inputs; set once after a reset
    pub clear_fields: bool,
    pub error: Option<String>,
    pub results: Option<ResultsView>,
}

/// Node addressed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Id(&'static str),
    /// Parent element of a visit input
    FieldGroup(FieldId),
    /// The `.details-section` block
    DetailsPanel,
    /// The `.detail-card` around the sort list
    SortCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    Grid,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Grid => "grid",
        }
    }
}

/// One change to a document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeUpdate {
    SetText { target: Target, text: String },
    SetHtml { target: Target, html: String },
    SetDisplay { target: Target, display: Display },
    SetClass { target: Target, class: &'static str, on: bool },
    ClearValue { target: Target },
}

/// Summary values shown for a statistics object
pub fn summary_view(stats: &Stats) -> SummaryView {
    SummaryView {
        total_rows: stats.total_rows,
        total_st_fo: stats.total_st_fo,
        primary_count: stats.primary_count,
        primary_label: format!(
            "Nombre de {}",
            plural(stats.primary_count, &stats.primary_label)
        ),
        file_count: stats.file_count,
        file_size: stats.file_size.clone(),
    }
}

/// Primary breakdown, largest group first
///
/// The sort is stable, so groups with equal line counts keep the order in
/// which the server listed them.
pub fn primary_rows(stats: &Stats) -> Vec<PrimaryRow> {
    let icon = primary_icon(&stats.primary_label);
    let mut rows: Vec<PrimaryRow> = stats
        .primary_stats
        .iter()
        .map(|(name, entry)| PrimaryRow {
            name: name.to_string(),
            icon,
            count: RowCount::from(entry),
        })
        .collect();
    rows.sort_by(|a, b| b.count.lines().cmp(&a.count.lines()));
    rows
}

/// Sort column breakdown, or `None` when it would repeat the primary one
pub fn sort_breakdown(stats: &Stats) -> Option<SortBreakdown> {
    let redundant = SortColumn::from_value(&stats.sort_column)
        .map(|column| column.is_redundant())
        .unwrap_or(false);
    if redundant {
        return None;
    }

    let mut rows: Vec<SortRow> = stats
        .sort_stats
        .iter()
        .map(|(name, count)| SortRow {
            name: name.to_string(),
            count: *count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));

    Some(SortBreakdown {
        title: format!("{} Répartition par {}", ICON_SORT, stats.sort_column),
        rows,
    })
}

pub fn file_rows(files: &[FileEntry], config: &PanelConfig) -> Vec<FileRow> {
    files
        .iter()
        .map(|file| FileRow {
            icon: ICON_FILE,
            name: file.name.clone(),
            lines: file.lines,
            href: config.download_url(&file.name),
        })
        .collect()
}

/// Typed view of a successful upload
pub fn results_view(result: &UploadResult, config: &PanelConfig) -> ResultsView {
    let stats = &result.stats;
    let details = if stats.show_details {
        Some(DetailsView {
            primary_title: format!("{} {}", primary_icon(&stats.primary_label), stats.stats_title),
            primary_rows: primary_rows(stats),
            sort: sort_breakdown(stats),
        })
    } else {
        None
    };

    ResultsView {
        summary: summary_view(stats),
        details,
        files: file_rows(&result.files, config),
    }
}

fn display(on: bool) -> Display {
    if on { Display::Block } else { Display::None }
}

fn text(id: &'static str, text: impl Into<String>) -> NodeUpdate {
    NodeUpdate::SetText {
        target: Target::Id(id),
        text: text.into(),
    }
}

/// Node updates that make the document show `view`
///
/// Apart from the one-shot clearing of the visit inputs, the output is
/// complete rather than a diff: applying it to any prior document state
/// yields the same page. Visit inputs are only ever emptied on request, as
/// a half-typed date input reads as empty.
pub fn render(view: &ViewState, templates: &Templates) -> Result<Vec<NodeUpdate>, PanelError> {
    let mut updates = Vec::new();

    updates.push(NodeUpdate::SetClass {
        target: Target::Id("dropZone"),
        class: "dragover",
        on: view.drag_over,
    });

    match &view.file_name {
        Some(name) => updates.push(text("fileName", name.as_str())),
        None => updates.push(NodeUpdate::ClearValue {
            target: Target::Id("fileInput"),
        }),
    }

    for section in Section::ALL {
        updates.push(NodeUpdate::SetDisplay {
            target: Target::Id(section.element_id()),
            display: display(view.visibility.is_visible(section)),
        });
    }

    for field in FieldId::ALL {
        let mark = view.marks.get(field);
        for state in [Validity::Valid, Validity::Invalid] {
            if let Some(class) = state.class() {
                updates.push(NodeUpdate::SetClass {
                    target: Target::FieldGroup(field),
                    class,
                    on: mark == state,
                });
            }
        }
    }

    if view.clear_fields {
        for field in FieldId::ALL {
            updates.push(NodeUpdate::ClearValue {
                target: Target::Id(field.input_id()),
            });
        }
    }

    if let Some(message) = &view.error {
        updates.push(text("errorMessage", message.as_str()));
    }

    if let Some(results) = &view.results {
        render_results(results, templates, &mut updates)?;
    }

    Ok(updates)
}

fn render_results(
    results: &ResultsView,
    templates: &Templates,
    updates: &mut Vec<NodeUpdate>,
) -> Result<(), PanelError> {
    let summary = &results.summary;
    updates.push(text("totalRows", summary.total_rows.to_string()));
    updates.push(text(
        "totalStFo",
        summary
            .total_st_fo
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ));
    updates.push(text("primaryCount", summary.primary_count.to_string()));
    updates.push(text("primaryLabel", summary.primary_label.as_str()));
    updates.push(text("fileCount", summary.file_count.to_string()));
    updates.push(text("fileSize", summary.file_size.as_str()));

    match &results.details {
        None => updates.push(NodeUpdate::SetDisplay {
            target: Target::DetailsPanel,
            display: Display::None,
        }),
        Some(details) => {
            updates.push(NodeUpdate::SetDisplay {
                target: Target::DetailsPanel,
                display: Display::Grid,
            });
            updates.push(text("primaryTitle", details.primary_title.as_str()));
            updates.push(NodeUpdate::SetHtml {
                target: Target::Id("primaryList"),
                html: templates.primary_list(&details.primary_rows)?,
            });

            match &details.sort {
                None => updates.push(NodeUpdate::SetDisplay {
                    target: Target::SortCard,
                    display: Display::None,
                }),
                Some(sort) => {
                    updates.push(NodeUpdate::SetDisplay {
                        target: Target::SortCard,
                        display: Display::Block,
                    });
                    updates.push(text("sortTitle", sort.title.as_str()));
                    updates.push(NodeUpdate::SetHtml {
                        target: Target::Id("sortList"),
                        html: templates.sort_list(&sort.rows)?,
                    });
                }
            }
        }
    }

    updates.push(NodeUpdate::SetHtml {
        target: Target::Id("filesList"),
        html: templates.file_list(&results.files)?,
    });

    Ok(())
}
