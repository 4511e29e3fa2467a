use crate::response::UploadResult;

/// The transient panel below the options; at most one is ever shown
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Panel {
    #[default]
    Hidden,
    Loading,
    Results(Box<UploadResult>),
    Error(String),
}

/// Page state as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Selecting,
    Submitting,
    Results,
    Error,
}

impl PageState {
    pub fn derive(has_file: bool, panel: &Panel) -> Self {
        match panel {
            Panel::Loading => PageState::Submitting,
            Panel::Results(_) => PageState::Results,
            Panel::Error(_) => PageState::Error,
            Panel::Hidden if has_file => PageState::Selecting,
            Panel::Hidden => PageState::Idle,
        }
    }
}

/// Sections of the page whose display the controller owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    FileSelected,
    SortOptions,
    Loading,
    Stats,
    Results,
    Error,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::FileSelected,
        Section::SortOptions,
        Section::Loading,
        Section::Stats,
        Section::Results,
        Section::Error,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Section::FileSelected => "fileSelected",
            Section::SortOptions => "sortSection",
            Section::Loading => "loading",
            Section::Stats => "statsSection",
            Section::Results => "results",
            Section::Error => "error",
        }
    }
}

/// Which sections are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub file_selected: bool,
    pub sort_options: bool,
    pub loading: bool,
    pub stats: bool,
    pub results: bool,
    pub error: bool,
}

impl Visibility {
    /// Sections shown for a selection state and a panel
    ///
    /// The file and options sections follow the selection; the stats
    /// section travels with the results.
    pub fn compute(has_file: bool, panel: &Panel) -> Self {
        let mut vis = Visibility {
            file_selected: has_file,
            sort_options: has_file,
            ..Visibility::default()
        };
        match panel {
            Panel::Hidden => {}
            Panel::Loading => vis.loading = true,
            Panel::Results(_) => {
                vis.stats = true;
                vis.results = true;
            }
            Panel::Error(_) => vis.error = true,
        }
        vis
    }

    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::FileSelected => self.file_selected,
            Section::SortOptions => self.sort_options,
            Section::Loading => self.loading,
            Section::Stats => self.stats,
            Section::Results => self.results,
            Section::Error => self.error,
        }
    }

    pub fn visible(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| self.is_visible(*section))
            .collect()
    }
}
