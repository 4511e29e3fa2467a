use thiserror::Error;

/// Message shown when the candidate file is not an Excel workbook
pub const MSG_NOT_EXCEL: &str = "Veuillez sélectionner un fichier Excel (.xlsx ou .xls)";
/// Message shown when processing is requested without a selected file
pub const MSG_NO_FILE: &str = "Veuillez sélectionner un fichier";
/// Message shown when the visit start date is after the end date
pub const MSG_DATE_RANGE: &str = "La date de début ne peut pas être postérieure à la date de fin";
/// Fallback for a server failure that carries no message
pub const MSG_SERVER_FALLBACK: &str = "Une erreur est survenue";
/// Prefix for transport failures
pub const MSG_CONNECTION_PREFIX: &str = "Erreur de connexion: ";

/// Every failure the panel can run into
///
/// The first five variants display the exact text the page shows in its
/// error panel. The remaining ones wrap failures of the crates this one
/// builds on.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Candidate file name does not end in `.xlsx` or `.xls`
    #[error("{}", MSG_NOT_EXCEL)]
    UnsupportedFile(String),

    #[error("{}", MSG_NO_FILE)]
    NoFileSelected,

    #[error("{}", MSG_DATE_RANGE)]
    InvalidDateRange,

    /// A submission is still waiting for its reply
    #[error("Un traitement est déjà en cours")]
    SubmissionInFlight,

    /// The browser could not hand over the content of an accepted file
    #[error("Impossible de lire le fichier {name}: {reason}")]
    FileUnreadable { name: String, reason: String },

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("template error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(String),
}
