use log::{debug, warn};

use crate::error::{MSG_CONNECTION_PREFIX, PanelError};
use crate::form::{SortColumn, UploadForm, VisitInfo};
use crate::response::{UploadResponse, UploadResult};
use crate::selection::SelectedFile;
use crate::validator::{FieldMarks, validate_visit_fields};

/// Failure below the HTTP reply: network down, request refused, body unreadable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Carries one multipart POST and hands back the response body
///
/// The browser implementation wraps `fetch`; tests script the replies.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_form(&self, url: &str, form: &UploadForm) -> Result<String, TransportError>;
}

/// Where a reply sends the page
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rendered(UploadResult),
    Failed(String),
}

/// Form checked and ready to send, plus the markers the check produced
#[derive(Debug)]
pub struct Prepared {
    /// `None` when no file was selected and validation never ran
    pub marks: Option<FieldMarks>,
    pub form: Result<UploadForm, PanelError>,
}

/// Assemble the upload form, validating the visit fields first
pub fn prepare(
    file: Option<&SelectedFile>,
    sort_column: SortColumn,
    visit: &VisitInfo,
) -> Prepared {
    let Some(file) = file else {
        return Prepared {
            marks: None,
            form: Err(PanelError::NoFileSelected),
        };
    };

    let validation = validate_visit_fields(visit);
    let form = validation.outcome.map(|()| UploadForm {
        file: file.clone(),
        sort_column,
        visit: visit.clone(),
    });

    Prepared {
        marks: Some(validation.marks),
        form,
    }
}

/// Route a reply, or its transport failure, to results or to an error message
///
/// A body that is not JSON counts as a transport failure.
pub fn interpret(reply: Result<String, TransportError>, fallback_error: &str) -> Outcome {
    let body = match reply {
        Ok(body) => body,
        Err(err) => {
            warn!("upload failed: {}", err);
            return Outcome::Failed(format!("{}{}", MSG_CONNECTION_PREFIX, err));
        }
    };

    let response = match UploadResponse::parse(&body) {
        Ok(response) => response,
        Err(err) => {
            warn!("upload reply is not JSON: {}", err);
            return Outcome::Failed(format!("{}{}", MSG_CONNECTION_PREFIX, err));
        }
    };

    match response.into_result(fallback_error) {
        Ok(result) => {
            debug!(
                "upload succeeded: {} rows, {} files",
                result.stats.total_rows,
                result.files.len()
            );
            Outcome::Rendered(result)
        }
        Err(message) => {
            warn!("server reported failure: {}", message);
            Outcome::Failed(message)
        }
    }
}

/// Send `form` through `transport` and interpret the reply
pub async fn dispatch<T: Transport>(
    transport: &T,
    url: &str,
    form: &UploadForm,
    fallback_error: &str,
) -> Outcome {
    debug!(
        "POST {} file={} sort_column={}",
        url, form.file.name, form.sort_column
    );
    interpret(transport.post_form(url, form).await, fallback_error)
}
