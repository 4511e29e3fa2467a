//! Plain-text rendering used by the command line companion

use std::fmt::Write;

use crate::config::PanelConfig;
use crate::controller::ViewController;
use crate::dispatcher::{self, Outcome};
use crate::error::PanelError;
use crate::form::{PartValue, SortColumn};
use crate::render::{self, ResultsView};
use crate::selection::{SelectedFile, format_file_size};
use crate::validator::{FieldId, Validity};

/// What the page would show for a saved upload reply
pub fn preview_reply(body: &str, config: &PanelConfig) -> String {
    match dispatcher::interpret(Ok(body.to_string()), &config.fallback_error) {
        Outcome::Rendered(result) => {
            let mut out = String::new();
            if let Some(message) = &result.message {
                let _ = writeln!(out, "{}", message);
            }
            out.push_str(&results_text(&render::results_view(&result, config)));
            out
        }
        Outcome::Failed(message) => format!("Erreur: {}\n", message),
    }
}

/// Text version of the stats and results sections
pub fn results_text(view: &ResultsView) -> String {
    let mut out = String::new();
    let s = &view.summary;

    let _ = writeln!(out, "Lignes totales : {}", s.total_rows);
    if let Some(st_fo) = s.total_st_fo {
        let _ = writeln!(out, "ST FO : {}", st_fo);
    }
    let _ = writeln!(out, "{} : {}", s.primary_label, s.primary_count);
    let _ = writeln!(out, "Fichiers : {}", s.file_count);
    let _ = writeln!(out, "Taille : {}", s.file_size);

    if let Some(details) = &view.details {
        let _ = writeln!(out, "\n{}", details.primary_title);
        for row in &details.primary_rows {
            let _ = writeln!(out, "  {} {} : {}", row.icon, row.name, row.count.text());
        }
        if let Some(sort) = &details.sort {
            let _ = writeln!(out, "\n{}", sort.title);
            for row in &sort.rows {
                let _ = writeln!(out, "  {} : {}", row.name, row.count_text());
            }
        }
    }

    let _ = writeln!(out, "\nFichiers générés");
    for file in &view.files {
        match file.lines_text() {
            Some(lines) => {
                let _ = writeln!(out, "  {} {} ({}) -> {}", file.icon, file.name, lines, file.href);
            }
            None => {
                let _ = writeln!(out, "  {} {} -> {}", file.icon, file.name, file.href);
            }
        }
    }
    out
}

/// Dry run of a submission: selection, validation and the parts to send
pub fn check_submission(
    file: SelectedFile,
    sort_column: SortColumn,
    date_start: &str,
    date_end: &str,
    purpose: &str,
    config: &PanelConfig,
) -> Result<String, PanelError> {
    let mut controller = ViewController::new(config.clone())?;
    let mut out = String::new();

    let size = format_file_size(file.size());
    let name = file.name.clone();
    controller.choose_file(file)?;
    let _ = writeln!(out, "Fichier : {} ({})", name, size);

    controller.set_sort_column(sort_column);
    controller.set_date_start(date_start);
    controller.set_date_end(date_end);
    controller.set_purpose(purpose);

    let submission = controller.begin_submit();
    let marks = controller.marks();
    for field in FieldId::ALL {
        let mark = match marks.get(field) {
            Validity::Valid => "valide",
            Validity::Invalid => "invalide",
            Validity::Unmarked => "-",
        };
        let _ = writeln!(out, "  {} : {}", field.input_id(), mark);
    }

    match submission {
        Ok((_, form)) => {
            let _ = writeln!(out, "POST {}", config.upload_url);
            for part in form.parts() {
                match part.value {
                    PartValue::Text(value) => {
                        let _ = writeln!(out, "  {} = {:?}", part.name, value);
                    }
                    PartValue::File { filename, bytes } => {
                        let _ = writeln!(out, "  {} = {} ({} octets)", part.name, filename, bytes.len());
                    }
                }
            }
        }
        Err(err) => {
            let _ = writeln!(out, "Erreur: {}", err);
        }
    }
    Ok(out)
}
