/*!
# Deck Upload

Browser-side controller for the page that turns an Excel workbook of site
visits into one generated deck per group.

## Overview

The user drops (or picks) a `.xlsx`/`.xls` workbook, chooses the column to
group by, optionally fills in the visit dates and purpose, and submits. The
server answers with statistics about the workbook and the list of generated
files; the page shows both, with a download link per file.

## Architecture

### Controller Layer
- **Validator** - file extension rule and visit date consistency, with
  valid/invalid markers for each field group
- **Selection** - the single selected file
- **Dispatcher** - builds the multipart upload, sends it through a
  `Transport`, routes the reply
- **View Controller** - owns all page state, one method per user action

### Presentation Layer
- **Visibility** - which page sections are shown; loading, results and
  error are mutually exclusive
- **Render** - maps a typed `ViewState` to a list of `NodeUpdate`s
- **Templates** - handlebars fragments for the list rows

### Browser Layer (feature `web`)
- **DOM binding** - event wiring, `fetch` transport, applying node updates

## Modules

- **config**: endpoint URLs and fallback messages
- **error**: `PanelError` and the user-facing messages
- **form**: sort column, visit information, multipart parts
- **validator**: field validation
- **selection**: selected file handling
- **response**: upload reply model, both server generations
- **dispatcher**: transport trait and reply routing
- **visibility**: page state machine
- **render**: declarative rendering
- **templates**: HTML row fragments
- **controller**: the view controller
- **preview**: plain-text rendering for the command line
- **sample**: sample workbook generation (feature `cli`)
- **dom**: WebAssembly entry point (feature `web`)

## REST API Endpoints

- `POST /upload/` - multipart `file`, `sort_column`, `date_debut`,
  `date_fin`, `objet_visite`; JSON reply
- `GET /download/{filename}/` - generated file as an attachment
*/

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod dom;
pub mod error;
pub mod form;
pub mod preview;
pub mod render;
pub mod response;
pub mod sample;
pub mod selection;
pub mod templates;
pub mod validator;
pub mod visibility;

/// Re-export the types most callers need
pub use config::PanelConfig;
pub use controller::{Ticket, ViewController};
pub use dispatcher::{Outcome, Transport, TransportError};
pub use error::PanelError;
pub use form::{SortColumn, UploadForm, VisitInfo};
pub use render::{NodeUpdate, ViewState};
pub use response::{Stats, UploadResponse, UploadResult};
pub use selection::SelectedFile;
pub use visibility::{PageState, Panel};
