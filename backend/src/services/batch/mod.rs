//! Converts a 5-column payroll spreadsheet into the fixed-width batch file.
//!
//! The work is split in two pure steps that know nothing about HTTP:
//! - `normalize`: checks that the table has exactly five columns and turns the
//!   identifier, tax id and rubric columns into zero-padded digit strings.
//! - `encode`: renders each canonical row as one fixed-width line using the six
//!   batch inputs collected by the form, numbering repeated tax ids.
//!
//! The provided routes are:
//! - `POST /api/batch/preview`: multipart upload with a `file` part. Returns the
//!   normalized rows as JSON so the user can check the sheet before filling the form.
//!
//! - `POST /api/batch/generate`: multipart upload with a `file` part and a `json` part
//!   holding a `BatchForm`. Returns the generated lines as a `dados.txt` attachment.
//!
//! Any error rejects the whole upload with `400 Bad Request` and a plain message; there
//! is no partial output and nothing is stored on the server.

use actix_web::web::{post, scope};
use actix_web::Scope;

pub mod encode;
pub mod error;
mod generate;
pub mod normalize;
mod pad;
pub mod params;
mod preview;
pub mod sheet;
mod upload;

const API_PATH: &str = "/api/batch";

/// Configures and returns the Actix scope for batch routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Normalize an upload and return the rows for review.
        .route("/preview", post().to(preview::process))
        // Normalize, validate the form and download the batch file.
        .route("/generate", post().to(generate::process))
}
