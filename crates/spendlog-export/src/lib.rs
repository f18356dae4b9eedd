//! spendlog-export
//!
//! Serializers that turn a selected set of expenses into CSV, JSON or PDF
//! documents. Each call is independent; nothing is shared between exports.

pub mod csv_export;
pub mod error;
pub mod format;
pub mod json_export;
pub mod pdf_export;

use chrono::{DateTime, Utc};
use tracing::info;

use spendlog_domain::Expense;

pub use csv_export::to_csv;
pub use error::ExportError;
pub use format::{default_file_stem, file_stem, ExportFormat, DEFAULT_FILE_PREFIX};
pub use json_export::{to_json, ExportEnvelope};
pub use pdf_export::{to_pdf, PdfLayout, PdfOptions};

/// Rendered export ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Single entry point over the three serializers.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    pdf: PdfOptions,
}

impl Exporter {
    pub fn new(pdf: PdfOptions) -> Self {
        Self { pdf }
    }

    pub fn render(
        &self,
        format: ExportFormat,
        expenses: &[Expense],
        now: DateTime<Utc>,
    ) -> Result<ExportPayload, ExportError> {
        let bytes = match format {
            ExportFormat::Csv => to_csv(expenses).into_bytes(),
            ExportFormat::Json => to_json(expenses, now)?.into_bytes(),
            ExportFormat::Pdf => to_pdf(expenses, &self.pdf, now)?,
        };
        info!(
            format = %format,
            records = expenses.len(),
            bytes = bytes.len(),
            "rendered export"
        );
        Ok(ExportPayload { format, bytes })
    }
}
