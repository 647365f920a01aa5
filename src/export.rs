//! Spreadsheet (CSV) export of the prospect list.
//!
//! Two layouts: the standard prospect sheet and the campaign sheet carrying
//! the outreach drafts. Quoting follows RFC 4180.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::gateway::prompts::format_usd;
use crate::model::{DraftField, Prospect};

/// Placeholder for a missing optional value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a draft field of an undrafted prospect.
pub const PENDING: &str = "PENDING";

/// Standard sheet headers.
pub const PROSPECT_HEADERS: [&str; 13] = [
    "Company",
    "Industry",
    "City",
    "Address",
    "Phone",
    "Email",
    "Contact Name",
    "Website",
    "Rating",
    "Review Count",
    "Problem Summary",
    "Maps Link",
    "Status",
];

/// Campaign sheet headers.
pub const CAMPAIGN_HEADERS: [&str; 9] = [
    "Company",
    "Representative",
    "Estimated Loss",
    "Email",
    "Phone",
    "Email Subject",
    "Email Body",
    "WhatsApp Message",
    "SMS Message",
];

/// Errors from writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing failed.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// The output file could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// `leadhunter_campaign_<YYYY-MM-DD>.csv`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("leadhunter_campaign_{}.csv", date.format("%Y-%m-%d"))
}

/// Quote a field when it contains a comma, quote, or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_owned()
}

/// Write the standard prospect sheet.
///
/// # Errors
///
/// [`ExportError::Io`] when the writer fails.
pub fn write_prospects_csv<W: Write>(mut writer: W, prospects: &[Prospect]) -> Result<(), ExportError> {
    write_row(&mut writer, &PROSPECT_HEADERS)?;
    for p in prospects {
        let contact = p.owner_name.as_deref().or(p.manager_name.as_deref());
        let summary = Some(p.sentiment_analysis.summary.as_str());
        let row = [
            p.name.clone(),
            p.category.clone(),
            p.city.clone(),
            p.address.clone(),
            or_na(p.phone.as_deref()),
            or_na(p.email.as_deref()),
            or_na(contact),
            or_na(p.website_uri.as_deref()),
            p.rating.map_or_else(|| NOT_AVAILABLE.to_owned(), |r| format!("{r:.1}")),
            p.user_rating_count
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |n| n.to_string()),
            or_na(summary),
            or_na(p.google_maps_uri.as_deref()),
            p.contact_status().as_str().to_owned(),
        ];
        write_row(&mut writer, &row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the campaign sheet with outreach drafts.
///
/// # Errors
///
/// [`ExportError::Io`] when the writer fails.
pub fn write_campaign_csv<W: Write>(mut writer: W, prospects: &[Prospect]) -> Result<(), ExportError> {
    write_row(&mut writer, &CAMPAIGN_HEADERS)?;
    for p in prospects {
        let draft_field = |field: DraftField| {
            p.draft()
                .map(|d| d.get(field))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(PENDING)
                .to_owned()
        };
        let row = [
            p.name.clone(),
            p.contact_label().to_owned(),
            format!(
                "${} USD",
                format_usd(p.sentiment_analysis.estimated_monthly_loss)
            ),
            or_na(p.email.as_deref()),
            or_na(p.phone.as_deref()),
            draft_field(DraftField::Subject),
            draft_field(DraftField::Body),
            draft_field(DraftField::WhatsappMessage),
            draft_field(DraftField::SmsMessage),
        ];
        write_row(&mut writer, &row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the campaign sheet to `dir` under [`default_file_name`].
///
/// # Errors
///
/// [`ExportError::Create`] when the directory or file cannot be created.
pub fn export_campaign_to_dir(
    dir: &Path,
    prospects: &[Prospect],
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(default_file_name(date));
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Create {
        path: dir.to_path_buf(),
        source,
    })?;
    let file = File::create(&path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;
    write_campaign_csv(BufWriter::new(file), prospects)?;
    info!(path = %path.display(), rows = prospects.len(), "campaign exported");
    Ok(path)
}

/// Write the prospect sheet to `path`, replacing any existing file.
///
/// # Errors
///
/// [`ExportError::Create`] when the file cannot be created.
pub fn export_prospects_to_file(path: &Path, prospects: &[Prospect]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_prospects_csv(BufWriter::new(file), prospects)?;
    info!(path = %path.display(), rows = prospects.len(), "prospects exported");
    Ok(())
}
