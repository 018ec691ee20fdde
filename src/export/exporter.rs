use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use crate::export::layout::{
    FOOTER_BOTTOM, FOOTER_SIZE, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, TITLE_SIZE, TITLE_TOP,
    blocks_from_html, paginate, text_width,
};
use crate::export::pdf::{PdfDocument, PdfPage, TextItem};

pub const DEFAULT_PRODUCT_NAME: &str = "XtarzLearn";

/// User-facing message for any export failure.
pub const EXPORT_FAILED_MESSAGE: &str = "Error generating PDF. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    /// The staging region has nothing to export
    #[error("nothing to export: staging region '{0}' is empty")]
    EmptyStaging(String),

    /// The staging region is not on the page
    #[error("staging region '{0}' not found")]
    MissingStaging(String),

    #[error("failed to render PDF: {0}")]
    Render(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where exported documents go and how they are stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub product_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
        }
    }
}

/// Longest topic stem kept in a filename, so the name stays under NAME_MAX.
pub const MAX_STEM_CHARS: usize = 200;

/// Download name for a topic on a given day: `Algebra_Basics_2024-03-05.pdf`.
///
/// Anything that is not an ASCII letter or digit becomes `_`.
pub fn export_filename(topic: &str, date: NaiveDate) -> String {
    let safe: String = topic
        .chars()
        .take(MAX_STEM_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.pdf", safe, date.format("%Y-%m-%d"))
}

/// Footer text for page `index` (1-based) of `total`.
pub fn footer_text(index: usize, total: usize, product: &str) -> String {
    format!("Page {} of {} - Generated by {}", index, total, product)
}

/// Lay out a title and staged markup as a paginated document.
pub fn build_document(title: &str, staged_html: &str, product: &str) -> PdfDocument {
    let blocks = blocks_from_html(staged_html);
    let laid_out = paginate(&blocks);
    let total = laid_out.len();

    let pages = laid_out
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let mut items = Vec::with_capacity(page.lines.len() + 2);
            if i == 0 {
                items.push(TextItem {
                    text: title.to_string(),
                    x: MARGIN,
                    y: TITLE_TOP,
                    size: TITLE_SIZE,
                    bold: false,
                });
            }
            items.extend(page.lines.into_iter().map(|line| TextItem {
                text: line.text,
                x: line.x,
                y: line.y,
                size: line.size,
                bold: line.bold,
            }));

            let footer = footer_text(i + 1, total, product);
            let width = text_width(&footer, FOOTER_SIZE, false);
            items.push(TextItem {
                x: ((PAGE_WIDTH - width) / 2.0).max(0.0),
                y: PAGE_HEIGHT - FOOTER_BOTTOM,
                size: FOOTER_SIZE,
                bold: false,
                text: footer,
            });

            PdfPage { items }
        })
        .collect();

    PdfDocument { pages }
}

/// Build the document in memory and write it into `settings.output_dir`.
///
/// Nothing is left on disk when the write fails part-way.
pub fn export_to_dir(
    title: &str,
    staged_html: &str,
    date: NaiveDate,
    settings: &ExportSettings,
) -> Result<PathBuf, ExportError> {
    let document = build_document(title, staged_html, &settings.product_name);
    let bytes = document
        .to_bytes(title)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    let path = settings.output_dir.join(export_filename(title, date));

    write_all_or_nothing(&path, &bytes)?;
    info!(path = %path.display(), pages = document.page_count(), "exported document");
    Ok(path)
}

fn write_all_or_nothing(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    if let Err(source) = fs::write(path, bytes) {
        error!(path = %path.display(), error = %source, "export write failed");
        let _ = fs::remove_file(path);
        return Err(ExportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
