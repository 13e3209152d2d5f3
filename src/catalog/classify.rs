//! Turning a catalog response into a [`CatalogResult`].
//!
//! This is the only place that knows what a catalog "files" page looks like:
//! a table whose rows carry the columns listed in [`FileColumn::ALL`]. When the
//! markup changes, only this module has to follow.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::package::OutlierTable;

/// Where an unknown status code gets looked up.
const STATUS_CODE_LOOKUP_URL: &str = "https://www.google.ca/search?q=status+code+";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(ROW_SELECTOR, "tr");
selector!(CELL_SELECTOR, "td");

/// Columns of the catalog's file table, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileColumn {
    Type,
    Name,
    Size,
    Uploaded,
    GameVersion,
    Downloads,
    Actions,
}

impl FileColumn {
    pub const ALL: [FileColumn; 7] = [
        FileColumn::Type,
        FileColumn::Name,
        FileColumn::Size,
        FileColumn::Uploaded,
        FileColumn::GameVersion,
        FileColumn::Downloads,
        FileColumn::Actions,
    ];

    /// Header text as shown on the catalog page.
    pub fn header(&self) -> &'static str {
        match self {
            FileColumn::Type => "Type",
            FileColumn::Name => "Name",
            FileColumn::Size => "Size",
            FileColumn::Uploaded => "Uploaded",
            FileColumn::GameVersion => "Game Version",
            FileColumn::Downloads => "Downloads",
            FileColumn::Actions => "Actions",
        }
    }
}

/// One row of the file table. A column is `None` when the row was too short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub size: Option<String>,
    pub uploaded: Option<String>,
    pub game_version: Option<String>,
    pub downloads: Option<String>,
    pub actions: Option<String>,
}

impl FileRow {
    /// Assign cells to columns by position. Cells past the last column are dropped.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut row = FileRow::default();
        for (column, value) in FileColumn::ALL.iter().zip(cells) {
            *row.slot(*column) = Some(value);
        }
        row
    }

    pub fn get(&self, column: FileColumn) -> Option<&str> {
        match column {
            FileColumn::Type => self.kind.as_deref(),
            FileColumn::Name => self.name.as_deref(),
            FileColumn::Size => self.size.as_deref(),
            FileColumn::Uploaded => self.uploaded.as_deref(),
            FileColumn::GameVersion => self.game_version.as_deref(),
            FileColumn::Downloads => self.downloads.as_deref(),
            FileColumn::Actions => self.actions.as_deref(),
        }
    }

    /// Number of populated columns.
    pub fn populated(&self) -> usize {
        FileColumn::ALL
            .iter()
            .filter(|column| self.get(**column).is_some())
            .count()
    }

    fn slot(&mut self, column: FileColumn) -> &mut Option<String> {
        match column {
            FileColumn::Type => &mut self.kind,
            FileColumn::Name => &mut self.name,
            FileColumn::Size => &mut self.size,
            FileColumn::Uploaded => &mut self.uploaded,
            FileColumn::GameVersion => &mut self.game_version,
            FileColumn::Downloads => &mut self.downloads,
            FileColumn::Actions => &mut self.actions,
        }
    }
}

/// What a catalog lookup amounted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// 2xx, the file table was scraped
    Ok,
    /// 404 for a mod listed in the outlier table
    NotFoundKnown { reference_url: String },
    /// 404 for anything else
    NotFoundUnknown,
    /// 403, almost always a bot-detection challenge
    Blocked,
    /// 503
    Unavailable,
    /// 504
    TimedOut,
    /// Any other status
    UnknownStatus {
        // Already on the enclosing result
        #[serde(skip_serializing)]
        status: u16,
    },
    /// The request never produced an HTTP response
    NetworkError { message: String },
}

impl Outcome {
    pub fn from_status(status: u16, slug: &str, outliers: &OutlierTable) -> Self {
        match status {
            200..=299 => Outcome::Ok,
            404 => match outliers.get(slug) {
                Some(url) => Outcome::NotFoundKnown {
                    reference_url: url.to_string(),
                },
                None => Outcome::NotFoundUnknown,
            },
            403 => Outcome::Blocked,
            503 => Outcome::Unavailable,
            504 => Outcome::TimedOut,
            status => Outcome::UnknownStatus { status },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Outcome::Blocked)
    }

    /// Short uppercase label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ok => "OK",
            Outcome::NotFoundKnown { .. } => "KNOWN MOD",
            Outcome::NotFoundUnknown => "NOT FOUND",
            Outcome::Blocked => "FORBIDDEN",
            Outcome::Unavailable => "UNAVAILABLE",
            Outcome::TimedOut => "TIMED OUT",
            Outcome::UnknownStatus { .. } => "UNKNOWN",
            Outcome::NetworkError { .. } => "NETWORK ERROR",
        }
    }

    /// What the user should do about it, if anything.
    pub fn hint(&self) -> Option<String> {
        match self {
            Outcome::Ok => None,
            Outcome::NotFoundKnown { reference_url } => Some(format!("see {}", reference_url)),
            Outcome::NotFoundUnknown => Some("check the URL manually".to_string()),
            Outcome::Blocked => Some("request is likely captcha blocked".to_string()),
            Outcome::Unavailable => {
                Some("server is overloaded or in maintenance".to_string())
            }
            Outcome::TimedOut => Some("request timed out, is the catalog down?".to_string()),
            Outcome::UnknownStatus { status } => {
                Some(format!("see {}{}", STATUS_CODE_LOOKUP_URL, status))
            }
            Outcome::NetworkError { message } => Some(message.clone()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hint() {
            Some(hint) => write!(f, "{} ({})", self.label(), hint),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// Result of looking up one slug on the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogResult {
    pub slug: String,
    pub url: String,
    /// HTTP status, absent for network errors
    pub status: Option<u16>,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// File table rows; empty unless the outcome is [`Outcome::Ok`]
    pub attributes: Vec<FileRow>,
}

/// Classify an HTTP response for `slug`.
pub fn classify(
    slug: &str,
    url: &str,
    status: u16,
    body: &str,
    outliers: &OutlierTable,
) -> CatalogResult {
    let outcome = Outcome::from_status(status, slug, outliers);
    let attributes = if outcome.is_ok() {
        parse_file_rows(body)
    } else {
        Vec::new()
    };

    CatalogResult {
        slug: slug.to_string(),
        url: url.to_string(),
        status: Some(status),
        outcome,
        attributes,
    }
}

/// Build the result for a request that failed below HTTP.
pub fn network_failure(slug: &str, url: &str, error: &anyhow::Error) -> CatalogResult {
    CatalogResult {
        slug: slug.to_string(),
        url: url.to_string(),
        status: None,
        outcome: Outcome::NetworkError {
            message: format!("{:#}", error),
        },
        attributes: Vec::new(),
    }
}

/// Scrape every table row, one record per `<tr>`.
///
/// Header rows have no `<td>` cells and come out as empty records.
pub fn parse_file_rows(body: &str) -> Vec<FileRow> {
    let document = Html::parse_document(body);
    document
        .select(&ROW_SELECTOR)
        .map(|row| FileRow::from_cells(row.select(&CELL_SELECTOR).map(cell_text)))
        .collect()
}

/// Trimmed cell text, cut at the first line break.
fn cell_text(cell: ElementRef<'_>) -> String {
    let text = cell.text().collect::<String>();
    text.trim().lines().next().unwrap_or_default().trim().to_string()
}
