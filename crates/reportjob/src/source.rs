//! Data sources the renderer can pull report rows from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the renderer reads its data.
///
/// Mode-specific settings travel inside the variant, so a job cannot carry
/// CSV settings while pointing at a database.
#[derive(Debug, Clone, Default)]
pub enum DataSource {
    /// The template is rendered without any backing data.
    #[default]
    Empty,
    /// Rows come from the host application's database.
    Database(DatabaseCredentials),
    /// Rows come from a CSV file on disk.
    Csv(CsvSource),
}

impl DataSource {
    /// Builds a database source from the host's live connection settings.
    pub fn database_from(provider: &dyn CredentialProvider) -> Self {
        DataSource::Database(provider.credentials())
    }
}

/// Connection settings handed through to the renderer's database flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseCredentials {
    /// Driver name the renderer understands, e.g. `mysql` or `postgres`.
    pub db_type: String,
    pub user: String,
    pub host: String,
    /// Database (schema) name.
    pub name: String,
    pub password: String,
}

/// Seam for pulling connection settings out of the host application.
///
/// The host typically owns an open database handle; this trait lets it feed
/// the same credentials to the renderer without the library knowing about the
/// host's database layer.
pub trait CredentialProvider {
    fn credentials(&self) -> DatabaseCredentials;
}

/// Settings for a CSV-backed report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSource {
    /// The CSV file the renderer reads.
    pub path: PathBuf,
    #[serde(default = "default_field_delimiter")]
    pub field_delimiter: String,
    /// Passed to the renderer verbatim; the default is the two-character
    /// escape sequence `\n`, which the renderer interprets itself.
    #[serde(default = "default_record_delimiter")]
    pub record_delimiter: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    /// True when the first row of the file names the columns.
    #[serde(default = "default_true")]
    pub first_row: bool,
    /// Column names used when `first_row` is false.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl CsvSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            field_delimiter: default_field_delimiter(),
            record_delimiter: default_record_delimiter(),
            charset: default_charset(),
            first_row: true,
            columns: Vec::new(),
        }
    }
}

fn default_field_delimiter() -> String {
    ",".to_string()
}

fn default_record_delimiter() -> String {
    "\\n".to_string()
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_true() -> bool {
    true
}
