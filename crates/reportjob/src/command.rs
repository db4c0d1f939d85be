//! Assembly of the shell line handed to the renderer.
//!
//! The renderer's command syntax is a fixed external protocol:
//! `export LC_ALL="<locale>"; <java> -jar <jar> pr <template> -f <fmt>
//! -o <output> [-P  k="v" ...] <data source flags>`. Everything here is pure
//! string building; execution lives in [`crate::exec`].

use std::fmt::Write;
use std::path::Path;

use crate::config::RendererConfig;
use crate::job::OutputFormat;
use crate::source::DataSource;

/// Report parameters passed through to the renderer, in insertion order.
///
/// Inserting an existing key overwrites its value but keeps the original
/// position. Values are quoted at assembly time, not here.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Parameters::new();
        for (key, value) in iter {
            parameters.insert(key, value);
        }
        parameters
    }
}

/// Replaces spaces in the requested output name so the artifact path needs no
/// shell quoting.
pub fn sanitize_output_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Wraps `value` in double quotes, escaping embedded quotes as `\"`.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Builds the complete shell line for one renderer run.
pub(crate) fn render_command(
    config: &RendererConfig,
    template: &Path,
    format: OutputFormat,
    output_file: &Path,
    parameters: &Parameters,
    source: &DataSource,
) -> String {
    // Writing to a String cannot fail, so the write! results are discarded.
    let mut line = String::new();
    let _ = write!(line, "export LC_ALL=\"{}\"; ", config.locale);
    let _ = write!(line, "{}", config.java_path.display());
    let _ = write!(line, " -jar {} pr", config.jar_path().display());
    let _ = write!(line, " {}", template.display());
    let _ = write!(line, " -f {} ", format.as_str());
    let _ = write!(line, " -o {}", output_file.display());

    if !parameters.is_empty() {
        line.push_str(" -P ");
        for (key, value) in parameters.iter() {
            let _ = write!(line, " {}={}", key, quote(value));
        }
    }

    match source {
        DataSource::Empty => {}
        DataSource::Database(db) => {
            let _ = write!(
                line,
                " -t {} -u {} -H {} -n {} -p {}",
                db.db_type, db.user, db.host, db.name, db.password
            );
        }
        DataSource::Csv(csv) => {
            let _ = write!(line, " -t csv --data-file {}", csv.path.display());
            let _ = write!(line, " --csv-field-del={}", quote(&csv.field_delimiter));
            let _ = write!(line, " --csv-record-del={}", quote(&csv.record_delimiter));
            let _ = write!(line, " --csv-charset={}", csv.charset);
            if csv.first_row {
                line.push_str(" --csv-first-row");
            } else if !csv.columns.is_empty() {
                let _ = write!(line, " --csv-columns {}", csv.columns.join(","));
            }
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CsvSource, DatabaseCredentials};
    use std::path::PathBuf;

    fn test_config() -> RendererConfig {
        RendererConfig {
            install_root: PathBuf::from("/opt/renderer"),
            ..Default::default()
        }
    }

    fn build(parameters: &Parameters, source: &DataSource) -> String {
        render_command(
            &test_config(),
            Path::new("/srv/templates/rpt.xml"),
            OutputFormat::Pdf,
            Path::new("/tmp/work/My_Report"),
            parameters,
            source,
        )
    }

    #[test]
    fn test_basic_line_shape() {
        let line = build(&Parameters::new(), &DataSource::Empty);
        assert!(line.starts_with("export LC_ALL=\"de_DE.UTF-8\"; /usr/bin/java -jar "));
        assert!(line.contains("/opt/renderer/lib/jasperstarter-2.0.0/lib/jasperstarter.jar pr"));
        assert!(line.contains(" /srv/templates/rpt.xml -f pdf "));
        assert!(line.contains(" -o /tmp/work/My_Report"));
    }

    #[test]
    fn test_empty_source_emits_no_source_flags() {
        let line = build(&Parameters::new(), &DataSource::Empty);
        assert!(!line.contains(" -t "));
        assert!(!line.contains("--data-file"));
        assert!(!line.contains(" -u "));
    }

    #[test]
    fn test_parameters_are_quoted_and_ordered() {
        let parameters: Parameters =
            [("year", "2024"), ("campus", "north"), ("term", "HS")].into_iter().collect();
        let line = build(&parameters, &DataSource::Empty);

        assert!(line.contains(r#" -P  year="2024" campus="north" term="HS""#));
    }

    #[test]
    fn test_parameter_block_uses_double_space_after_flag() {
        let parameters: Parameters = [("year", "2024")].into_iter().collect();
        let line = build(&parameters, &DataSource::Empty);
        assert!(line.contains(r#"-P  year="2024""#));
    }

    #[test]
    fn test_no_parameter_flag_without_parameters() {
        let line = build(&Parameters::new(), &DataSource::Empty);
        assert!(!line.contains(" -P "));
    }

    #[test]
    fn test_double_quotes_in_values_are_escaped() {
        let parameters: Parameters = [("title", r#"Annual "Summary" 2024"#)].into_iter().collect();
        let line = build(&parameters, &DataSource::Empty);
        assert!(line.contains(r#"title="Annual \"Summary\" 2024""#));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut parameters = Parameters::new();
        parameters.insert("year", "2023");
        parameters.insert("campus", "north");
        parameters.insert("year", "2024");

        let collected: Vec<_> = parameters.iter().collect();
        assert_eq!(collected, vec![("year", "2024"), ("campus", "north")]);
    }

    #[test]
    fn test_database_flags_in_fixed_order() {
        let source = DataSource::Database(DatabaseCredentials {
            db_type: "mysql".to_string(),
            user: "webapp".to_string(),
            host: "db.internal".to_string(),
            name: "lms".to_string(),
            password: "s3cret".to_string(),
        });
        let line = build(&Parameters::new(), &source);
        assert!(line.ends_with(" -t mysql -u webapp -H db.internal -n lms -p s3cret"));
    }

    #[test]
    fn test_csv_flags_with_first_row() {
        let mut csv = CsvSource::new("/data/grades.csv");
        csv.field_delimiter = ";".to_string();
        // Columns are set but must lose against the first-row flag
        csv.columns = vec!["a".to_string(), "b".to_string()];
        let line = build(&Parameters::new(), &DataSource::Csv(csv));

        assert!(line.contains(" -t csv --data-file /data/grades.csv"));
        assert!(line.contains(r#"--csv-field-del=";""#));
        assert!(line.contains(r#"--csv-record-del="\n""#));
        assert!(line.contains("--csv-charset=UTF-8"));
        assert!(line.contains("--csv-first-row"));
        assert!(!line.contains("--csv-columns"));
    }

    #[test]
    fn test_csv_explicit_columns_without_first_row() {
        let mut csv = CsvSource::new("/data/grades.csv");
        csv.first_row = false;
        csv.columns = vec!["name".to_string(), "grade".to_string(), "term".to_string()];
        let line = build(&Parameters::new(), &DataSource::Csv(csv));

        assert!(!line.contains("--csv-first-row"));
        assert!(line.contains("--csv-columns name,grade,term"));
    }

    #[test]
    fn test_csv_no_first_row_and_no_columns_emits_neither_flag() {
        let mut csv = CsvSource::new("/data/grades.csv");
        csv.first_row = false;
        let line = build(&Parameters::new(), &DataSource::Csv(csv));

        assert!(!line.contains("--csv-first-row"));
        assert!(!line.contains("--csv-columns"));
        // The rest of the CSV block is still present
        assert!(line.contains("--csv-charset=UTF-8"));
    }

    #[test]
    fn test_html_format_flag() {
        let line = render_command(
            &test_config(),
            Path::new("rpt.xml"),
            OutputFormat::Html,
            Path::new("/tmp/work/out"),
            &Parameters::new(),
            &DataSource::Empty,
        );
        assert!(line.contains(" -f html "));
    }

    #[test]
    fn test_sanitize_output_name_replaces_spaces() {
        assert_eq!(sanitize_output_name("My Report"), "My_Report");
        assert_eq!(sanitize_output_name("a b c"), "a_b_c");
        assert_eq!(sanitize_output_name("plain"), "plain");
    }
}
