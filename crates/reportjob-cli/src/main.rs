//! Thin host shell around the `reportjob` library: wires concrete
//! collaborators (directory delivery, log notifier) and drives one job from
//! the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use reportjob::{
    load_config, CsvSource, DataSource, DatabaseCredentials, DirectoryDelivery, LogNotifier,
    OutputFormat, RendererConfig, ReportJob,
};

#[derive(Parser, Debug)]
#[command(
    name = "reportjob",
    version,
    about = "Render a report template through the external renderer",
    group(ArgGroup::new("source").args(["csv", "db_type"]))
)]
struct Cli {
    /// Report template to render.
    template: PathBuf,

    /// Base filename of the artifact (spaces become underscores).
    #[arg(short = 'o', long, default_value = "myreport")]
    output_name: String,

    /// Report parameter as key=value; may be repeated.
    #[arg(short = 'P', long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,

    /// Artifact format.
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    format: FormatArg,

    /// Renderer settings file (JSON); built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the artifact is copied into.
    #[arg(long, default_value = ".")]
    deliver_to: PathBuf,

    /// Print the assembled renderer invocation and exit without running it.
    #[arg(long)]
    show_command: bool,

    /// CSV file used as the data source.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// CSV field delimiter.
    #[arg(long, default_value = ",")]
    csv_field_del: String,

    /// CSV record delimiter, passed to the renderer verbatim.
    #[arg(long, default_value = "\\n")]
    csv_record_del: String,

    /// CSV character set.
    #[arg(long, default_value = "UTF-8")]
    csv_charset: String,

    /// The first CSV row does not name the columns.
    #[arg(long)]
    csv_no_first_row: bool,

    /// Explicit CSV column names, comma separated. Only used together with
    /// --csv-no-first-row.
    #[arg(long, value_delimiter = ',')]
    csv_columns: Vec<String>,

    /// Database driver name understood by the renderer (enables the
    /// database data source).
    #[arg(long)]
    db_type: Option<String>,

    #[arg(long)]
    db_user: Option<String>,

    #[arg(long)]
    db_host: Option<String>,

    #[arg(long)]
    db_name: Option<String>,

    #[arg(long)]
    db_password: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Pdf,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    tracing::info!("Starting reportjob v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match run(cli) {
        Ok(Some(artifact)) => {
            println!("{}", artifact.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RendererConfig::default(),
    };

    let mut job = ReportJob::new(&cli.template, cli.output_name.clone(), config)?
        .with_notifier(Box::new(LogNotifier));
    job.set_format(cli.format.into());

    for (key, value) in &cli.params {
        job.add_parameter(key.clone(), value.clone());
    }

    job.set_data_source(data_source(&cli)?);

    if cli.show_command {
        println!("{}", job.command_line());
        return Ok(None);
    }

    job.generate()?;
    let artifact = job.deliver(&DirectoryDelivery::new(&cli.deliver_to))?;

    Ok(Some(artifact))
}

fn data_source(cli: &Cli) -> Result<DataSource, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.csv {
        let mut csv = CsvSource::new(path);
        csv.field_delimiter = cli.csv_field_del.clone();
        csv.record_delimiter = cli.csv_record_del.clone();
        csv.charset = cli.csv_charset.clone();
        csv.first_row = !cli.csv_no_first_row;
        csv.columns = cli.csv_columns.clone();
        return Ok(DataSource::Csv(csv));
    }

    if let Some(db_type) = &cli.db_type {
        let missing = [
            ("--db-user", cli.db_user.is_none()),
            ("--db-host", cli.db_host.is_none()),
            ("--db-name", cli.db_name.is_none()),
            ("--db-password", cli.db_password.is_none()),
        ]
        .into_iter()
        .filter_map(|(flag, absent)| absent.then_some(flag))
        .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(format!("--db-type also requires {}", missing.join(", ")).into());
        }

        return Ok(DataSource::Database(DatabaseCredentials {
            db_type: db_type.clone(),
            user: cli.db_user.clone().unwrap_or_default(),
            host: cli.db_host.clone().unwrap_or_default(),
            name: cli.db_name.clone().unwrap_or_default(),
            password: cli.db_password.clone().unwrap_or_default(),
        }));
    }

    Ok(DataSource::Empty)
}
