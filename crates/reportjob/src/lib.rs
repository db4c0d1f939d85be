//! Bridge between a host application and an external report renderer.
//!
//! The crate assembles the renderer's command line from job configuration,
//! executes it through the system shell with a hard timeout, and manages the
//! scratch directory the artifact lands in. Report data can come from the
//! host's database connection, from a CSV file, or from no source at all.
//!
//! ```no_run
//! use reportjob::{DirectoryDelivery, RendererConfig, ReportJob};
//!
//! # fn main() -> reportjob::Result<()> {
//! let mut job = ReportJob::new("templates/invoice.jrxml", "Invoice 2024", RendererConfig::default())?;
//! job.add_parameter("year", "2024");
//! job.generate()?;
//! job.deliver(&DirectoryDelivery::new("/srv/outbox"))?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod delivery;
pub mod error;
pub mod exec;
pub mod job;
pub mod notify;
pub mod source;
pub mod workdir;

pub use command::{sanitize_output_name, Parameters};
pub use config::{load_config, load_config_from_str, RendererConfig};
pub use delivery::{DeliverFile, DirectoryDelivery};
pub use error::{ConfigError, DeliveryError, RenderError, ReportError, Result};
pub use exec::{ExecOutput, ShellRunner, SystemShell};
pub use job::{OutputFormat, ReportJob, RunRecord};
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use source::{CredentialProvider, CsvSource, DataSource, DatabaseCredentials};
