//! The report job: one configured unit of work producing one artifact.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::command::{render_command, sanitize_output_name, Parameters};
use crate::config::RendererConfig;
use crate::delivery::DeliverFile;
use crate::error::{RenderError, Result};
use crate::exec::{ShellRunner, SystemShell};
use crate::notify::{Notifier, NullNotifier};
use crate::source::DataSource;
use crate::workdir::WorkDir;

/// Artifact format requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Html,
}

impl OutputFormat {
    /// Value passed to the renderer's `-f` flag; the renderer also appends it
    /// to the output file as the extension.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic record of the most recent renderer run.
///
/// This is the raw side of a run's outcome; the presentable failure message
/// lives in [`RenderError`].
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// The exact shell line that was executed.
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    /// Exit code of the shell, when it exited normally.
    pub exit_code: Option<i32>,
    /// Raw stdout/stderr lines captured from the renderer.
    pub output: Vec<String>,
}

/// A configured report rendering job.
///
/// The job owns a scratch directory for its whole lifetime; dropping the job
/// removes the directory and anything the renderer left in it. A failed run
/// leaves the job regenerable: `generate` can simply be called again.
pub struct ReportJob {
    id: Uuid,
    template: PathBuf,
    output_name: String,
    format: OutputFormat,
    parameters: Parameters,
    data_source: DataSource,
    notification: Option<String>,
    config: RendererConfig,
    workdir: WorkDir,
    output_file: Option<PathBuf>,
    generated: bool,
    last_run: Option<RunRecord>,
    runner: Box<dyn ShellRunner>,
    notifier: Box<dyn Notifier>,
}

impl ReportJob {
    /// Creates a job for `template`, provisioning a fresh scratch directory.
    ///
    /// `output_name` is the base filename of the artifact; spaces are
    /// replaced with underscores when the output path is derived.
    pub fn new<T, N>(template: T, output_name: N, config: RendererConfig) -> Result<Self>
    where
        T: Into<PathBuf>,
        N: Into<String>,
    {
        let id = Uuid::new_v4();
        let workdir = WorkDir::new(config.work_root.as_deref(), &id.to_string())?;

        Ok(Self {
            id,
            template: template.into(),
            output_name: output_name.into(),
            format: OutputFormat::Pdf,
            parameters: Parameters::new(),
            data_source: DataSource::Empty,
            notification: None,
            config,
            workdir,
            output_file: None,
            generated: false,
            last_run: None,
            runner: Box::new(SystemShell),
            notifier: Box::new(NullNotifier),
        })
    }

    /// Swaps in a different shell runner. Hosts with their own process
    /// management use this; so do tests.
    pub fn with_runner(mut self, runner: Box<dyn ShellRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Sets the sink for user-visible outcome messages.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn set_output_name<N: Into<String>>(&mut self, output_name: N) {
        self.output_name = output_name.into();
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Adds one parameter, overwriting an existing key in place.
    pub fn add_parameter<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.parameters.insert(key, value);
    }

    /// Replaces the whole parameter set.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn data_source(&self) -> &DataSource {
        &self.data_source
    }

    pub fn set_data_source(&mut self, data_source: DataSource) {
        self.data_source = data_source;
    }

    /// Message pushed to the notifier after a successful run. Failures are
    /// always pushed, with the failure text.
    pub fn set_notification<M: Into<String>>(&mut self, message: M) {
        self.notification = Some(message.into());
    }

    /// The scratch directory this job renders into.
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// The derived artifact base path; `None` until a run has started.
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn generated(&self) -> bool {
        self.generated
    }

    /// Diagnostics of the most recent run, successful or not.
    pub fn last_run(&self) -> Option<&RunRecord> {
        self.last_run.as_ref()
    }

    /// The shell line `generate` would execute right now.
    pub fn command_line(&self) -> String {
        render_command(
            &self.config,
            &self.template,
            self.format,
            &self.derived_output_file(),
            &self.parameters,
            &self.data_source,
        )
    }

    /// Runs the renderer once and returns the artifact base path on success.
    ///
    /// The renderer is silent on success, so any captured output line counts
    /// as a failure; exit code 127 maps to a renderer-not-found error. A
    /// failed run leaves `generated` false and the job retryable. The run is
    /// killed when it exceeds the configured timeout.
    pub fn generate(&mut self) -> Result<PathBuf> {
        let span = tracing::info_span!(
            "report.generate",
            job_id = %self.id,
            template = %self.template.display(),
        );
        let _guard = span.entered();

        let output_file = self.derived_output_file();
        self.output_file = Some(output_file.clone());

        let command = render_command(
            &self.config,
            &self.template,
            self.format,
            &output_file,
            &self.parameters,
            &self.data_source,
        );
        tracing::debug!(command = %command, "assembled renderer invocation");

        let started_at = Utc::now();
        let clock = Instant::now();
        let outcome = self.runner.run(&command, self.config.timeout());
        let duration = clock.elapsed();

        let output = match outcome {
            Ok(output) => output,
            Err(err) => {
                self.last_run = Some(RunRecord {
                    command,
                    started_at,
                    duration,
                    exit_code: None,
                    output: Vec::new(),
                });
                tracing::error!(error = %err, "renderer run failed to complete");
                self.notifier.failure(&err.to_string());
                return Err(err.into());
            }
        };

        self.last_run = Some(RunRecord {
            command,
            started_at,
            duration,
            exit_code: output.code,
            output: output.lines.clone(),
        });

        if output.code == Some(127) {
            let err = RenderError::RendererNotFound {
                version: self.config.version.clone(),
            };
            tracing::warn!(code = 127, "renderer binary missing");
            self.notifier.failure(&err.to_string());
            return Err(err.into());
        }

        if !output.lines.is_empty() {
            let err = RenderError::RendererFailed {
                output: output.joined(),
            };
            tracing::warn!(lines = output.lines.len(), "renderer reported errors");
            self.notifier.failure(&err.to_string());
            return Err(err.into());
        }

        self.generated = true;
        tracing::info!(output = %output_file.display(), "report generated");
        if let Some(message) = &self.notification {
            self.notifier.info(message);
        }

        Ok(output_file)
    }

    /// Streams the finished artifact to `sink`, generating it first if the
    /// job has not run successfully yet.
    ///
    /// The delivered file carries the format extension the renderer appended
    /// (`<output>.pdf` by default). Returns the artifact path.
    pub fn deliver(&mut self, sink: &dyn DeliverFile) -> Result<PathBuf> {
        let base = match (&self.output_file, self.generated) {
            (Some(path), true) => path.clone(),
            _ => self.generate()?,
        };

        let artifact = PathBuf::from(format!("{}.{}", base.display(), self.format.as_str()));
        let filename = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("report")
            .to_string();

        sink.deliver(&artifact, &filename)?;
        tracing::info!(artifact = %artifact.display(), "report delivered");

        Ok(artifact)
    }

    fn derived_output_file(&self) -> PathBuf {
        self.workdir
            .path()
            .join(sanitize_output_name(&self.output_name))
    }
}

impl std::fmt::Debug for ReportJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportJob")
            .field("id", &self.id)
            .field("template", &self.template)
            .field("output_name", &self.output_name)
            .field("format", &self.format)
            .field("parameters", &self.parameters.len())
            .field("generated", &self.generated)
            .field("workdir", &self.workdir.path())
            .finish()
    }
}
