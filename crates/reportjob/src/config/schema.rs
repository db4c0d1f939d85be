use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the external renderer installation.
///
/// Every field has a default, so `{}` is a valid config file and hosts can
/// override only what differs on their machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Java runtime used to launch the renderer.
    #[serde(default = "default_java_path")]
    pub java_path: PathBuf,
    /// Root of the renderer installation; the jar location is derived from it
    /// unless `jar_path` is set explicitly.
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,
    /// Renderer release. Part of the derived jar path and of the
    /// renderer-not-found message.
    #[serde(default = "default_version")]
    pub version: String,
    /// Explicit jar location, overriding the derived one.
    #[serde(default)]
    pub jar_path: Option<PathBuf>,
    /// Locale exported as `LC_ALL` for the renderer process. Choose one from
    /// `locale -a` that covers all characters the reports use, such as
    /// German umlauts.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Hard ceiling on a single renderer run, in seconds. The child is
    /// killed when it is exceeded.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Parent directory for job scratch directories; the system temp
    /// directory when unset.
    #[serde(default)]
    pub work_root: Option<PathBuf>,
}

impl RendererConfig {
    /// Location of the renderer jar: the explicit override when set,
    /// otherwise `<install_root>/lib/jasperstarter-<version>/lib/jasperstarter.jar`.
    pub fn jar_path(&self) -> PathBuf {
        match &self.jar_path {
            Some(path) => path.clone(),
            None => self.install_root.join(format!(
                "lib/jasperstarter-{}/lib/jasperstarter.jar",
                self.version
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            java_path: default_java_path(),
            install_root: default_install_root(),
            version: default_version(),
            jar_path: None,
            locale: default_locale(),
            timeout_secs: default_timeout_secs(),
            work_root: None,
        }
    }
}

fn default_java_path() -> PathBuf {
    PathBuf::from("/usr/bin/java")
}

fn default_install_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_version() -> String {
    "2.0.0".to_string()
}

fn default_locale() -> String {
    "de_DE.UTF-8".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}
