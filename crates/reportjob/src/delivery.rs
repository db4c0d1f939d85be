//! Delivery of the rendered artifact to the caller.

use std::path::{Path, PathBuf};

use crate::error::DeliveryError;

/// Streams a finished artifact out of the job's scratch directory.
///
/// What "streaming" means is the host's business: an HTTP download response,
/// a copy into a shared folder, an attachment on an email. Whether the host
/// ends its request afterwards is equally its own disposition.
pub trait DeliverFile: Send + Sync {
    /// Hands the file at `source` to the host under the display name
    /// `filename`.
    fn deliver(&self, source: &Path, filename: &str) -> Result<(), DeliveryError>;
}

/// Copies artifacts into a target directory.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    target: PathBuf,
}

impl DirectoryDelivery {
    pub fn new<P: AsRef<Path>>(target: P) -> Self {
        Self {
            target: target.as_ref().to_path_buf(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl DeliverFile for DirectoryDelivery {
    fn deliver(&self, source: &Path, filename: &str) -> Result<(), DeliveryError> {
        if !source.is_file() {
            return Err(DeliveryError::MissingArtifact(source.to_path_buf()));
        }

        std::fs::create_dir_all(&self.target).map_err(|e| DeliveryError::Copy {
            from: source.to_path_buf(),
            to: self.target.clone(),
            source: e,
        })?;

        let destination = self.target.join(filename);
        std::fs::copy(source, &destination).map_err(|e| DeliveryError::Copy {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(())
    }
}
