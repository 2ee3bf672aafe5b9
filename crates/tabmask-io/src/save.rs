use std::fs::{OpenOptions, create_dir_all};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use tabmask_core::Dataset;
use tabmask_mask::OperationLog;

use crate::errors::SaveError;
use crate::load::Delimiter;
use crate::output::{DatasetWriter, OutputFormat};

/// Retry schedule for transient (permission-denied) publish failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Asks where the masked file should go.
pub trait DestinationPrompt {
    /// Return the chosen path, or `None` when the user cancels.
    fn choose_destination(&mut self, suggested: &Path) -> Option<PathBuf>;
}

impl<P: DestinationPrompt + ?Sized> DestinationPrompt for Box<P> {
    fn choose_destination(&mut self, suggested: &Path) -> Option<PathBuf> {
        (**self).choose_destination(suggested)
    }
}

/// Accepts the suggested destination without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptSuggested;

impl DestinationPrompt for AcceptSuggested {
    fn choose_destination(&mut self, suggested: &Path) -> Option<PathBuf> {
        Some(suggested.to_path_buf())
    }
}

/// Always answers with the same path.
#[derive(Debug, Clone)]
pub struct FixedDestination(pub PathBuf);

impl DestinationPrompt for FixedDestination {
    fn choose_destination(&mut self, _suggested: &Path) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Always cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelPrompt;

impl DestinationPrompt for CancelPrompt {
    fn choose_destination(&mut self, _suggested: &Path) -> Option<PathBuf> {
        None
    }
}

/// Moves a staged file to its final destination.
pub trait Publisher {
    fn publish(&self, staged: &Path, destination: &Path) -> io::Result<()>;
}

/// Copies into a sibling temporary file, syncs it and renames it over the
/// destination, so the destination is either untouched or complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPublisher;

impl Publisher for FsPublisher {
    fn publish(&self, staged: &Path, destination: &Path) -> io::Result<()> {
        let parent = destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            create_dir_all(parent)?;
        }

        let tmp_path = sibling_temp_path(destination)?;
        let result = copy_and_rename(staged, &tmp_path, destination, parent);
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        result
    }
}

fn copy_and_rename(
    staged: &Path,
    tmp_path: &Path,
    destination: &Path,
    parent: Option<&Path>,
) -> io::Result<()> {
    std::fs::copy(staged, tmp_path)?;
    OpenOptions::new().write(true).open(tmp_path)?.sync_all()?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    std::fs::rename(tmp_path, destination)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }
    Ok(())
}

fn sibling_temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name")
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Default destination: `{stem}_masked.{ext}` next to the source file.
pub fn default_destination(source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    source.with_file_name(format!("{stem}_masked.{}", format.extension()))
}

/// Result of a save that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Cancelled,
}

/// Append the user-facing log entry for a save result.
pub fn record_save_outcome(result: &Result<SaveOutcome, SaveError>, log: &mut OperationLog) {
    match result {
        Ok(SaveOutcome::Saved(path)) => {
            log.push(format!("Saved masked data to '{}'.", path.display()));
        }
        Ok(SaveOutcome::Cancelled) => log.push("Save operation canceled."),
        Err(SaveError::TransientWriteFailure { .. }) => {
            log.push("Failed to save after multiple attempts.");
        }
        Err(err) => log.push(format!("Failed to save masked data: {err}")),
    }
}

/// Persists masked datasets through a private temporary file.
pub struct Saver {
    writer: Box<dyn DatasetWriter>,
    prompt: Box<dyn DestinationPrompt>,
    publisher: Box<dyn Publisher>,
    retry: RetryPolicy,
    staging_dir: Option<PathBuf>,
}

impl Saver {
    pub fn new(format: OutputFormat, prompt: impl DestinationPrompt + 'static) -> Self {
        Self {
            writer: format.writer(Delimiter::default()),
            prompt: Box::new(prompt),
            publisher: Box::new(FsPublisher),
            retry: RetryPolicy::default(),
            staging_dir: None,
        }
    }

    pub fn with_writer(mut self, writer: impl DatasetWriter + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    pub fn with_publisher(mut self, publisher: impl Publisher + 'static) -> Self {
        self.publisher = Box::new(publisher);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Directory for the private temporary file (system default otherwise).
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.writer.format()
    }

    /// Save and record the outcome in `log`; `None` unless a file was written.
    pub fn save(
        &mut self,
        dataset: &Dataset,
        source_path: &Path,
        log: &mut OperationLog,
    ) -> Option<PathBuf> {
        let result = self.try_save(dataset, source_path);
        record_save_outcome(&result, log);
        match result {
            Ok(SaveOutcome::Saved(path)) => Some(path),
            Ok(SaveOutcome::Cancelled) | Err(_) => None,
        }
    }

    pub fn try_save(
        &mut self,
        dataset: &Dataset,
        source_path: &Path,
    ) -> Result<SaveOutcome, SaveError> {
        let format = self.writer.format();
        let suffix = format!(".{}", format.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix("tabmask-").suffix(&suffix);
        let staged = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(SaveError::Staging)?;

        self.writer.write(dataset, staged.path())?;

        let suggested = default_destination(source_path, format);
        let Some(destination) = self.prompt.choose_destination(&suggested) else {
            info!(suggested = %suggested.display(), "save canceled");
            return Ok(SaveOutcome::Cancelled);
        };

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.publisher.publish(staged.path(), &destination) {
                Ok(()) => {
                    info!(
                        path = %destination.display(),
                        attempt,
                        format = %format,
                        "masked dataset saved"
                    );
                    return Ok(SaveOutcome::Saved(destination));
                }
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                    warn!(
                        path = %destination.display(),
                        attempt,
                        max_attempts,
                        error = %err,
                        "destination not writable"
                    );
                    if attempt >= max_attempts {
                        return Err(SaveError::TransientWriteFailure {
                            path: destination,
                            attempts: attempt,
                            source: err,
                        });
                    }
                    attempt += 1;
                    thread::sleep(self.retry.delay);
                }
                Err(err) => {
                    warn!(path = %destination.display(), error = %err, "save failed");
                    return Err(SaveError::WriteFailure {
                        path: destination,
                        source: err,
                    });
                }
            }
        }
    }
}
