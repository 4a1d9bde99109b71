//! Batch converter turning CSV convention tables into JSON documents.
//!
//! This is a single-pass, stateless-per-file transform: every file is read,
//! converted, and written independently, and one broken file never stops the
//! rest of the batch.

use crate::convert::{ConversionError, substitutions};
use crate::export::{ExportError, JsonConventionExporter};
use crate::import::CsvConventionImporter;
#[cfg(feature = "remote")]
use crate::source::remote::{RemoteSource, normalize_line_endings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::{info, warn};

/// Caller-owned converter configuration. There is no process-wide state: a
/// converter only ever touches the directories named here.
#[derive(Debug, Default)]
pub struct ConverterConfig {
    /// Directory holding the CSV convention files
    pub source_dir: PathBuf,
    /// Directory the JSON documents are written to
    pub output_dir: PathBuf,
    /// Upstream source to sync `source_dir` against before compiling
    #[cfg(feature = "remote")]
    pub remote: Option<RemoteSource>,
}

impl ConverterConfig {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            #[cfg(feature = "remote")]
            remote: None,
        }
    }

    /// Sync against a remote source during [`ConventionConverter::update_conventions`].
    #[cfg(feature = "remote")]
    pub fn with_remote(mut self, remote: RemoteSource) -> Self {
        self.remote = Some(remote);
        self
    }
}

/// How a convention's local CSV copy relates to upstream after a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Downloaded for the first time
    Added,
    /// Local copy replaced with changed upstream content
    Updated,
    /// Local copy already matched upstream
    Unchanged,
    /// Not synced (local-only run, or the download failed)
    Local,
}

/// Outcome of one convention in a batch run.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Convention name (file stem)
    pub convention: String,
    pub sync: SyncStatus,
    /// Why this convention failed, if it did
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file outcomes of a batch conversion, exactly one per convention.
///
/// A convention whose download failed but whose stale local copy still
/// compiled is reported as a single failed outcome carrying the download
/// error.
#[derive(Debug, Serialize, Deserialize)]
#[must_use = "batch reports carry per-file failures and should be checked"]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| !outcome.succeeded())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    /// Conventions whose local CSV copy changed during sync.
    pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.sync, SyncStatus::Added | SyncStatus::Updated))
    }
}

/// Deterministic batch transformation of CSV convention tables into JSON
/// convention documents.
pub struct ConventionConverter {
    config: ConverterConfig,
    importer: CsvConventionImporter,
    exporter: JsonConventionExporter,
}

impl ConventionConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            importer: CsvConventionImporter::new(),
            exporter: JsonConventionExporter,
        }
    }

    /// Update the SOFA conventions.
    ///
    /// With a remote source configured this syncs the CSV files from the
    /// upstream SOFAtoolbox repository first; it then compiles every CSV file
    /// in the source directory to a JSON document in the output directory.
    /// Compilation runs even when nothing changed upstream.
    ///
    /// Each file's outcome is independent: download and conversion failures
    /// are recorded in the returned [`BatchReport`] and do not stop the
    /// batch. Only an unusable source/output directory or an unreachable
    /// upstream listing aborts the whole run.
    pub fn update_conventions(&self) -> Result<BatchReport, ConversionError> {
        fs::create_dir_all(&self.config.source_dir)
            .map_err(|e| ConversionError::IoError(e.to_string()))?;
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| ConversionError::IoError(e.to_string()))?;

        #[cfg_attr(not(feature = "remote"), allow(unused_mut))]
        let mut sync = BTreeMap::new();
        let mut sync_errors = BTreeMap::new();
        let mut outcomes = Vec::new();

        #[cfg(feature = "remote")]
        if let Some(remote) = &self.config.remote {
            self.sync_sources(remote, &mut sync, &mut sync_errors)?;
        }

        self.compile_all(&sync, &mut sync_errors, &mut outcomes)?;
        Ok(BatchReport { outcomes })
    }

    /// Compile the JSON documents from the local CSV files only (step two of
    /// [`update_conventions`](Self::update_conventions)).
    pub fn compile_conventions(&self) -> Result<BatchReport, ConversionError> {
        if !self.config.source_dir.is_dir() {
            return Err(ConversionError::IoError(format!(
                "source directory {} does not exist",
                self.config.source_dir.display()
            )));
        }
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| ConversionError::IoError(e.to_string()))?;

        let mut outcomes = Vec::new();
        self.compile_all(&BTreeMap::new(), &mut BTreeMap::new(), &mut outcomes)?;
        Ok(BatchReport { outcomes })
    }

    /// Download every upstream convention and refresh the local CSV copies
    /// that changed. Download failures are recorded per convention and folded
    /// into the batch outcomes later; a failed listing aborts the sync.
    #[cfg(feature = "remote")]
    fn sync_sources(
        &self,
        remote: &RemoteSource,
        sync: &mut BTreeMap<String, SyncStatus>,
        sync_errors: &mut BTreeMap<String, String>,
    ) -> Result<(), ConversionError> {
        let conventions = remote.list_conventions()?;
        info!("Syncing {} conventions from upstream", conventions.len());

        for file_name in conventions {
            let convention = file_name.trim_end_matches(".csv").to_string();
            let data = match remote.fetch(&file_name) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Failed to download {}: {}", convention, e);
                    sync_errors.insert(convention, format!("download failed: {e}"));
                    continue;
                }
            };

            let path = self.config.source_dir.join(&file_name);
            let status = match fs::read(&path) {
                Ok(current) if normalize_line_endings(&current) == data => SyncStatus::Unchanged,
                Ok(_) => SyncStatus::Updated,
                Err(_) => SyncStatus::Added,
            };

            if status != SyncStatus::Unchanged {
                if let Err(e) = fs::write(&path, &data) {
                    sync_errors.insert(
                        convention,
                        format!("failed to write {}: {e}", path.display()),
                    );
                    continue;
                }
                info!("Refreshed local copy of {} ({:?})", convention, status);
            }
            sync.insert(convention, status);
        }
        Ok(())
    }

    /// Compile every `*.csv` file in the source directory, recording exactly
    /// one outcome per convention. A convention whose download failed keeps
    /// its sync error on the compile outcome (its stale local copy, if any,
    /// is still compiled); sync errors with no local file left over become
    /// failed outcomes of their own.
    fn compile_all(
        &self,
        sync: &BTreeMap<String, SyncStatus>,
        sync_errors: &mut BTreeMap<String, String>,
        outcomes: &mut Vec<FileOutcome>,
    ) -> Result<(), ConversionError> {
        let mut csv_files: Vec<PathBuf> = fs::read_dir(&self.config.source_dir)
            .map_err(|e| ConversionError::IoError(e.to_string()))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        csv_files.sort();

        for path in csv_files {
            let convention = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let sync_status = sync
                .get(&convention)
                .copied()
                .unwrap_or(SyncStatus::Local);
            let sync_error = sync_errors.remove(&convention);

            match self.compile_file(&convention, &path) {
                Ok(()) => {
                    info!("Compiled convention {}", convention);
                    outcomes.push(FileOutcome {
                        convention,
                        sync: sync_status,
                        error: sync_error,
                    });
                }
                Err(e) => {
                    warn!("Failed to convert {}: {}", convention, e);
                    outcomes.push(FileOutcome {
                        convention,
                        sync: sync_status,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        for (convention, error) in std::mem::take(sync_errors) {
            outcomes.push(FileOutcome {
                convention,
                sync: SyncStatus::Local,
                error: Some(error),
            });
        }
        Ok(())
    }

    /// Read, convert, and atomically write a single convention.
    fn compile_file(&self, convention: &str, path: &Path) -> Result<(), ConversionError> {
        let bytes =
            fs::read(path).map_err(|e| ConversionError::IoError(format!("{}: {e}", path.display())))?;
        let table = self.importer.import_bytes(convention, &bytes)?;
        let table = substitutions::normalize_table(table);
        let json = self.exporter.export(&table)?;

        let output = self.config.output_dir.join(format!("{convention}.json"));
        write_atomic(&output, json.as_bytes())
    }
}

/// Write through a temp file and rename so concurrent readers never observe a
/// partially written document.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ConversionError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)
        .map_err(|e| ExportError::IoError(format!("{}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| ExportError::IoError(format!("{}: {e}", path.display())))?;
    Ok(())
}
