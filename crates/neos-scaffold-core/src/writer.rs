//! Idempotent file emission and the per-run report of written files

use crate::error::{Result, ScaffoldError};
use crate::package::{resolve_path, PackageRegistry};
use crate::paths::display_path;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a single write attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The file was written
    Created,
    /// The file already existed and was left untouched
    Omitted,
}

impl FileStatus {
    /// Status tag shown next to the record
    pub fn tag(&self) -> &'static str {
        match self {
            FileStatus::Created => "success",
            FileStatus::Omitted => "error",
        }
    }
}

/// One reported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Shortened path, for display only
    pub display: String,
    pub status: FileStatus,
}

impl FileRecord {
    /// Human-readable description, unique per path and outcome
    pub fn message(&self) -> String {
        match self.status {
            FileStatus::Created => format!("Created .../{}", self.display),
            FileStatus::Omitted => format!("Omitted as file already exists .../{}", self.display),
        }
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Records of every file attempted during one command
///
/// Records are keyed by their message: recording the same message twice
/// keeps the first position.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    records: Vec<FileRecord>,
}

impl GenerationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: FileRecord) {
        let message = record.message();
        match self.records.iter_mut().find(|r| r.message() == message) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

/// Writes generated files, never replacing existing ones unless forced
pub struct FileWriter<'a, R: PackageRegistry + ?Sized> {
    registry: &'a R,
    root: &'a Path,
}

impl<'a, R: PackageRegistry + ?Sized> FileWriter<'a, R> {
    pub fn new(registry: &'a R, root: &'a Path) -> Self {
        Self { registry, root }
    }

    /// Write `content` to `target` (a `resource://` or root-relative path)
    ///
    /// An existing file is only replaced with `force`; otherwise the attempt
    /// is recorded as [`FileStatus::Omitted`].
    pub fn write(
        &self,
        target: &str,
        content: &str,
        force: bool,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let path = resolve_path(self.registry, self.root, target)?;
        self.emit(&path, display_path(target), content, force, report)
    }

    /// Write `content` to a path that is already located on disk
    ///
    /// Unlike [`FileWriter::write`], the path is used as given and never
    /// joined onto the root.
    pub fn write_file(
        &self,
        path: &Path,
        content: &str,
        force: bool,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let display = display_path(&path.to_string_lossy());
        self.emit(path, display, content, force, report)
    }

    fn emit(
        &self,
        path: &Path,
        display: String,
        content: &str,
        force: bool,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        // Ensure parent directories exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }

        let status = if !path.exists() || force {
            fs::write(path, content).map_err(|e| ScaffoldError::io(path, e))?;
            info!(path = %path.display(), "created file");
            FileStatus::Created
        } else {
            warn!(path = %path.display(), "file already exists, omitted");
            FileStatus::Omitted
        };

        let record = FileRecord { display, status };
        report.record(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::StaticPackageRegistry;

    fn setup() -> (tempfile::TempDir, StaticPackageRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = StaticPackageRegistry::new().with_package("Foo.Bar", dir.path().join("Foo.Bar"), None);
        (dir, registry)
    }

    #[test]
    fn test_creates_missing_directories() {
        let (dir, registry) = setup();
        let writer = FileWriter::new(&registry, dir.path());
        let mut report = GenerationReport::new();

        let record = writer
            .write("resource://Foo.Bar/Private/Fusion/Deep/Teaser.fusion", "x", false, &mut report)
            .unwrap();

        assert_eq!(record.status, FileStatus::Created);
        assert_eq!(record.display, "Foo.Bar/Resources/Private/Fusion/Deep/Teaser.fusion");
        let written = dir.path().join("Foo.Bar/Resources/Private/Fusion/Deep/Teaser.fusion");
        assert_eq!(fs::read_to_string(written).unwrap(), "x");
    }

    #[test]
    fn test_never_overwrites_without_force() {
        let (dir, registry) = setup();
        let writer = FileWriter::new(&registry, dir.path());
        let mut report = GenerationReport::new();
        let target = "resource://Foo.Bar/Public/Teaser.js";

        writer.write(target, "first", false, &mut report).unwrap();
        let second = writer.write(target, "second", false, &mut report).unwrap();

        assert_eq!(second.status, FileStatus::Omitted);
        let content = fs::read_to_string(dir.path().join("Foo.Bar/Resources/Public/Teaser.js")).unwrap();
        assert_eq!(content, "first");
        assert_eq!(report.len(), 2);
        assert_eq!(report.count(FileStatus::Created), 1);
        assert_eq!(report.count(FileStatus::Omitted), 1);
        assert_eq!(report.records()[0].status.tag(), "success");
        assert_eq!(report.records()[1].status.tag(), "error");
    }

    #[test]
    fn test_force_always_overwrites() {
        let (dir, registry) = setup();
        let writer = FileWriter::new(&registry, dir.path());
        let mut report = GenerationReport::new();
        let target = "resource://Foo.Bar/Public/Teaser.css";

        let first = writer.write(target, "first", true, &mut report).unwrap();
        let second = writer.write(target, "second", true, &mut report).unwrap();

        assert_eq!(first.status, FileStatus::Created);
        assert_eq!(second.status, FileStatus::Created);
        let content = fs::read_to_string(dir.path().join("Foo.Bar/Resources/Public/Teaser.css")).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_plain_relative_path_is_rooted() {
        let (dir, registry) = setup();
        let writer = FileWriter::new(&registry, dir.path());
        let mut report = GenerationReport::new();

        writer.write("neos-scaffold.yaml", "a: 1", false, &mut report).unwrap();
        assert!(dir.path().join("neos-scaffold.yaml").exists());
    }

    #[test]
    fn test_write_file_does_not_reroot_relative_paths() {
        let dir = tempfile::tempdir_in(".").unwrap();
        let root = dir.path().strip_prefix(std::env::current_dir().unwrap()).unwrap();
        assert!(root.is_relative());
        let registry = StaticPackageRegistry::new();
        let writer = FileWriter::new(&registry, root);
        let mut report = GenerationReport::new();

        let target = root.join("Packages/Sites/Foo.Site/Configuration/NodeTypes.Teaser.yaml");
        let record = writer.write_file(&target, "x", false, &mut report).unwrap();

        assert!(target.is_file());
        assert!(!root.join(root).exists());
        assert_eq!(record.display, "Foo.Site/Configuration/NodeTypes.Teaser.yaml");
    }

    #[test]
    fn test_record_messages() {
        let created = FileRecord {
            display: "Foo.Bar/Resources/X.html".to_string(),
            status: FileStatus::Created,
        };
        assert_eq!(created.message(), "Created .../Foo.Bar/Resources/X.html");
        let omitted = FileRecord {
            status: FileStatus::Omitted,
            ..created
        };
        assert_eq!(
            omitted.message(),
            "Omitted as file already exists .../Foo.Bar/Resources/X.html"
        );
    }
}
