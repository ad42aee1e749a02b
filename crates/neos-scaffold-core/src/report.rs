//! Status output for generated files

use crate::writer::{FileRecord, FileStatus, GenerationReport};
use colored::Colorize;

/// Receives the report of a finished top-level command
pub trait StatusReporter {
    fn report(&self, report: &GenerationReport);
}

/// One status line, e.g. `STATUS | Created .../Foo.Bar/Resources/Public/Teaser.js`
pub fn status_line(record: &FileRecord) -> String {
    format!("STATUS | {}", record.message())
}

/// Prints status lines to stdout, colored by outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn report(&self, report: &GenerationReport) {
        for record in report.records() {
            let line = status_line(record);
            match record.status {
                FileStatus::Created => println!("{}", line.green()),
                FileStatus::Omitted => println!("{}", line.yellow()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let record = FileRecord {
            display: "Foo.Bar/Resources/Public/Teaser.js".to_string(),
            status: FileStatus::Created,
        };
        assert_eq!(
            status_line(&record),
            "STATUS | Created .../Foo.Bar/Resources/Public/Teaser.js"
        );
    }
}
