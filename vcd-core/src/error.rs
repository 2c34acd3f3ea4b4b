//! Error type shared by every stage of the VCD pipeline

use std::fmt;
use std::path::PathBuf;

use crate::report::ReportKind;

/// Coarse classification of a [`VcdError`], for callers that only need to
/// know what went wrong and not where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    SheetNotFound,
    InvalidFormat,
    Io,
    NotImplemented,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::SheetNotFound => write!(f, "sheet not found"),
            ErrorKind::InvalidFormat => write!(f, "invalid format"),
            ErrorKind::Io => write!(f, "io error"),
            ErrorKind::NotImplemented => write!(f, "not implemented"),
            ErrorKind::Parse => write!(f, "parse error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VcdError {
    /// Input file or directory does not exist
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The requested worksheet is not part of the workbook
    #[error("the sheet \"{name}\" could not be found")]
    SheetNotFound { name: String },

    /// The requirements document does not have the expected layout
    #[error("{0}")]
    InvalidFormat(String),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be opened or decoded
    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The report could not be written
    #[error("failed to write report {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("the {kind} report generation is not yet supported")]
    NotImplemented { kind: ReportKind },

    /// A result file is not well-formed XML
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl VcdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VcdError::NotFound { .. } => ErrorKind::NotFound,
            VcdError::SheetNotFound { .. } => ErrorKind::SheetNotFound,
            VcdError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            VcdError::Io { .. } | VcdError::Workbook { .. } | VcdError::ReportWrite { .. } => {
                ErrorKind::Io
            }
            VcdError::NotImplemented { .. } => ErrorKind::NotImplemented,
            VcdError::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub(crate) fn missing_column(role: &str, name: &str) -> Self {
        VcdError::InvalidFormat(format!(
            "The {} column with name \"{}\" could not be found",
            role, name
        ))
    }
}

pub type Result<T> = std::result::Result<T, VcdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_io_failures() {
        let io = VcdError::Io {
            path: PathBuf::from("a.xlsx"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(io.kind(), ErrorKind::Io);

        let write = VcdError::ReportWrite {
            path: PathBuf::from("out.xlsx"),
            source: rust_xlsxwriter::XlsxError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "locked",
            )),
        };
        assert_eq!(write.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_missing_column_message_names_column() {
        let err = VcdError::missing_column("identifier", "Req ID");
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "The identifier column with name \"Req ID\" could not be found"
        );
    }

    #[test]
    fn test_not_implemented_names_kind() {
        let err = VcdError::NotImplemented {
            kind: ReportKind::Html,
        };
        assert_eq!(err.to_string(), "the HTML report generation is not yet supported");
    }
}
