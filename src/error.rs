use std::fmt;

/// Failure kinds surfaced by the import front door and the parsers.
///
/// Everything else that can go wrong inside a document (unknown enum tokens,
/// malformed dates, short rows, dangling relationships, cycles) is an anomaly
/// recorded on the schedule, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    EmptyFile,
    Encoding,
    InvalidFormat,
    MissingHeader,
    MissingRequiredTable(String),
    FileTooLarge { size_mib: u64, max_mib: u64 },
    TooManyRows { count: usize, max: usize },
    XmlParsingFailed(String),
    BinaryFormatNotFullySupported,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::EmptyFile => write!(f, "file is empty"),
            ImportError::Encoding => {
                write!(f, "file is neither Windows-1252 nor UTF-8 encoded")
            }
            ImportError::InvalidFormat => {
                write!(f, "no recognizable XER markers found in file")
            }
            ImportError::MissingHeader => write!(f, "no ERMHDR header line found"),
            ImportError::MissingRequiredTable(name) => {
                write!(f, "required table '{name}' is missing from the export")
            }
            ImportError::FileTooLarge { size_mib, max_mib } => {
                write!(f, "file is {size_mib} MiB, limit is {max_mib} MiB")
            }
            ImportError::TooManyRows { count, max } => {
                write!(f, "export contains {count} rows, limit is {max}")
            }
            ImportError::XmlParsingFailed(detail) => {
                write!(f, "XML parsing failed: {detail}")
            }
            ImportError::BinaryFormatNotFullySupported => {
                write!(
                    f,
                    "compound-binary MPP files are not fully supported; export as XML or XER"
                )
            }
        }
    }
}

impl std::error::Error for ImportError {}

pub type ImportResult<T> = Result<T, ImportError>;
