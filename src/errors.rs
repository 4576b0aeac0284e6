/// Custom error type for loader operations.
///
/// Every variant is terminal: errors bubble up to `main`, which logs them and
/// exits with the variant's code. Nothing is retried.
///
/// `Display`/`Error`/`From` are implemented by hand because the `Validation`
/// variant has a `String` field named `source`, which the thiserror derive
/// would insist on treating as the error source.
#[derive(Debug)]
pub enum LoadError {
    /// Required NOT-NULL, no-default column missing from a record.
    Validation { field: String, source: String },
    /// Connection error (e.g., issues with network or login).
    Connection(String),
    /// Metadata query against the system catalogs failed.
    Schema(String),
    /// An INSERT statement failed (e.g., constraint violation).
    Execution(String),
    /// Malformed JSON or CSV input.
    Parse(String),
    /// Directory or file could not be read.
    Io(std::io::Error),
    /// Unrecognized file extension.
    Format(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Validation { field, source } => {
                write!(f, "required field {field} missing from {source}")
            }
            LoadError::Connection(msg) => write!(f, "Connection error: {msg}"),
            LoadError::Schema(msg) => write!(f, "Schema error: {msg}"),
            LoadError::Execution(msg) => write!(f, "Insert error: {msg}"),
            LoadError::Parse(msg) => write!(f, "Parse error: {msg}"),
            LoadError::Io(err) => write!(f, "Read error: {err}"),
            LoadError::Format(msg) => write!(f, "Format error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl LoadError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::Validation { .. } => 1,
            LoadError::Connection(_) => 2,
            LoadError::Schema(_) => 3,
            LoadError::Execution(_) => 4,
            LoadError::Parse(_) => 5,
            LoadError::Io(_) => 6,
            LoadError::Format(_) => 7,
        }
    }
}
