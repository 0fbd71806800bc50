#[derive(Debug, thiserror::Error)]
pub enum ConvError {
    #[error("Usage: {0} <input_file>")]
    Usage(String),
    #[error("Error opening file: {}", .path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("[kind: io, info:{0}]")]
    Io(#[from] std::io::Error),
    #[error("[kind: invalid argument, info:{0}]")]
    InvalidArg(String),
    #[error("[kind: invalid trace, info:{0}]")]
    InvalidTrace(String),
    #[error("[kind: config, info:{0}]")]
    Config(String),
}

impl ConvError {
    pub fn usage(program: impl ToString) -> Self {
        Self::Usage(program.to_string())
    }

    pub(crate) fn open(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_arg(e: impl ToString) -> Self {
        Self::InvalidArg(e.to_string())
    }

    /// Malformed trace line, located by `source` (usually a file path) and 1-based line number.
    pub(crate) fn invalid_trace(source: impl ToString, line_no: usize, line: &str) -> Self {
        Self::InvalidTrace(format!(
            "error: {{invalid line: {}}}, at: {{{}:{}}}",
            line.trim_end(),
            source.to_string(),
            line_no
        ))
    }

    pub(crate) fn config(e: impl ToString) -> Self {
        Self::Config(e.to_string())
    }
}

pub type ConvResult<T> = std::result::Result<T, ConvError>;
