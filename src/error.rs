use thiserror::Error;

pub type Result<T> = std::result::Result<T, GbGenesError>;

#[derive(Debug, Error)]
pub enum GbGenesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not load parse options '{path}': {message}")]
    Config { path: String, message: String },
}

impl GbGenesError {
    /// Wraps an I/O error with the path it happened on, keeping the original kind.
    pub fn io_at(path: &str, err: std::io::Error) -> Self {
        GbGenesError::Io(std::io::Error::new(
            err.kind(),
            format!("'{path}': {err}"),
        ))
    }
}
