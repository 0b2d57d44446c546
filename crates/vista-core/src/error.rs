use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page has no sections")]
    EmptyPage,

    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Section not found: {0}")]
    UnknownSection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
