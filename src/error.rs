use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevstatError>;

#[derive(Error, Debug)]
pub enum RevstatError {
    #[error("Invalid module pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Log parse error: {0}")]
    LogParse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
