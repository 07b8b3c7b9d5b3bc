use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown pass: {0}")]
    UnknownPass(String),

    #[error("Unknown option '{option}' for pass '{pass}'")]
    UnknownOption { pass: String, option: String },

    #[error("Invalid value '{value}' for option '{option}' of pass '{pass}'")]
    InvalidOptionValue {
        pass: String,
        option: String,
        value: String,
    },

    #[error("Malformed pass pipeline: {0}")]
    MalformedPipeline(String),
}
