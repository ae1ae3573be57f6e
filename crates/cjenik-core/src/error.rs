use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read chains file {path}: {source}")]
    ChainsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse chains file: {0}")]
    ChainsFileParse(#[from] serde_yaml::Error),

    #[error("chain configuration invalid: {0}")]
    Validation(String),
}
