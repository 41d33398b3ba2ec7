use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("collector '{collector}' failed to record event: {message}")]
    Collector { collector: String, message: String },
    #[error("couldnt serialize event: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("failed to deserialize event: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
}

impl AnalyticsError {
    /// Builds a collector ingestion failure from any displayable cause.
    #[must_use]
    pub fn collector(collector: &str, message: impl std::fmt::Display) -> Self {
        Self::Collector {
            collector: collector.to_string(),
            message: message.to_string(),
        }
    }
}
