use meilimcp_core::error::ProtocolErrorCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SearchError {
    #[error("meilisearch search failed: http {status}{}: {message}", format_code(.code))]
    Upstream {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("meilisearch request failed: {0}")]
    Transport(String),

    #[error("failed to decode meilisearch response: {0}")]
    Decode(String),

    #[error("failed to serialize search request: {0}")]
    Serialization(String),
}

fn format_code(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

impl SearchError {
    pub fn transport<E: std::fmt::Display>(e: E) -> Self {
        Self::Transport(e.to_string())
    }

    pub fn decode<E: std::fmt::Display>(e: E) -> Self {
        Self::Decode(e.to_string())
    }

    pub fn code(&self) -> ProtocolErrorCode {
        match self {
            Self::Upstream { .. } | Self::Transport(_) | Self::Decode(_) => {
                ProtocolErrorCode::UpstreamFailure
            }
            Self::Serialization(_) => ProtocolErrorCode::SerializationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_includes_status_and_code() {
        let err = SearchError::Upstream {
            status: 404,
            code: Some("index_not_found".to_string()),
            message: "Index `movies` not found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "meilisearch search failed: http 404 (index_not_found): Index `movies` not found."
        );
        assert_eq!(err.code(), ProtocolErrorCode::UpstreamFailure);
    }

    #[test]
    fn serialization_maps_to_its_own_code() {
        let err = SearchError::Serialization("bad float".to_string());
        assert_eq!(err.code(), ProtocolErrorCode::SerializationFailure);
    }
}
