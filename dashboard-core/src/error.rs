use std::error::Error as _;

/// What went wrong below the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Tls,
    Timeout,
    Connect,
    Status(u16),
    Other,
}

/// Every way a fetch can fail. None of these are fatal; the web layer turns
/// them into a message and a status code.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Station '{0}' not found")]
    StationNotFound(String),

    #[error("{}", describe_transport(.kind, .message))]
    Transport { kind: TransportKind, message: String },

    #[error("Error decoding data: {0}")]
    Decode(String),

    #[error("Provider returned an empty payload")]
    EmptyPayload,

    #[error("No observation data available")]
    NoObservationData,
}

impl FetchError {
    /// Map a reqwest failure onto the transport taxonomy. The URL is
    /// stripped since station endpoints embed API keys.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let kind = if is_tls_failure(&err) {
            TransportKind::Tls
        } else if err.is_timeout() {
            TransportKind::Timeout
        } else if let Some(status) = err.status() {
            TransportKind::Status(status.as_u16())
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };

        FetchError::Transport { kind, message: error_chain(&err) }
    }

    /// Unknown stations and empty results are "not found"; everything else
    /// is a server-side failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::StationNotFound(_) | FetchError::EmptyPayload | FetchError::NoObservationData
        )
    }
}

fn describe_transport(kind: &TransportKind, message: &str) -> String {
    match kind {
        TransportKind::Tls => {
            format!("SSL Error: {message}. Could not verify the server's SSL certificate.")
        }
        TransportKind::Timeout => format!("Error fetching data: request timed out: {message}"),
        _ => format!("Error fetching data: {message}"),
    }
}

/// rustls and the connector surface certificate problems only as messages
/// deep in the source chain.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = cause.source();
    }
    false
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(FetchError::StationNotFound("x".into()).is_not_found());
        assert!(FetchError::EmptyPayload.is_not_found());
        assert!(FetchError::NoObservationData.is_not_found());
        assert!(!FetchError::Decode("bad".into()).is_not_found());
        assert!(
            !FetchError::Transport { kind: TransportKind::Timeout, message: "slow".into() }
                .is_not_found()
        );
    }

    #[test]
    fn messages_identify_failure_class() {
        let tls = FetchError::Transport { kind: TransportKind::Tls, message: "bad cert".into() };
        assert!(tls.to_string().starts_with("SSL Error: bad cert"));
        assert!(tls.to_string().contains("certificate"));

        let net = FetchError::Transport { kind: TransportKind::Connect, message: "refused".into() };
        assert_eq!(net.to_string(), "Error fetching data: refused");

        let slow = FetchError::Transport { kind: TransportKind::Timeout, message: "10s".into() };
        assert!(slow.to_string().starts_with("Error fetching data: request timed out"));

        let decode = FetchError::Decode("expected value".into());
        assert_eq!(decode.to_string(), "Error decoding data: expected value");

        assert_eq!(
            FetchError::StationNotFound("nope".into()).to_string(),
            "Station 'nope' not found"
        );
    }
}
