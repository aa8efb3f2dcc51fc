use thiserror::Error;

use crate::domain::record::Collection;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{label} `{id}` not found", label = .collection.label())]
    RecordNotFound { collection: Collection, id: String },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, collection: Collection, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text that is safe to return to API clients. Detail stays in `message` for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { .. } => "invalid request payload".to_string(),
            Self::NotFound { collection, .. } => format!("{} not found", collection.label()),
            Self::Internal { .. } => "an internal error occurred".to_string(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(DomainError::RecordNotFound { collection, id }) => {
                Self::NotFound {
                    message: format!("{} `{id}` not found", collection.label()),
                    collection,
                    correlation_id: "unassigned".to_owned(),
                }
            }
            ApplicationError::Domain(DomainError::InvalidPayload(message)) => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Domain(DomainError::InvariantViolation(message))
            | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::record::Collection;
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn missing_quote_maps_to_not_found_with_quote_wording() {
        let interface = ApplicationError::from(DomainError::RecordNotFound {
            collection: Collection::Quotes,
            id: "QT-NOPE1".to_owned(),
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::NotFound { ref correlation_id, .. } if correlation_id == "req-1"
        ));
        assert_eq!(interface.user_message(), "Quote not found");
    }

    #[test]
    fn invalid_payload_maps_to_bad_request_without_detail() {
        let interface = ApplicationError::from(DomainError::InvalidPayload(
            "Quote payload must be a JSON object, got a string".to_owned(),
        ))
        .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(interface.user_message(), "invalid request payload");
        assert!(interface.to_string().contains("JSON object"));
    }

    #[test]
    fn invariant_violation_maps_to_internal() {
        let interface =
            ApplicationError::from(DomainError::InvariantViolation("bad record".to_owned()))
                .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "an internal error occurred");
        assert_eq!(interface.correlation_id(), "req-3");
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface = ApplicationError::Configuration("seed file unreadable".to_owned())
            .into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
    }
}
