//! Broker error taxonomy and the OSB error payload.
//!
//! Every failure raised by a user service or an event flow hook is a
//! [`ServiceBrokerError`]. The orchestrator never wraps or rewrites these, so
//! the transport layer can rely on [`ServiceBrokerError::status_code`] and
//! [`ServiceBrokerError::to_error_message`] to build the response.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Which kind of asynchronous operation is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InProgressKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for InProgressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Errors raised by broker services and event flow hooks.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceBrokerError {
    /// A conflicting asynchronous operation is already running.
    #[error("{kind} operation already in progress")]
    OperationInProgress {
        kind: InProgressKind,
        operation: Option<String>,
    },
    #[error("service instance does not exist: {service_instance_id}")]
    InstanceDoesNotExist { service_instance_id: String },
    #[error("service instance binding does not exist: {binding_id}")]
    BindingDoesNotExist { binding_id: String },
    /// The instance exists with different attributes than requested.
    #[error(
        "service instance {service_instance_id} already exists for service {service_definition_id}"
    )]
    InstanceAlreadyExists {
        service_instance_id: String,
        service_definition_id: String,
    },
    /// The binding exists with different attributes than requested.
    #[error("binding {binding_id} already exists for service instance {service_instance_id}")]
    BindingAlreadyExists {
        service_instance_id: String,
        binding_id: String,
    },
    #[error("{message}")]
    AsyncRequired { message: String },
    #[error("invalid parameters: {message}")]
    InvalidParameters { message: String },
    #[error("update not supported: {message}")]
    UpdateNotSupported { message: String },
    #[error("service definition does not exist: {service_definition_id}")]
    ServiceDefinitionDoesNotExist { service_definition_id: String },
    #[error("plan does not exist: {plan_id}")]
    PlanDoesNotExist { plan_id: String },
    #[error("{message}")]
    BindingRequiresApp { message: String },
    #[error("{message}")]
    MaintenanceInfoConflict { message: String },
    #[error("{message}")]
    Concurrency { message: String },
    /// The service does not implement this operation.
    #[error("operation not supported by this broker: {operation}")]
    Unsupported { operation: &'static str },
    #[error("service broker unavailable: {message}")]
    Unavailable { message: String },
    /// A broker failure with a message meant for the platform user.
    #[error("{message}")]
    Broker {
        message: String,
        error_code: Option<String>,
    },
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl ServiceBrokerError {
    /// Convenience constructor for [`ServiceBrokerError::InvalidParameters`].
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ServiceBrokerError::AsyncRequired`] with
    /// the standard OSB description.
    #[must_use]
    pub fn async_required() -> Self {
        Self::AsyncRequired {
            message: "This service plan requires client support for asynchronous service operations."
                .to_string(),
        }
    }

    /// Convenience constructor for [`ServiceBrokerError::Broker`].
    #[must_use]
    pub fn broker(message: impl Into<String>) -> Self {
        Self::Broker {
            message: message.into(),
            error_code: None,
        }
    }

    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::OperationInProgress { .. } => StatusCode::ACCEPTED,
            Self::InstanceAlreadyExists { .. } | Self::BindingAlreadyExists { .. } => {
                StatusCode::CONFLICT
            }
            Self::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            Self::InstanceDoesNotExist { .. }
            | Self::BindingDoesNotExist { .. }
            | Self::AsyncRequired { .. }
            | Self::UpdateNotSupported { .. }
            | Self::ServiceDefinitionDoesNotExist { .. }
            | Self::PlanDoesNotExist { .. }
            | Self::BindingRequiresApp { .. }
            | Self::MaintenanceInfoConflict { .. }
            | Self::Concurrency { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Broker { .. } | Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable OSB error code, for the errors the API defines one for.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::AsyncRequired { .. } => Some("AsyncRequired"),
            Self::BindingRequiresApp { .. } => Some("RequiresApp"),
            Self::MaintenanceInfoConflict { .. } => Some("MaintenanceInfoConflict"),
            Self::Concurrency { .. } => Some("ConcurrencyError"),
            Self::Broker { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    /// Whether the platform may retry the same request later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::OperationInProgress { .. } | Self::Concurrency { .. } | Self::Unavailable { .. }
        )
    }

    /// Builds the `{error, description}` payload for this error.
    #[must_use]
    pub fn to_error_message(&self) -> ErrorMessage {
        ErrorMessage {
            error: self.error_code().map(str::to_string),
            description: Some(self.to_string()),
            instance_usable: None,
            update_repeatable: None,
        }
    }
}

/// Error body returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instance_usable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub update_repeatable: Option<bool>,
}
