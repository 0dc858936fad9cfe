//! Asynchronous operation state and the polling state machine.
//!
//! An operation accepted with `async = true` starts `InProgress` and settles
//! exactly once, to `Succeeded` or `Failed`. A delete that settled
//! successfully is reported with `delete_operation = true`, which the
//! transport layer turns into "resource gone".

use serde::{Deserialize, Serialize};

use crate::messages::{GetLastServiceBindingOperationResponse, GetLastServiceOperationResponse};

/// State of a long-running broker operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

impl OperationState {
    /// Whether polling can stop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// What an asynchronous operation does to its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsyncOperationKind {
    Provision,
    Update,
    Deprovision,
    Bind,
    Unbind,
}

impl AsyncOperationKind {
    /// Deprovision and unbind remove their resource once they succeed.
    #[must_use]
    pub fn is_delete(self) -> bool {
        matches!(self, Self::Deprovision | Self::Unbind)
    }
}

/// Errors from driving an [`AsyncOperation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("operation {token} already settled as {state:?}")]
    AlreadyTerminal {
        token: String,
        state: OperationState,
    },
}

/// A single asynchronous operation, identified by its opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncOperation {
    token: String,
    kind: AsyncOperationKind,
    state: OperationState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    description: Option<String>,
}

impl AsyncOperation {
    /// Starts tracking a freshly accepted operation.
    #[must_use]
    pub fn start(token: impl Into<String>, kind: AsyncOperationKind) -> Self {
        Self {
            token: token.into(),
            kind,
            state: OperationState::InProgress,
            description: None,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn kind(&self) -> AsyncOperationKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> OperationState {
        self.state
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }

    /// Updates the progress description while the operation is still running.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyTerminal`] if the operation has settled.
    pub fn report_progress(&mut self, description: impl Into<String>) -> Result<(), StateError> {
        self.ensure_running()?;
        self.description = Some(description.into());
        Ok(())
    }

    /// Settles the operation as succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyTerminal`] if the operation has settled.
    pub fn succeed(&mut self, description: Option<String>) -> Result<(), StateError> {
        self.settle(OperationState::Succeeded, description)
    }

    /// Settles the operation as failed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyTerminal`] if the operation has settled.
    pub fn fail(&mut self, description: Option<String>) -> Result<(), StateError> {
        self.settle(OperationState::Failed, description)
    }

    /// Whether the resource is gone: a delete that succeeded.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.is_delete() && self.state == OperationState::Succeeded
    }

    /// Builds the poll result for a service instance operation.
    #[must_use]
    pub fn to_last_operation(&self) -> GetLastServiceOperationResponse {
        GetLastServiceOperationResponse {
            state: self.state,
            description: self.description.clone(),
            delete_operation: self.is_gone(),
            instance_usable: None,
            update_repeatable: None,
        }
    }

    /// Builds the poll result for a binding operation.
    #[must_use]
    pub fn to_last_binding_operation(&self) -> GetLastServiceBindingOperationResponse {
        GetLastServiceBindingOperationResponse {
            state: self.state,
            description: self.description.clone(),
            delete_operation: self.is_gone(),
        }
    }

    fn ensure_running(&self) -> Result<(), StateError> {
        if self.state.is_terminal() {
            return Err(StateError::AlreadyTerminal {
                token: self.token.clone(),
                state: self.state,
            });
        }
        Ok(())
    }

    fn settle(
        &mut self,
        state: OperationState,
        description: Option<String>,
    ) -> Result<(), StateError> {
        self.ensure_running()?;
        self.state = state;
        if description.is_some() {
            self.description = description;
        }
        Ok(())
    }
}
