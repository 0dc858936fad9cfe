//! Request and response envelopes for every broker operation.
//!
//! Requests are built once per inbound call by the transport layer and then
//! only borrowed. Responses are built by the user's service implementation.

pub mod binding;
pub mod instance;
pub mod last_operation;

pub use binding::{
    AppBinding, BindingKind, BindingStatus, CreateServiceInstanceBindingRequest,
    CreateServiceInstanceBindingResponse, DeleteServiceInstanceBindingRequest,
    DeleteServiceInstanceBindingResponse, GetServiceInstanceBindingRequest,
    GetServiceInstanceBindingResponse, RouteBinding,
};
pub use instance::{
    CreateServiceInstanceRequest, CreateServiceInstanceResponse, DeleteServiceInstanceRequest,
    DeleteServiceInstanceResponse, GetServiceInstanceRequest, GetServiceInstanceResponse,
    UpdateServiceInstanceRequest, UpdateServiceInstanceResponse,
};
pub use last_operation::{
    GetLastServiceBindingOperationRequest, GetLastServiceBindingOperationResponse,
    GetLastServiceOperationRequest, GetLastServiceOperationResponse,
};

/// Common view of responses that may complete asynchronously.
///
/// A synchronous response never carries an operation token. An asynchronous
/// one should, so the platform can poll with it.
pub trait AsyncResponse {
    fn is_async(&self) -> bool;

    fn operation(&self) -> Option<&str>;

    /// Whether the response breaks the polling contract by carrying a token
    /// without being asynchronous.
    fn violates_async_contract(&self) -> bool {
        !self.is_async() && self.operation().is_some()
    }
}
