//! Hook traits run around broker operations.
//!
//! A hook is a stateless capability: it observes the request (and the
//! response or error) and either returns `Ok(())` or fails. Any number of
//! hooks may be registered per phase; they run concurrently and must not
//! depend on each other.
//!
//! Used as `Arc<dyn InitializationFlow<Req>>` and friends.

use async_trait::async_trait;
use osb_core::ServiceBrokerError;

/// Runs before the service is invoked. A failure aborts the operation and the
/// service is never called.
#[async_trait]
pub trait InitializationFlow<Req>: Send + Sync
where
    Req: Sync,
{
    async fn initialize(&self, request: &Req) -> Result<(), ServiceBrokerError>;
}

/// Runs after the service returned a response. A failure turns the whole
/// operation into a failure even though the service succeeded.
#[async_trait]
pub trait CompletionFlow<Req, Res>: Send + Sync
where
    Req: Sync,
    Res: Sync,
{
    async fn complete(&self, request: &Req, response: &Res) -> Result<(), ServiceBrokerError>;
}

/// Runs after an initialization hook, the service, or a completion hook
/// failed. Receives the triggering error. Its own failure is reported but
/// never replaces the triggering error.
#[async_trait]
pub trait ErrorFlow<Req>: Send + Sync
where
    Req: Sync,
{
    async fn error(&self, request: &Req, error: &ServiceBrokerError)
        -> Result<(), ServiceBrokerError>;
}
