//! Per-operation event flow registry.
//!
//! A [`RegistryConfig`] collects the hooks for one operation type at startup.
//! [`EventFlowRegistry::new`] freezes it; the registry has no mutation API,
//! so hooks cannot change while operations are in flight.
//!
//! Each `run_*` method fans out to every hook of the phase concurrently and
//! waits for all of them to settle. If any failed, the failure of the hook
//! registered first is returned. Siblings are never cancelled, so every hook
//! observes the whole phase.

use std::fmt;
use std::sync::Arc;

use futures_util::future::{join_all, BoxFuture};
use osb_core::ServiceBrokerError;

use super::hooks::{CompletionFlow, ErrorFlow, InitializationFlow};

// ---------------------------------------------------------------------------
// FlowPhase
// ---------------------------------------------------------------------------

/// The three hook phases around an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowPhase {
    Initialization,
    Completion,
    Error,
}

impl FlowPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Completion => "completion",
            Self::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Hooks for one operation type, in registration order.
pub struct RegistryConfig<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    initialization_flows: Vec<Arc<dyn InitializationFlow<Req>>>,
    completion_flows: Vec<Arc<dyn CompletionFlow<Req, Res>>>,
    error_flows: Vec<Arc<dyn ErrorFlow<Req>>>,
}

impl<Req, Res> RegistryConfig<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    /// Creates a configuration with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialization_flows: Vec::new(),
            completion_flows: Vec::new(),
            error_flows: Vec::new(),
        }
    }

    /// Appends an initialization hook. `None` is ignored.
    pub fn add_initialization_flow(
        &mut self,
        flow: Option<Arc<dyn InitializationFlow<Req>>>,
    ) -> &mut Self {
        if let Some(flow) = flow {
            self.initialization_flows.push(flow);
        }
        self
    }

    /// Appends a completion hook. `None` is ignored.
    pub fn add_completion_flow(
        &mut self,
        flow: Option<Arc<dyn CompletionFlow<Req, Res>>>,
    ) -> &mut Self {
        if let Some(flow) = flow {
            self.completion_flows.push(flow);
        }
        self
    }

    /// Appends an error hook. `None` is ignored.
    pub fn add_error_flow(&mut self, flow: Option<Arc<dyn ErrorFlow<Req>>>) -> &mut Self {
        if let Some(flow) = flow {
            self.error_flows.push(flow);
        }
        self
    }

    #[must_use]
    pub fn with_initialization_flow<F>(mut self, flow: F) -> Self
    where
        F: InitializationFlow<Req> + 'static,
    {
        self.initialization_flows.push(Arc::new(flow));
        self
    }

    #[must_use]
    pub fn with_completion_flow<F>(mut self, flow: F) -> Self
    where
        F: CompletionFlow<Req, Res> + 'static,
    {
        self.completion_flows.push(Arc::new(flow));
        self
    }

    #[must_use]
    pub fn with_error_flow<F>(mut self, flow: F) -> Self
    where
        F: ErrorFlow<Req> + 'static,
    {
        self.error_flows.push(Arc::new(flow));
        self
    }
}

impl<Req, Res> Default for RegistryConfig<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for RegistryConfig<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("initialization_flows", &self.initialization_flows.len())
            .field("completion_flows", &self.completion_flows.len())
            .field("error_flows", &self.error_flows.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EventFlowRegistry
// ---------------------------------------------------------------------------

/// Frozen hook pipelines for one operation type.
pub struct EventFlowRegistry<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    initialization_flows: Vec<Arc<dyn InitializationFlow<Req>>>,
    completion_flows: Vec<Arc<dyn CompletionFlow<Req, Res>>>,
    error_flows: Vec<Arc<dyn ErrorFlow<Req>>>,
}

impl<Req, Res> EventFlowRegistry<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    #[must_use]
    pub fn new(config: RegistryConfig<Req, Res>) -> Self {
        Self {
            initialization_flows: config.initialization_flows,
            completion_flows: config.completion_flows,
            error_flows: config.error_flows,
        }
    }

    #[must_use]
    pub fn initialization_flow_count(&self) -> usize {
        self.initialization_flows.len()
    }

    #[must_use]
    pub fn completion_flow_count(&self) -> usize {
        self.completion_flows.len()
    }

    #[must_use]
    pub fn error_flow_count(&self) -> usize {
        self.error_flows.len()
    }

    /// Runs every initialization hook concurrently.
    ///
    /// # Errors
    ///
    /// Returns the error of the earliest-registered hook that failed.
    pub async fn run_initialization_flows(&self, request: &Req) -> Result<(), ServiceBrokerError> {
        let flows = self
            .initialization_flows
            .iter()
            .map(|flow| flow.initialize(request))
            .collect();
        merge(FlowPhase::Initialization, flows).await
    }

    /// Runs every completion hook concurrently.
    ///
    /// # Errors
    ///
    /// Returns the error of the earliest-registered hook that failed.
    pub async fn run_completion_flows(
        &self,
        request: &Req,
        response: &Res,
    ) -> Result<(), ServiceBrokerError> {
        let flows = self
            .completion_flows
            .iter()
            .map(|flow| flow.complete(request, response))
            .collect();
        merge(FlowPhase::Completion, flows).await
    }

    /// Runs every error hook concurrently with the triggering error.
    ///
    /// # Errors
    ///
    /// Returns the error of the earliest-registered hook that failed. The
    /// caller decides what to do with it; `error` itself is untouched.
    pub async fn run_error_flows(
        &self,
        request: &Req,
        error: &ServiceBrokerError,
    ) -> Result<(), ServiceBrokerError> {
        let flows = self
            .error_flows
            .iter()
            .map(|flow| flow.error(request, error))
            .collect();
        merge(FlowPhase::Error, flows).await
    }
}

impl<Req, Res> Default for EventFlowRegistry<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    fn default() -> Self {
        Self::new(RegistryConfig::new())
    }
}

impl<Req, Res> fmt::Debug for EventFlowRegistry<Req, Res>
where
    Req: Sync,
    Res: Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFlowRegistry")
            .field("initialization_flows", &self.initialization_flows.len())
            .field("completion_flows", &self.completion_flows.len())
            .field("error_flows", &self.error_flows.len())
            .finish()
    }
}

/// Fan-out / fan-in over one phase's hooks.
///
/// `join_all` keeps outcomes in registration order, which makes the surfaced
/// failure independent of scheduling. Hook futures are boxed and collected
/// before the merge so the returned future stays `Send`.
async fn merge(
    phase: FlowPhase,
    flows: Vec<BoxFuture<'_, Result<(), ServiceBrokerError>>>,
) -> Result<(), ServiceBrokerError> {
    let outcomes = join_all(flows).await;

    let mut first_failure = None;
    for (hook_index, outcome) in outcomes.into_iter().enumerate() {
        if let Err(error) = outcome {
            tracing::debug!(
                phase = phase.as_str(),
                hook_index = hook_index,
                error = %error,
                "event flow hook failed"
            );
            if first_failure.is_none() {
                first_failure = Some(error);
            }
        }
    }

    first_failure.map_or(Ok(()), Err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokio::sync::Barrier;

    use super::*;
    use crate::test_support::{event_log, RecordingCompletion, RecordingError, RecordingInit};

    type TestRegistry = EventFlowRegistry<String, u32>;

    /// Hook that waits until every sibling has reached the barrier.
    struct RendezvousInit {
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl InitializationFlow<String> for RendezvousInit {
        async fn initialize(&self, _request: &String) -> Result<(), ServiceBrokerError> {
            self.barrier.wait().await;
            Ok(())
        }
    }

    /// Hook that sleeps before answering, so completion order differs from
    /// registration order.
    struct DelayedInit {
        delay_ms: u64,
        fail: bool,
        label: String,
    }

    #[async_trait]
    impl InitializationFlow<String> for DelayedInit {
        async fn initialize(&self, _request: &String) -> Result<(), ServiceBrokerError> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            if self.fail {
                Err(ServiceBrokerError::invalid_parameters(self.label.clone()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn empty_registry_phases_are_no_ops() {
        let registry = TestRegistry::default();
        let request = "req".to_string();
        let error = ServiceBrokerError::broker("boom");

        registry.run_initialization_flows(&request).await.unwrap();
        registry.run_completion_flows(&request, &7).await.unwrap();
        registry.run_error_flows(&request, &error).await.unwrap();
    }

    #[test]
    fn absent_hooks_are_ignored() {
        let mut config = RegistryConfig::<String, u32>::new();
        config
            .add_initialization_flow(None)
            .add_completion_flow(None)
            .add_error_flow(None);
        let log = event_log();
        config.add_initialization_flow(Some(Arc::new(RecordingInit::new("a", &log))));

        let registry = EventFlowRegistry::new(config);
        assert_eq!(registry.initialization_flow_count(), 1);
        assert_eq!(registry.completion_flow_count(), 0);
        assert_eq!(registry.error_flow_count(), 0);
    }

    #[tokio::test]
    async fn every_hook_sees_the_same_request() {
        let log = event_log();
        let first = RecordingInit::new("first", &log);
        let second = RecordingInit::new("second", &log);
        let third = RecordingInit::new("third", &log);
        let seen = [first.seen(), second.seen(), third.seen()];

        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_initialization_flow(first)
                .with_initialization_flow(second)
                .with_initialization_flow(third),
        );

        let request = "req".to_string();
        registry.run_initialization_flows(&request).await.unwrap();

        let expected = std::ptr::from_ref(&request) as usize;
        for addresses in &seen {
            assert_eq!(*addresses.lock(), vec![expected]);
        }
        assert_eq!(log.lock().len(), 3);
    }

    #[tokio::test]
    async fn hooks_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_initialization_flow(RendezvousInit {
                    barrier: barrier.clone(),
                })
                .with_initialization_flow(RendezvousInit { barrier }),
        );

        // Sequential execution would deadlock on the barrier.
        let request = "req".to_string();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            registry.run_initialization_flows(&request),
        )
        .await;
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn earliest_registered_failure_wins() {
        // The second hook fails first in wall-clock time; the first hook's
        // failure is still the one surfaced.
        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_initialization_flow(DelayedInit {
                    delay_ms: 50,
                    fail: true,
                    label: "slow".to_string(),
                })
                .with_initialization_flow(DelayedInit {
                    delay_ms: 0,
                    fail: true,
                    label: "fast".to_string(),
                })
                .with_initialization_flow(DelayedInit {
                    delay_ms: 10,
                    fail: false,
                    label: "ok".to_string(),
                }),
        );

        let err = registry
            .run_initialization_flows(&"req".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceBrokerError::InvalidParameters { message } if message == "slow"
        ));
    }

    #[tokio::test]
    async fn failure_does_not_cancel_siblings() {
        let log = event_log();
        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_completion_flow(RecordingCompletion::failing("bad", &log))
                .with_completion_flow(RecordingCompletion::new("good", &log)),
        );

        let err = registry
            .run_completion_flows(&"req".to_string(), &1)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceBrokerError::Broker { .. }));
        assert_eq!(*log.lock(), vec!["complete:bad", "complete:good"]);
    }

    #[tokio::test]
    async fn error_hooks_receive_triggering_error() {
        let log = event_log();
        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_error_flow(RecordingError::new("audit", &log))
                .with_error_flow(RecordingError::new("cleanup", &log)),
        );

        let trigger = ServiceBrokerError::invalid_parameters("size");
        registry
            .run_error_flows(&"req".to_string(), &trigger)
            .await
            .unwrap();

        let mut entries = log.lock().clone();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                "error:audit:invalid parameters: size",
                "error:cleanup:invalid parameters: size",
            ]
        );
    }

    #[tokio::test]
    async fn failing_error_hook_is_surfaced() {
        let log = event_log();
        let registry = TestRegistry::new(
            RegistryConfig::new()
                .with_error_flow(RecordingError::new("audit", &log))
                .with_error_flow(RecordingError::failing("notify", &log)),
        );

        let trigger = ServiceBrokerError::invalid_parameters("size");
        let err = registry
            .run_error_flows(&"req".to_string(), &trigger)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceBrokerError::Broker { ref message, .. } if message == "error hook notify failed"
        ));
        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn phases_run_on_spawned_tasks() {
        let log = event_log();
        let registry = Arc::new(TestRegistry::new(
            RegistryConfig::new()
                .with_initialization_flow(RecordingInit::new("a", &log))
                .with_completion_flow(RecordingCompletion::new("b", &log))
                .with_error_flow(RecordingError::new("c", &log)),
        ));

        let task = tokio::spawn({
            let registry = Arc::clone(&registry);
            async move {
                let request = "req".to_string();
                registry.run_initialization_flows(&request).await?;
                registry.run_completion_flows(&request, &1).await?;
                let error = ServiceBrokerError::broker("boom");
                registry.run_error_flows(&request, &error).await
            }
        });

        task.await.unwrap().unwrap();
        assert_eq!(*log.lock(), vec!["init:a", "complete:b", "error:c:boom"]);
    }

    proptest! {
        #[test]
        fn surfaced_failure_is_lowest_failing_index(
            pattern in proptest::collection::vec((any::<bool>(), 0u64..5), 0..8)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();

            let mut config = RegistryConfig::<String, u32>::new();
            for (index, (fail, delay_ms)) in pattern.iter().enumerate() {
                config = config.with_initialization_flow(DelayedInit {
                    delay_ms: *delay_ms,
                    fail: *fail,
                    label: index.to_string(),
                });
            }
            let registry = TestRegistry::new(config);

            let outcome = runtime.block_on(registry.run_initialization_flows(&"req".to_string()));
            let expected = pattern.iter().position(|(fail, _)| *fail);

            match (outcome, expected) {
                (Ok(()), None) => {}
                (Err(ServiceBrokerError::InvalidParameters { message }), Some(index)) => {
                    prop_assert_eq!(message, index.to_string());
                }
                (other, expected) => {
                    prop_assert!(
                        false,
                        "unexpected outcome {:?} for expected {:?}",
                        other,
                        expected
                    );
                }
            }
        }
    }
}
