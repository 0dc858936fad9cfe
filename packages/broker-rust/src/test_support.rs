//! Shared fixtures for unit tests: recording hooks and in-memory stub services.
//!
//! Every fixture writes to an [`EventLog`] created by the test, so tests can
//! assert on the exact sequence of hook and service calls.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use osb_core::messages::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse,
    CreateServiceInstanceRequest, CreateServiceInstanceResponse,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse,
    DeleteServiceInstanceRequest, DeleteServiceInstanceResponse,
    GetLastServiceBindingOperationRequest, GetLastServiceBindingOperationResponse,
    GetLastServiceOperationRequest, GetLastServiceOperationResponse, GetServiceInstanceRequest,
    GetServiceInstanceResponse, UpdateServiceInstanceRequest, UpdateServiceInstanceResponse,
};
use osb_core::{AsyncOperation, AsyncOperationKind, ServiceBrokerError};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use crate::flow::{
    CompletionFlow, ErrorFlow, EventFlowConfig, EventFlowRegistries, InitializationFlow,
};
use crate::service::BrokerOrchestrator;
use crate::traits::{ServiceInstanceBindingService, ServiceInstanceService};

pub(crate) type EventLog = Arc<Mutex<Vec<String>>>;

type ErrorFactory = Arc<dyn Fn() -> ServiceBrokerError + Send + Sync>;

pub(crate) fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Installs a test-friendly subscriber. Safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Orchestrator over the given hooks and services.
pub(crate) fn orchestrator<I, B>(
    config: EventFlowConfig,
    instances: I,
    bindings: B,
) -> BrokerOrchestrator
where
    I: ServiceInstanceService + 'static,
    B: ServiceInstanceBindingService + 'static,
{
    BrokerOrchestrator::new(
        Arc::new(instances),
        Arc::new(bindings),
        Arc::new(EventFlowRegistries::new(config)),
    )
}

// ---------------------------------------------------------------------------
// Recording hooks
// ---------------------------------------------------------------------------

/// Initialization hook that logs `init:{label}` and records the address of
/// every request it sees.
pub(crate) struct RecordingInit {
    label: &'static str,
    log: EventLog,
    seen: Arc<Mutex<Vec<usize>>>,
    failure: Option<ErrorFactory>,
}

impl RecordingInit {
    pub(crate) fn new(label: &'static str, log: &EventLog) -> Self {
        Self {
            label,
            log: Arc::clone(log),
            seen: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub(crate) fn failing<F>(label: &'static str, log: &EventLog, failure: F) -> Self
    where
        F: Fn() -> ServiceBrokerError + Send + Sync + 'static,
    {
        Self {
            failure: Some(Arc::new(failure)),
            ..Self::new(label, log)
        }
    }

    pub(crate) fn seen(&self) -> Arc<Mutex<Vec<usize>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl<Req> InitializationFlow<Req> for RecordingInit
where
    Req: Sync,
{
    async fn initialize(&self, request: &Req) -> Result<(), ServiceBrokerError> {
        self.seen.lock().push(std::ptr::from_ref(request) as usize);
        self.log.lock().push(format!("init:{}", self.label));
        match &self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

/// Completion hook that logs `complete:{label}` and keeps the `Debug` form of
/// every request/response pair.
pub(crate) struct RecordingCompletion {
    label: &'static str,
    log: EventLog,
    observed: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl RecordingCompletion {
    pub(crate) fn new(label: &'static str, log: &EventLog) -> Self {
        Self {
            label,
            log: Arc::clone(log),
            observed: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Fails with `Broker("completion hook {label} failed")`.
    pub(crate) fn failing(label: &'static str, log: &EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(label, log)
        }
    }

    pub(crate) fn observed(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.observed)
    }
}

#[async_trait]
impl<Req, Res> CompletionFlow<Req, Res> for RecordingCompletion
where
    Req: Debug + Sync,
    Res: Debug + Sync,
{
    async fn complete(&self, request: &Req, response: &Res) -> Result<(), ServiceBrokerError> {
        self.observed
            .lock()
            .push((format!("{request:?}"), format!("{response:?}")));
        self.log.lock().push(format!("complete:{}", self.label));
        if self.fail {
            Err(ServiceBrokerError::broker(format!(
                "completion hook {} failed",
                self.label
            )))
        } else {
            Ok(())
        }
    }
}

/// Error hook that logs `error:{label}:{error}`.
pub(crate) struct RecordingError {
    label: &'static str,
    log: EventLog,
    fail: bool,
}

impl RecordingError {
    pub(crate) fn new(label: &'static str, log: &EventLog) -> Self {
        Self {
            label,
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub(crate) fn failing(label: &'static str, log: &EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(label, log)
        }
    }
}

#[async_trait]
impl<Req> ErrorFlow<Req> for RecordingError
where
    Req: Sync,
{
    async fn error(
        &self,
        _request: &Req,
        error: &ServiceBrokerError,
    ) -> Result<(), ServiceBrokerError> {
        self.log.lock().push(format!("error:{}:{error}", self.label));
        if self.fail {
            Err(ServiceBrokerError::broker(format!("error hook {} failed", self.label)))
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Stub services
// ---------------------------------------------------------------------------

/// Call counts, the event log, and the in-memory async operation table
/// shared by clones of a stub service.
#[derive(Clone)]
struct StubState {
    log: EventLog,
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,
    operations: Arc<Mutex<HashMap<String, AsyncOperation>>>,
    next_token: Arc<AtomicU64>,
    failure: Option<ErrorFactory>,
}

impl StubState {
    fn new(log: &EventLog) -> Self {
        Self {
            log: Arc::clone(log),
            calls: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(HashMap::new())),
            next_token: Arc::new(AtomicU64::new(1)),
            failure: None,
        }
    }

    /// Logs and counts a call, then applies the configured failure.
    fn record(&self, operation: &'static str) -> Result<(), ServiceBrokerError> {
        self.log.lock().push(format!("service:{operation}"));
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        match &self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }

    fn start(&self, kind: AsyncOperationKind) -> String {
        let token = format!("op-{}", self.next_token.fetch_add(1, Ordering::Relaxed));
        self.operations
            .lock()
            .insert(token.clone(), AsyncOperation::start(token.clone(), kind));
        token
    }

    fn lookup(&self, token: Option<&str>) -> Option<AsyncOperation> {
        token.and_then(|token| self.operations.lock().get(token).cloned())
    }

    fn calls(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    fn finish(&self, token: &str) {
        self.operations
            .lock()
            .get_mut(token)
            .expect("unknown operation token")
            .succeed(None)
            .expect("operation already settled");
    }
}

/// Instance service that completes synchronously unless the platform accepts
/// async, in which case operations stay in progress until [`Self::finish`].
#[derive(Clone)]
pub(crate) struct StubInstanceService {
    state: StubState,
}

impl StubInstanceService {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self {
            state: StubState::new(log),
        }
    }

    /// Every call fails with the error `failure` builds.
    pub(crate) fn failing<F>(log: &EventLog, failure: F) -> Self
    where
        F: Fn() -> ServiceBrokerError + Send + Sync + 'static,
    {
        let mut state = StubState::new(log);
        state.failure = Some(Arc::new(failure));
        Self { state }
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.state.calls(operation)
    }

    pub(crate) fn finish(&self, token: &str) {
        self.state.finish(token);
    }
}

#[async_trait]
impl ServiceInstanceService for StubInstanceService {
    async fn create_service_instance(
        &self,
        request: &CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ServiceBrokerError> {
        self.state.record("create_service_instance")?;
        if request.async_accepted {
            let token = self.state.start(AsyncOperationKind::Provision);
            Ok(CreateServiceInstanceResponse::accepted(token))
        } else {
            Ok(CreateServiceInstanceResponse::completed())
        }
    }

    async fn update_service_instance(
        &self,
        request: &UpdateServiceInstanceRequest,
    ) -> Result<UpdateServiceInstanceResponse, ServiceBrokerError> {
        self.state.record("update_service_instance")?;
        if request.async_accepted {
            let token = self.state.start(AsyncOperationKind::Update);
            Ok(UpdateServiceInstanceResponse::accepted(token))
        } else {
            Ok(UpdateServiceInstanceResponse::completed())
        }
    }

    async fn delete_service_instance(
        &self,
        request: &DeleteServiceInstanceRequest,
    ) -> Result<DeleteServiceInstanceResponse, ServiceBrokerError> {
        self.state.record("delete_service_instance")?;
        if request.async_accepted {
            let token = self.state.start(AsyncOperationKind::Deprovision);
            Ok(DeleteServiceInstanceResponse::accepted(token))
        } else {
            Ok(DeleteServiceInstanceResponse::completed())
        }
    }

    async fn get_service_instance(
        &self,
        _request: &GetServiceInstanceRequest,
    ) -> Result<GetServiceInstanceResponse, ServiceBrokerError> {
        self.state.record("get_service_instance")?;
        Ok(GetServiceInstanceResponse {
            service_definition_id: "svc-1".to_string(),
            plan_id: "plan-1".to_string(),
            ..GetServiceInstanceResponse::default()
        })
    }

    async fn get_last_operation(
        &self,
        request: &GetLastServiceOperationRequest,
    ) -> Result<GetLastServiceOperationResponse, ServiceBrokerError> {
        self.state.record("get_last_operation")?;
        self.state
            .lookup(request.operation.as_deref())
            .map(|operation| operation.to_last_operation())
            .ok_or_else(|| ServiceBrokerError::InstanceDoesNotExist {
                service_instance_id: request.service_instance_id.clone(),
            })
    }
}

/// Binding service counterpart of [`StubInstanceService`]. Does not
/// implement fetch.
#[derive(Clone)]
pub(crate) struct StubBindingService {
    state: StubState,
}

impl StubBindingService {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self {
            state: StubState::new(log),
        }
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.state.calls(operation)
    }

    pub(crate) fn finish(&self, token: &str) {
        self.state.finish(token);
    }
}

#[async_trait]
impl ServiceInstanceBindingService for StubBindingService {
    async fn create_service_instance_binding(
        &self,
        request: &CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, ServiceBrokerError> {
        self.state.record("create_service_instance_binding")?;
        if request.async_accepted {
            let token = self.state.start(AsyncOperationKind::Bind);
            return Ok(CreateServiceInstanceBindingResponse::accepted(token));
        }
        let mut credentials = serde_json::Map::new();
        credentials.insert(
            "uri".to_string(),
            serde_json::Value::String(format!("redis://{}", request.binding_id)),
        );
        Ok(CreateServiceInstanceBindingResponse::app(credentials))
    }

    async fn delete_service_instance_binding(
        &self,
        request: &DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, ServiceBrokerError> {
        self.state.record("delete_service_instance_binding")?;
        if request.async_accepted {
            let token = self.state.start(AsyncOperationKind::Unbind);
            Ok(DeleteServiceInstanceBindingResponse::accepted(token))
        } else {
            Ok(DeleteServiceInstanceBindingResponse::completed())
        }
    }

    async fn get_last_operation(
        &self,
        request: &GetLastServiceBindingOperationRequest,
    ) -> Result<GetLastServiceBindingOperationResponse, ServiceBrokerError> {
        self.state.record("get_last_binding_operation")?;
        self.state
            .lookup(request.operation.as_deref())
            .map(|operation| operation.to_last_binding_operation())
            .ok_or_else(|| ServiceBrokerError::BindingDoesNotExist {
                binding_id: request.binding_id.clone(),
            })
    }
}

/// Binding service that only implements the required methods, leaving fetch
/// and polling at their unsupported defaults.
pub(crate) struct SyncOnlyBindingService;

#[async_trait]
impl ServiceInstanceBindingService for SyncOnlyBindingService {
    async fn create_service_instance_binding(
        &self,
        _request: &CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, ServiceBrokerError> {
        Ok(CreateServiceInstanceBindingResponse::route("https://route.example.com"))
    }

    async fn delete_service_instance_binding(
        &self,
        _request: &DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, ServiceBrokerError> {
        Ok(DeleteServiceInstanceBindingResponse::completed())
    }
}
