//! JournalistClient - one dispatcher per backend operation

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::{ActionDispatcher, NormalizedResult, Payload};
use crate::endpoints::{EndpointTable, Operation};
use crate::error::JournalistResult;
use crate::loading::LoadingState;
use crate::notify::{Notifier, TracingNotifier};
use crate::requests::{
    BiasDetectionRequest, FactCheckRequest, FetchNewsRequest, OperationRequest, SummarizeRequest,
    TranslateRequest,
};
use crate::transport::{HttpTransport, Transport};

pub struct JournalistClient {
    endpoints: EndpointTable,
    loading: LoadingState,
    dispatchers: BTreeMap<Operation, ActionDispatcher>,
}

impl JournalistClient {
    /// HTTP transport and tracing notifications
    pub fn new(config: &ClientConfig) -> JournalistResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(config)?);
        Self::with_parts(config, transport, Arc::new(TracingNotifier::new()))
    }

    pub fn from_env() -> JournalistResult<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Inject the transport and notifier, e.g. a stub backend in tests
    pub fn with_parts(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> JournalistResult<Self> {
        let endpoints = EndpointTable::from_base_url(&config.base_url)?;
        let loading = LoadingState::new();

        let dispatchers = endpoints
            .iter()
            .map(|(op, url)| {
                let dispatcher = ActionDispatcher::new(
                    op,
                    url.clone(),
                    op.success_label(),
                    transport.clone(),
                    loading.clone(),
                    notifier.clone(),
                );
                (op, dispatcher)
            })
            .collect();

        debug!(base_url = %config.base_url, "journalist client ready");

        Ok(Self {
            endpoints,
            loading,
            dispatchers,
        })
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Shared across every dispatcher this client owns
    pub fn loading(&self) -> &LoadingState {
        &self.loading
    }

    pub fn dispatcher(&self, op: Operation) -> &ActionDispatcher {
        // Built for every operation in with_parts.
        &self.dispatchers[&op]
    }

    /// Untyped dispatch, no validation
    pub async fn dispatch(&self, op: Operation, payload: Payload) -> JournalistResult<NormalizedResult> {
        self.dispatcher(op).dispatch(payload).await
    }

    async fn run<R: OperationRequest>(&self, op: Operation, request: &R) -> JournalistResult<NormalizedResult> {
        request.validate()?;
        let payload = request.to_payload()?;
        self.dispatch(op, payload).await
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> JournalistResult<NormalizedResult> {
        self.run(Operation::Summarize, request).await
    }

    pub async fn translate(&self, request: &TranslateRequest) -> JournalistResult<NormalizedResult> {
        self.run(Operation::Translate, request).await
    }

    pub async fn fetch_news(&self, request: &FetchNewsRequest) -> JournalistResult<NormalizedResult> {
        self.run(Operation::FetchNews, request).await
    }

    pub async fn fact_check(&self, request: &FactCheckRequest) -> JournalistResult<NormalizedResult> {
        self.run(Operation::FactCheck, request).await
    }

    pub async fn detect_bias(&self, request: &BiasDetectionRequest) -> JournalistResult<NormalizedResult> {
        self.run(Operation::BiasDetection, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalistError;
    use crate::notify::SilentNotifier;
    use crate::transport::{TransportError, TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoTransport {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
            self.urls.lock().unwrap().push(request.url.clone());
            Ok(TransportResponse::json(200, &json!({"echo": request.body})))
        }
    }

    fn client(transport: Arc<EchoTransport>) -> JournalistClient {
        JournalistClient::with_parts(
            &ClientConfig::new("https://news.example.com/api"),
            transport,
            Arc::new(SilentNotifier),
        )
        .unwrap()
    }

    #[test]
    fn test_one_dispatcher_per_operation() {
        let c = client(Arc::new(EchoTransport::default()));
        for op in Operation::ALL {
            let d = c.dispatcher(op);
            assert_eq!(d.operation(), op);
            assert_eq!(d.success_label(), op.success_label());
            assert!(d.endpoint().as_str().ends_with(op.path()));
        }
    }

    #[tokio::test]
    async fn test_typed_call_routes_to_endpoint() {
        let transport = Arc::new(EchoTransport::default());
        let c = client(transport.clone());

        let result = c
            .translate(&TranslateRequest {
                topic: "Hello".into(),
                url: String::new(),
                language: "fr".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.data(),
            &json!({"echo": {"topic": "Hello", "url": "", "language": "fr"}})
        );
        assert_eq!(
            transport.urls.lock().unwrap().as_slice(),
            ["https://news.example.com/api/translate"]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let transport = Arc::new(EchoTransport::default());
        let c = client(transport.clone());

        let err = c.fetch_news(&FetchNewsRequest::new("")).await.unwrap_err();

        assert!(matches!(err, JournalistError::Validation(_)));
        assert!(transport.urls.lock().unwrap().is_empty());
        assert!(!c.loading().is_loading());
    }
}
