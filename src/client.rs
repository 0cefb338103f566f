//! The dservice client.
//!
//! Construct once at startup, `init()` once, and hand clones to whoever
//! needs to talk to the backend. `fetch()` may be called before `init()`
//! has finished; it waits for discovery.
//!
//! ```rust,no_run
//! use dservice_client::{ChainContext, ClientOptions, DServiceClient, RequestOptions};
//! use dservice_client::blockchain::{BlockchainClient, EnsTextResolver};
//! use dservice_client::config::EnsConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DServiceClient::new("app.eth", ClientOptions::default())?;
//! let resolver = EnsTextResolver::new(BlockchainClient::new(EnsConfig::default())?);
//!
//! let early = tokio::spawn({
//!     let client = client.clone();
//!     async move { client.fetch("/pages", RequestOptions::get()).await }
//! });
//! client.init(&resolver, ChainContext::default()).await?;
//! let response = early.await??;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::Response;

use crate::blockchain::{ChainContext, TextRecordResolver};
use crate::config::ClientConfig;
use crate::discovery::{self, DiscoveryError, DiscoveryResult, ServiceIdentity};
use crate::http::{FetchResult, RequestOptions};
use crate::lifecycle::{ReadinessGate, ReadinessState};
use crate::load_balancer::EndpointSet;
use crate::observability::metrics;
use crate::resilience::FailoverFetcher;

/// Construction options.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Static endpoint; when set, discovery never runs.
    pub api_endpoint: Option<String>,
    /// Deadline for a `fetch()` that does not carry its own.
    pub default_deadline: Option<Duration>,
    /// Cap on each endpoint attempt.
    pub attempt_timeout: Option<Duration>,
    /// TCP connect timeout of the HTTP client.
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl ClientOptions {
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            api_endpoint: config.api_endpoint.clone(),
            default_deadline: config.fetch.default_deadline_secs.map(Duration::from_secs),
            attempt_timeout: config.fetch.attempt_timeout_secs.map(Duration::from_secs),
            connect_timeout: Some(Duration::from_secs(config.fetch.connect_timeout_secs)),
            user_agent: Some(config.fetch.user_agent.clone()),
        }
    }
}

struct Inner {
    identity: ServiceIdentity,
    gate: ReadinessGate,
    fetcher: FailoverFetcher,
}

/// Resilient fetch client for a dservice-published backend.
///
/// Cheap to clone; clones share discovery state.
#[derive(Clone)]
pub struct DServiceClient {
    inner: Arc<Inner>,
}

impl DServiceClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(domain: impl Into<String>, options: ClientOptions) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(connect) = options.connect_timeout {
            builder = builder.connect_timeout(connect);
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(Self::with_http_client(domain, options, builder.build()?))
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.domain.clone(), ClientOptions::from_config(config))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(domain: impl Into<String>, options: ClientOptions, http: reqwest::Client) -> Self {
        let mut identity = ServiceIdentity::new(domain);
        identity.static_override = options.api_endpoint;

        let fetcher = FailoverFetcher::new(http)
            .with_attempt_timeout(options.attempt_timeout)
            .with_default_deadline(options.default_deadline);

        Self {
            inner: Arc::new(Inner {
                identity,
                gate: ReadinessGate::new(),
                fetcher,
            }),
        }
    }

    /// Discover and finalize the endpoint set.
    ///
    /// Only the first call runs discovery. Later calls, including
    /// concurrent ones, wait for and return that first outcome.
    pub async fn init(
        &self,
        resolver: &dyn TextRecordResolver,
        context: ChainContext,
    ) -> DiscoveryResult<Arc<EndpointSet>> {
        let gate = &self.inner.gate;
        if !gate.begin() {
            tracing::debug!(domain = %self.domain(), "Discovery already started, waiting for its outcome");
            return gate.wait().await;
        }

        let mut guard = CompleteOnDrop {
            gate,
            domain: &self.inner.identity.domain,
            armed: true,
        };

        let outcome = discovery::resolve(&self.inner.identity, resolver, context)
            .await
            .map(|endpoints| Arc::new(EndpointSet::shuffled(endpoints)));

        match &outcome {
            Ok(endpoints) => {
                metrics::record_endpoint_count(endpoints.len());
                tracing::info!(
                    domain = %self.domain(),
                    endpoints = ?endpoints.as_slice(),
                    "Client ready"
                );
            }
            Err(e) => {
                tracing::error!(domain = %self.domain(), error = %e, "Service discovery failed");
            }
        }

        guard.armed = false;
        gate.complete(outcome.clone());
        outcome
    }

    /// Fetch `path` from the discovered backend.
    ///
    /// Waits for `init()` if it has not finished yet.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> FetchResult<Response> {
        let endpoints = self.inner.gate.wait().await?;
        self.inner.fetcher.fetch(&endpoints, path, &options).await
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> FetchResult<Response> {
        self.fetch(path, RequestOptions::get()).await
    }

    pub fn domain(&self) -> &str {
        &self.inner.identity.domain
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.inner.identity
    }

    pub fn state(&self) -> ReadinessState {
        self.inner.gate.state()
    }

    /// The finalized endpoint set, once discovery has succeeded.
    pub fn endpoints(&self) -> Option<Arc<EndpointSet>> {
        self.inner.gate.try_get().and_then(Result::ok)
    }
}

impl std::fmt::Debug for DServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DServiceClient")
            .field("domain", &self.inner.identity.domain)
            .field("static_override", &self.inner.identity.static_override)
            .field("state", &self.state())
            .finish()
    }
}

/// Publishes `Interrupted` if `init()` is dropped mid-discovery, so
/// waiting fetches are released instead of parked forever.
struct CompleteOnDrop<'a> {
    gate: &'a ReadinessGate,
    domain: &'a str,
    armed: bool,
}

impl Drop for CompleteOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(domain = %self.domain, "init() dropped before discovery finished");
            self.gate.complete(Err(DiscoveryError::Interrupted {
                domain: self.domain.to_string(),
            }));
        }
    }
}
