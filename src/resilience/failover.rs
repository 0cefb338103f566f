//! Sequential failover across the finalized endpoint set.
//!
//! # Responsibilities
//! - Issue the request against endpoint 0, then 1, ... until one answers
//! - Apply the policy table to each received status
//! - Bound each attempt by the caller's remaining deadline
//!
//! # Design Decisions
//! - Strictly one attempt in flight per call; a side-effecting request is
//!   never sent to two backends at once
//! - Every call starts from index 0 of the same order
//! - Exhausting the list always raises, whether the last failure was a 5xx
//!   or a transport error

use std::time::Duration;

use reqwest::{Client, Response};
use tokio::time::{timeout, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::http::{AttemptFailure, FetchError, FetchResult, RequestOptions};
use crate::load_balancer::EndpointSet;
use crate::observability::metrics;
use crate::resilience::policy::{classify, AttemptOutcome};
use crate::resilience::timeouts::AttemptBudget;

/// Issues requests with per-response failover.
#[derive(Debug, Clone)]
pub struct FailoverFetcher {
    http: Client,
    attempt_timeout: Option<Duration>,
    default_deadline: Option<Duration>,
}

impl FailoverFetcher {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            attempt_timeout: None,
            default_deadline: None,
        }
    }

    /// Cap every individual attempt.
    pub fn with_attempt_timeout(mut self, limit: Option<Duration>) -> Self {
        self.attempt_timeout = limit;
        self
    }

    /// Deadline used when the caller supplies none.
    pub fn with_default_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.default_deadline = deadline;
        self
    }

    /// Fetch `path` from the first endpoint that answers acceptably.
    pub async fn fetch(
        &self,
        endpoints: &EndpointSet,
        path: &str,
        options: &RequestOptions,
    ) -> FetchResult<Response> {
        let span = tracing::debug_span!(
            "fetch",
            fetch_id = %Uuid::new_v4(),
            method = %options.method,
            path = %path,
        );

        let started = Instant::now();
        let result = self.run(endpoints, path, options).instrument(span).await;
        metrics::record_fetch_duration(started.elapsed().as_secs_f64());
        result
    }

    async fn run(
        &self,
        endpoints: &EndpointSet,
        path: &str,
        options: &RequestOptions,
    ) -> FetchResult<Response> {
        if endpoints.is_empty() {
            return Err(FetchError::NoEndpoints);
        }

        let budget = AttemptBudget::start(options.deadline.or(self.default_deadline), self.attempt_timeout);
        let mut last_failure = None;

        for (i, endpoint) in endpoints.iter().enumerate() {
            let Ok(limit) = budget.next_attempt() else {
                return Err(deadline_exceeded(&budget, i, last_failure.take()));
            };

            let url = format!("{}{}", endpoint, path);
            tracing::debug!(endpoint_idx = i, url = %url, "Attempting endpoint");

            let failure = match self.attempt(endpoint, &url, options, limit).await {
                Ok(response) => {
                    let status = response.status();
                    let outcome = classify(status);
                    metrics::record_attempt(outcome.as_str());
                    match outcome {
                        AttemptOutcome::Success => return Ok(response),
                        AttemptOutcome::Client => {
                            tracing::debug!(endpoint = %endpoint, status = %status, "Client error, not failing over");
                            return Err(FetchError::Client {
                                status,
                                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                                endpoint: endpoint.to_string(),
                            });
                        }
                        AttemptOutcome::Transient => AttemptFailure::Status {
                            endpoint: endpoint.to_string(),
                            status,
                        },
                    }
                }
                Err(failure) => {
                    metrics::record_attempt(AttemptOutcome::Transient.as_str());
                    failure
                }
            };

            let remaining = endpoints.len() - i - 1;
            tracing::warn!(endpoint_idx = i, remaining, error = %failure, "Endpoint attempt failed");

            if budget.is_exhausted() {
                return Err(deadline_exceeded(&budget, i + 1, Some(failure)));
            }
            last_failure = Some(failure);
        }

        match last_failure {
            Some(last) => Err(FetchError::AllEndpointsFailed {
                attempts: endpoints.len(),
                last,
            }),
            None => Err(FetchError::NoEndpoints),
        }
    }

    async fn attempt(
        &self,
        endpoint: &str,
        url: &str,
        options: &RequestOptions,
        limit: Option<Duration>,
    ) -> Result<Response, AttemptFailure> {
        let send = options.build(&self.http, url).send();
        let result = match limit {
            Some(after) => timeout(after, send).await.map_err(|_| AttemptFailure::Timeout {
                endpoint: endpoint.to_string(),
                after,
            })?,
            None => send.await,
        };
        result.map_err(|source| AttemptFailure::Transport {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

fn deadline_exceeded(budget: &AttemptBudget, attempts: usize, last: Option<AttemptFailure>) -> FetchError {
    FetchError::DeadlineExceeded {
        deadline: budget.total().unwrap_or_default(),
        attempts,
        last,
    }
}
