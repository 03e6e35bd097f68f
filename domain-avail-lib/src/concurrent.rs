//! Batch orchestration.
//!
//! Fans a batch out to the resolver under one of two policies and always
//! returns one result per input, in input order. A failing check only ever
//! produces an `Unknown` result for its own domain.

use crate::resolver::DomainResolver;
use crate::types::{BatchRequest, CheckConfig, CheckResult, ExecutionPolicy};
use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Upper bound on in-flight checks under the parallel policy.
pub const MAX_CONCURRENCY: usize = 100;

/// Dispatches batches of checks.
#[derive(Debug, Clone, Copy)]
pub struct BatchOrchestrator {
    policy: ExecutionPolicy,
    concurrency: usize,
    request_delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(policy: ExecutionPolicy, concurrency: usize, request_delay: Duration) -> Self {
        Self {
            policy,
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
            request_delay,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new(config.policy, config.concurrency, config.request_delay)
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Effective worker cap.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every domain in the request and collect results in input order.
    pub async fn run(&self, resolver: &DomainResolver, request: BatchRequest) -> Vec<CheckResult> {
        tracing::debug!(
            domains = request.domains.len(),
            provider = %request.provider,
            policy = %self.policy,
            "starting batch"
        );

        match self.policy {
            ExecutionPolicy::Sequential => self.run_sequential(resolver, &request).await,
            ExecutionPolicy::Parallel => self.run_parallel(resolver, &request).await,
        }
    }

    /// One at a time, pausing between requests but not after the last.
    async fn run_sequential(
        &self,
        resolver: &DomainResolver,
        request: &BatchRequest,
    ) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(request.domains.len());

        for (index, domain) in request.domains.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            let result = resolver
                .check_one(domain, request.provider, request.credentials.as_ref())
                .await;
            results.push(result);
        }

        results
    }

    /// Up to `concurrency` checks in flight, reassembled by index.
    async fn run_parallel(
        &self,
        resolver: &DomainResolver,
        request: &BatchRequest,
    ) -> Vec<CheckResult> {
        let credentials = request.credentials.as_ref();

        let mut indexed: Vec<(usize, CheckResult)> = stream::iter(request.domains.iter().enumerate())
            .map(|(index, domain)| async move {
                let result = resolver.check_one(domain, request.provider, credentials).await;
                (index, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}
