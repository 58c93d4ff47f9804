//! Call instrumentation
//!
//! An instrumented operation runs through an ordered chain of
//! [`CallInterceptor`]s:
//!
//! ```text
//! before(0) → before(1) → … → operation → … → after(1) → after(0)
//! ```
//!
//! If the operation fails no `after` hook runs, so a history recorder ends
//! up with an input that has no matching output. Nothing here is
//! transactional: each hook is its own store round-trip, and concurrent
//! calls may interleave their hooks.

pub mod counter;
pub mod history;
pub mod replay;

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::trace;

use crate::cache::keys::MethodKey;
use crate::types::Result;

pub use counter::CallCounter;
pub use history::CallHistory;
pub use replay::{replay, RecordedCall, Replay};

/// One invocation of an instrumented method
#[derive(Debug, Clone)]
pub struct Call {
    /// Qualified method identity
    pub method: MethodKey,
    /// Positional arguments rendered as a tuple literal, receiver excluded
    pub args: String,
}

impl Call {
    pub fn new(method: MethodKey, args: impl Into<String>) -> Self {
        Self {
            method,
            args: args.into(),
        }
    }
}

/// Hooks run around an instrumented operation
#[async_trait]
pub trait CallInterceptor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Runs before the operation. An error aborts the call.
    async fn before(&self, call: &Call) -> Result<()>;

    /// Runs after the operation succeeded, with its rendered result
    async fn after(&self, _call: &Call, _output: &str) -> Result<()> {
        Ok(())
    }
}

/// Ordered list of interceptors applied around an operation
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn CallInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor; it wraps inside the ones already present
    pub fn push(&mut self, interceptor: Arc<dyn CallInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn with(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.push(interceptor);
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Interceptor names, outermost first
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run `operation` inside the chain and return its result unchanged
    pub async fn run<T, F, Fut>(&self, call: &Call, operation: F) -> Result<T>
    where
        T: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        for interceptor in &self.interceptors {
            trace!(method = %call.method, interceptor = interceptor.name(), "before");
            interceptor.before(call).await?;
        }

        let output = operation().await?;

        let rendered = output.to_string();
        for interceptor in self.interceptors.iter().rev() {
            trace!(method = %call.method, interceptor = interceptor.name(), "after");
            interceptor.after(call, &rendered).await?;
        }

        Ok(output)
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
