//! Idempotent order execution.
//!
//! The [`Executor`] is the only place intents are recorded and the
//! only place live orders are committed. Everything downstream reads
//! the persisted records.

pub mod dry_run;
pub mod executor;
pub mod idempotency;
pub mod live;

pub use dry_run::DryRunAdapter;
pub use executor::Executor;
pub use idempotency::idempotency_key;
pub use live::LiveAdapter;

use async_trait::async_trait;

use crate::clients::SimmerClient;
use crate::config::{Config, ExecutionMode};
use crate::domain::execution::{OrderIntent, OrderResult};
use crate::error::Result;

/// The seam between the executor and the outside world.
///
/// Implementations must be side-effect free on error paths the
/// executor can retry from; in practice that means an adapter either
/// submits the order or returns an error, never both.
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    /// Submit a buy intent.
    async fn execute(&self, intent: &OrderIntent) -> Result<OrderResult>;

    /// Submit a sell for `shares` against an intent.
    async fn execute_sell(&self, intent: &OrderIntent, shares: f64) -> Result<OrderResult>;
}

/// Build the adapter the configured execution mode calls for.
///
/// Live mode needs `SIMMER_API_KEY` in the environment and fails fast
/// without it.
pub fn build_adapter(config: &Config) -> Result<Box<dyn ExecutionAdapter>> {
    match config.execution.mode {
        ExecutionMode::DryRun => Ok(Box::new(DryRunAdapter)),
        ExecutionMode::Live => {
            let client = SimmerClient::from_env()?;
            Ok(Box::new(LiveAdapter::new(client, config.execution.venue)))
        }
    }
}
