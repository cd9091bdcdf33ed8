use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};

use crate::config::DocumentFormat;
use crate::error::ProcessError;
use crate::processor::{is_successful, Document, ExtractionStrategy};
use crate::sanitize;

/// Ordered strategies for one document format, tried until one yields text.
pub struct FallbackChain {
    format: DocumentFormat,
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    attempt_timeout: Option<Duration>,
}

impl FallbackChain {
    pub fn new(format: DocumentFormat, strategies: Vec<Arc<dyn ExtractionStrategy>>) -> Self {
        Self {
            format,
            strategies,
            attempt_timeout: None,
        }
    }

    /// Bound every attempt. A stalled attempt is abandoned and the next tier
    /// runs.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs the tiers in order and returns the first successful result.
    ///
    /// Never fails: every tier failure is logged, and exhausting the chain
    /// yields an empty list.
    pub fn extract(&self, path: &Path) -> Vec<Document> {
        let filename = sanitize::redact_path(path);

        for (tier, strategy) in self.strategies.iter().enumerate() {
            let _span = tracing::info_span!(
                "extract.attempt",
                doc_format = self.format.name(),
                strategy = strategy.name(),
                tier,
                filename = %filename,
            )
            .entered();

            match self.run_attempt(strategy, path) {
                Ok(documents) if is_successful(&documents) => {
                    tracing::debug!(
                        "{} extracted {} document(s) from {}",
                        strategy.name(),
                        documents.len(),
                        filename
                    );
                    return documents;
                }
                Ok(_) => {
                    tracing::info!(
                        "{} produced no text for {}, trying next tier",
                        strategy.name(),
                        filename
                    );
                }
                Err(e) => {
                    tracing::warn!("{} failed for {}: {}", strategy.name(), filename, e);
                }
            }
        }

        tracing::warn!(
            "All {} extraction strategies failed for {}",
            self.format.name(),
            filename
        );
        Vec::new()
    }

    fn run_attempt(
        &self,
        strategy: &Arc<dyn ExtractionStrategy>,
        path: &Path,
    ) -> Result<Vec<Document>, ProcessError> {
        let Some(timeout) = self.attempt_timeout else {
            return guarded_attempt(strategy.as_ref(), path);
        };

        let (tx, rx) = bounded(1);
        let worker_strategy = Arc::clone(strategy);
        let worker_path = path.to_path_buf();

        let spawned = thread::Builder::new()
            .name(format!("extract-{}", strategy.name()))
            .spawn(move || {
                let _ = tx.send(guarded_attempt(worker_strategy.as_ref(), &worker_path));
            });

        if let Err(e) = spawned {
            tracing::warn!(
                "Could not spawn attempt thread ({}), running {} without timeout",
                e,
                strategy.name()
            );
            return guarded_attempt(strategy.as_ref(), path);
        }

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ProcessError::TimedOut {
                strategy: strategy.name().to_string(),
                elapsed: timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(ProcessError::StrategyPanicked {
                strategy: strategy.name().to_string(),
                message: "attempt thread exited without a result".to_string(),
            }),
        }
    }
}

/// Runs one attempt, turning a panic in the underlying library into an error.
fn guarded_attempt(
    strategy: &dyn ExtractionStrategy,
    path: &Path,
) -> Result<Vec<Document>, ProcessError> {
    panic::catch_unwind(AssertUnwindSafe(|| strategy.attempt(path))).unwrap_or_else(|payload| {
        Err(ProcessError::StrategyPanicked {
            strategy: strategy.name().to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
