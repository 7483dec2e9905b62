use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

use crate::LedgerError;

/// A sequence of writes with a compensating action for every
/// completed write. When a later step fails, the completed steps
/// are undone in reverse order before the error is returned.
pub struct Saga<'a> {
    name: &'static str,
    compensations: Vec<(&'static str, BoxFuture<'a, anyhow::Result<()>>)>,
}

impl<'a> Saga<'a> {
    pub fn new(name: &'static str) -> Self {
        Saga {
            name,
            compensations: Vec::new(),
        }
    }

    /// Register how to undo the step that just completed.
    /// The action only runs if the saga is aborted.
    pub fn compensate<F>(&mut self, step: &'static str, action: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'a,
    {
        self.compensations.push((step, action.boxed()));
    }

    /// Run a step. If it fails, everything done so far is undone.
    pub async fn step<T, E>(
        &mut self,
        step: impl Future<Output = Result<T, E>>,
    ) -> Result<T, LedgerError>
    where
        E: Into<LedgerError>,
    {
        match step.await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.abort(err.into()).await),
        }
    }

    /// Undo all completed steps and hand back the error.
    pub async fn abort(&mut self, err: LedgerError) -> LedgerError {
        tracing::warn!(saga = self.name, error = %err, "rolling back");
        while let Some((step, action)) = self.compensations.pop() {
            match action.await {
                Ok(()) => tracing::info!(saga = self.name, step, "compensated"),
                // Nothing left to do but to tell someone.
                Err(e) => tracing::error!(
                    saga = self.name,
                    step,
                    error = %e,
                    "compensation failed, ledger needs manual review"
                ),
            }
        }
        err
    }

    /// All steps succeeded, forget the compensations.
    pub fn commit(mut self) {
        tracing::debug!(saga = self.name, steps = self.compensations.len(), "committed");
        self.compensations.clear();
    }
}

impl Drop for Saga<'_> {
    fn drop(&mut self) {
        if !self.compensations.is_empty() {
            tracing::error!(
                saga = self.name,
                pending = self.compensations.len(),
                "saga dropped without commit or abort"
            );
        }
    }
}
