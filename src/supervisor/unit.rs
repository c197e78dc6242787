//! Ownership handle for one isolated rendering unit.

use std::future::Future;

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::model::RunConfig;
use crate::pipeline;

/// A rendering unit is a spawned task running the full pipeline against the
/// original invocation arguments. The supervisor is its sole owner: it can
/// observe liveness, await completion, or tear it down. No mutable state is
/// shared across the boundary.
pub(crate) struct RenderUnit {
    handle: JoinHandle<Result<()>>,
}

impl RenderUnit {
    pub(crate) fn spawn(cfg: RunConfig) -> Self {
        Self::from_future(pipeline::execute(cfg))
    }

    fn from_future<F>(fut: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(fut),
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Await the unit's own completion. Only called from the supervisor's
    /// select loop; the handle is not consumed so a restart can still replace
    /// the unit afterwards.
    pub(crate) async fn done(&mut self) -> Result<()> {
        match (&mut self.handle).await {
            Ok(res) => res,
            Err(join) if join.is_cancelled() => Ok(()),
            Err(join) => Err(anyhow::anyhow!("rendering unit panicked: {join}")),
        }
    }

    /// Destructive teardown: the unit gets no graceful-shutdown opportunity,
    /// its partially-built state is discarded.
    pub(crate) async fn terminate(&mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn terminate_reclaims_a_parked_unit() {
        let mut unit = RenderUnit::from_future(async {
            futures::future::pending::<()>().await;
            Ok(())
        });
        assert!(!unit.is_finished());
        unit.terminate().await;
        assert!(unit.is_finished());
    }

    #[tokio::test]
    async fn self_exit_is_observable() {
        let mut unit = RenderUnit::from_future(async { anyhow::bail!("render failed") });
        let err = unit.done().await.unwrap_err();
        assert!(err.to_string().contains("render failed"));
        assert!(unit.is_finished());
    }

    #[tokio::test]
    async fn restart_is_spawn_after_terminate() {
        let mut unit = RenderUnit::from_future(async {
            futures::future::pending::<()>().await;
            Ok(())
        });
        unit.terminate().await;
        unit = RenderUnit::from_future(async { Ok(()) });
        assert!(unit.done().await.is_ok());
    }
}
