//! Reference data cache (stages and statuses).

use tracing::{instrument, warn};

use crate::controller::AppController;
use crate::state::Slot;

impl AppController {
    /// Fetch the reference set. On failure the previous value stays.
    #[instrument(skip(self))]
    pub async fn load_reference_set(&self) {
        let Some(client) = self.client() else {
            return;
        };
        let ticket = self.issue(Slot::Reference);
        match client.reference_set().await {
            Ok(reference) => {
                let _ = self.apply(ticket, |state| state.reference = reference);
            }
            Err(error) => warn!(%error, "reference set load failed, keeping previous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{Reply, ScriptedTransport, controller};
    use dailies_logging::capture_logs;
    use serde_json::json;
    use tracing::Level;

    #[tokio::test]
    async fn failure_keeps_previous_value() {
        let transport = ScriptedTransport::new().on(
            "GET",
            "/sets",
            Reply::json(json!({"stages": ["layout", "comp"], "statuses": ["完成"]})),
        );
        let ctrl = controller(&transport);
        ctrl.load_reference_set().await;
        assert_eq!(ctrl.snapshot().reference.stages, vec!["layout", "comp"]);

        transport.replace("GET", "/sets", Reply::status(500, "boom"));
        let (logs, _guard) = capture_logs();
        ctrl.load_reference_set().await;

        assert_eq!(ctrl.snapshot().reference.stages, vec!["layout", "comp"]);
        assert!(logs.has_event(Level::WARN, "reference set load failed"));
    }

    #[tokio::test]
    async fn first_failure_leaves_empty_set() {
        let transport = ScriptedTransport::new().on("GET", "/sets", Reply::Fail("offline".into()));
        let ctrl = controller(&transport);
        ctrl.load_reference_set().await;
        assert!(ctrl.snapshot().reference.is_empty());
    }
}
