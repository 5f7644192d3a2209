use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::search::controller::{Lifecycle, ResultController};
use crate::search::service::SearchService;

/// Longest accepted session id.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// One results controller per browser tab, so a new query from a tab
/// cancels that tab's in-flight search.
///
/// Entries only live while a lifecycle is running: whichever lease holds
/// the newest generation removes the entry when it is dropped.
pub struct SessionRegistry {
    service: SearchService,
    controllers: Mutex<HashMap<String, Arc<ResultController>>>,
}

/// Result of [`SessionRegistry::start`].
pub enum SessionStart {
    Started(SessionLease, Lifecycle),
    /// The session is already running this exact query.
    AlreadyActive(Arc<ResultController>),
}

impl SessionRegistry {
    pub fn new(service: SearchService) -> Self {
        Self {
            service,
            controllers: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_valid_id(session: &str) -> bool {
        !session.is_empty()
            && session.len() <= MAX_SESSION_ID_LEN
            && session
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Activate `query` on the session's controller, creating it if needed.
    /// Activation happens under the registry lock so it is ordered with
    /// lease releases.
    pub fn start(self: &Arc<Self>, session: &str, query: &str) -> SessionStart {
        let mut controllers = self.controllers.lock();
        let controller = controllers
            .entry(session.to_string())
            .or_insert_with(|| Arc::new(ResultController::new(self.service.clone())))
            .clone();

        match controller.activate(Some(query)) {
            Some(lifecycle) => SessionStart::Started(
                SessionLease {
                    registry: self.clone(),
                    session: session.to_string(),
                    generation: lifecycle.generation(),
                    controller,
                },
                lifecycle,
            ),
            None => SessionStart::AlreadyActive(controller),
        }
    }

    fn release(&self, session: &str, controller: &Arc<ResultController>, generation: u64) {
        let mut controllers = self.controllers.lock();
        let owned = controllers
            .get(session)
            .is_some_and(|c| Arc::ptr_eq(c, controller) && c.generation() == generation);
        if owned {
            controllers.remove(session);
        }
    }

    /// Sessions with a running lifecycle.
    pub fn len(&self) -> usize {
        self.controllers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds a session's controller for one lifecycle. Dropping it (request
/// finished, or the client went away) forgets the session unless a newer
/// lifecycle has taken over.
pub struct SessionLease {
    registry: Arc<SessionRegistry>,
    session: String,
    generation: u64,
    controller: Arc<ResultController>,
}

impl SessionLease {
    pub fn controller(&self) -> &ResultController {
        &self.controller
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.registry
            .release(&self.session, &self.controller, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::llm::gemini::GenerateContentResponse;
    use crate::llm::{GenerativeProvider, GroundedRequest};
    use crate::search::Outcome;
    use async_trait::async_trait;
    use parking_lot::RwLock;

    struct Echo;

    #[async_trait]
    impl GenerativeProvider for Echo {
        async fn generate_grounded(
            &self,
            request: GroundedRequest,
        ) -> anyhow::Result<GenerateContentResponse> {
            let body = serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": request.prompt}]}}]
            });
            Ok(serde_json::from_value(body)?)
        }
    }

    fn registry() -> Arc<SessionRegistry> {
        let config = Arc::new(RwLock::new(ProviderConfig {
            api_key: Some("k".to_string()),
            ..ProviderConfig::default()
        }));
        Arc::new(SessionRegistry::new(SearchService::new(Arc::new(Echo), config)))
    }

    fn started(start: SessionStart) -> (SessionLease, Lifecycle) {
        match start {
            SessionStart::Started(lease, lifecycle) => (lease, lifecycle),
            SessionStart::AlreadyActive(_) => panic!("expected a new lifecycle"),
        }
    }

    #[test]
    fn test_session_id_validation() {
        assert!(SessionRegistry::is_valid_id("tab-1_a"));
        assert!(!SessionRegistry::is_valid_id(""));
        assert!(!SessionRegistry::is_valid_id("../etc"));
        assert!(!SessionRegistry::is_valid_id(&"a".repeat(MAX_SESSION_ID_LEN + 1)));
    }

    #[tokio::test]
    async fn test_finished_lease_forgets_session() {
        let registry = registry();
        let (lease, lifecycle) = started(registry.start("tab", "cats"));
        assert_eq!(registry.len(), 1);

        assert_eq!(lease.controller().run(lifecycle).await, Outcome::Success);
        drop(lease);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_new_query_supersedes_same_session() {
        let registry = registry();
        let (cats_lease, cats) = started(registry.start("tab", "cats"));
        let (dogs_lease, dogs) = started(registry.start("tab", "dogs"));

        // both leases share one controller
        assert!(Arc::ptr_eq(&cats_lease.controller, &dogs_lease.controller));
        assert_eq!(cats_lease.controller().run(cats).await, Outcome::Superseded);

        // the superseded lease does not take the session with it
        drop(cats_lease);
        assert_eq!(registry.len(), 1);

        assert_eq!(dogs_lease.controller().run(dogs).await, Outcome::Success);
        drop(dogs_lease);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_query_in_flight_is_already_active() {
        let registry = registry();
        let (_lease, _) = started(registry.start("tab", "cats"));
        assert!(matches!(
            registry.start("tab", " cats "),
            SessionStart::AlreadyActive(_)
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = registry();
        let (a, _) = started(registry.start("tab-a", "cats"));
        let (b, _) = started(registry.start("tab-b", "cats"));
        assert!(!Arc::ptr_eq(&a.controller, &b.controller));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_abandoned_lease_forgets_session() {
        let registry = registry();
        let (lease, _lifecycle) = started(registry.start("tab", "cats"));
        // never run: the request was dropped before resolving
        drop(lease);
        assert!(registry.is_empty());
    }
}
