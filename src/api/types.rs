//! Shared state for the API layer.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::consult::ConsultService;
use crate::doctors::{DoctorDirectory, StaticDirectory};
use crate::gateway::SimulatedGateway;
use crate::session::{SessionHandle, SessionRegistry};

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub sessions: Arc<SessionRegistry>,
    pub consult: Arc<ConsultService>,
    pub doctors: Arc<dyn DoctorDirectory>,
}

impl ApiContext {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        consult: Arc<ConsultService>,
        doctors: Arc<dyn DoctorDirectory>,
    ) -> Self {
        Self {
            sessions,
            consult,
            doctors,
        }
    }

    /// Context wired to the simulated backends with demo latency.
    pub fn simulated() -> Self {
        Self::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(ConsultService::new(Arc::new(SimulatedGateway::new()))),
            Arc::new(StaticDirectory::new()),
        )
    }

    /// Deterministic zero-latency context, for tests.
    pub fn deterministic(seed: u64) -> Self {
        Self::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(
                ConsultService::new(Arc::new(SimulatedGateway::deterministic(seed)))
                    .with_timeout(Duration::from_secs(5)),
            ),
            Arc::new(StaticDirectory::instant()),
        )
    }

    /// Parse a session id and resolve it to a live handle.
    pub fn resolve_session(&self, id: &str) -> Result<Arc<SessionHandle>, ApiError> {
        let id = Uuid::parse_str(id)
            .map_err(|_| ApiError::BadRequest(format!("Invalid session id: {id}")))?;
        self.sessions
            .get(&id)?
            .ok_or_else(|| ApiError::NotFound("Session not found".into()))
    }
}
