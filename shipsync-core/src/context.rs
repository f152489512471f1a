use uuid::Uuid;

/// Context for a single synchronization run.
///
/// The acting user is carried here explicitly rather than mutated into
/// process-wide state, so concurrent callers can never observe another
/// run's identity.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub run_id: Uuid,
    pub acting_user: Option<String>,
}

impl SyncContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            acting_user: None,
        }
    }

    pub fn acting_as(user: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            acting_user: Some(user.into()),
        }
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}
