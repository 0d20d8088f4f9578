use std::sync::Arc;

use service::waitlist::WaitlistStore;

/// Shared handler state. Cloned per request; the store itself is shared.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<WaitlistStore>,
}

impl ServerState {
    pub fn new(store: Arc<WaitlistStore>) -> Self {
        Self { store }
    }
}
