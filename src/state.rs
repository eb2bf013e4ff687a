use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::database::Gateway;

/// Shared per-router state. Holds no request data; the gateway itself opens a
/// fresh store connection for each call.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, security: SecurityConfig) -> Self {
        Self {
            gateway,
            security: Arc::new(security),
        }
    }
}
