//! Application state.
//!
//! Everything the pipeline needs is injected here at startup: the
//! immutable configuration, the staging store, and the uploader
//! capability behind its trait so the remote store can be substituted
//! without changing pipeline logic.

use std::sync::Arc;
use vario_core::Config;
use vario_storage::{StagingStore, Uploader};

/// Main application state shared by all request handlers.
pub struct AppState {
    pub config: Config,
    pub staging: StagingStore,
    pub uploader: Arc<dyn Uploader>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
