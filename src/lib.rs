pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod providers;

use crate::config::Config;
use crate::generation::{Generator, StandardsIndex, TemplateRegistry};

use std::sync::Arc;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub templates: Arc<TemplateRegistry>,
    pub standards: Arc<StandardsIndex>,
    pub generator: Arc<Generator>,
}
