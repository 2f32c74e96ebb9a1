use std::sync::{Arc, Mutex};
use tracing::info;

/// Receives the user's repository choice.
pub trait SelectionSink {
    fn select(&self, full_name: &str);
    fn clear(&self);
}

/// Cloneable selection store; every clone observes the same value, so sibling
/// components can share it without a global.
#[derive(Clone, Debug, Default)]
pub struct SharedSelection {
    selected: Arc<Mutex<Option<String>>>,
}

impl SharedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.selected
            .lock()
            .map(|selected| selected.clone())
            .unwrap_or_default()
    }

    fn set(&self, value: Option<String>) {
        if let Ok(mut selected) = self.selected.lock() {
            *selected = value;
        }
    }
}

impl SelectionSink for SharedSelection {
    fn select(&self, full_name: &str) {
        info!(repository = full_name, "repository selected");
        self.set(Some(full_name.to_string()));
    }

    fn clear(&self) {
        info!("repository selection cleared");
        self.set(None);
    }
}
