//! The engine packaged as a user script.

use dom::{Dom, MutationRecord, ObserverId};
use page::{ScriptMetadata, UserScript};

use crate::config::{Config, ListLocator};
use crate::coordinator::Coordinator;
use crate::error::ConfigError;

pub struct DeclutterScript {
    metadata: ScriptMetadata,
    coordinator: Coordinator,
}

impl DeclutterScript {
    /// Validate `config` and build the script around it.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let (name, description) = match &config.locator {
            ListLocator::Section { label } => (
                "Hide Hardcoded Google Calendars".to_string(),
                format!("Removes hidden calendars from \"{label}\" and closes the gaps"),
            ),
            ListLocator::ExpandedGroups => (
                "Google Calendar - Remove Birthdays".to_string(),
                "Removes hidden calendars from every expanded group".to_string(),
            ),
        };
        let metadata = ScriptMetadata {
            name,
            version: env!("CARGO_PKG_VERSION").to_string(),
            description,
            matches: config.match_patterns()?,
        };
        Ok(Self {
            metadata,
            coordinator: Coordinator::new(config),
        })
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

impl UserScript for DeclutterScript {
    fn metadata(&self) -> &ScriptMetadata {
        &self.metadata
    }

    fn on_load(&mut self, dom: &mut Dom) {
        self.coordinator.start(dom);
    }

    fn on_mutations(&mut self, dom: &mut Dom, observer: ObserverId, records: Vec<MutationRecord>) {
        self.coordinator.handle_batch(dom, observer, &records);
    }

    fn after_notify(&mut self, _dom: &mut Dom) {
        self.coordinator.end_of_tick();
    }
}
