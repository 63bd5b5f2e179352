use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::port::{Bot, BotRegistry};

/// A bot registry fixed at construction.
#[derive(Default)]
pub struct StaticBotRegistry {
    bots: BTreeMap<String, Arc<dyn Bot>>,
}

impl StaticBotRegistry {
    /// Build from `bots`; a repeated name keeps the last bot.
    #[must_use]
    pub fn new(bots: impl IntoIterator<Item = Arc<dyn Bot>>) -> Self {
        let mut map = BTreeMap::new();
        for bot in bots {
            let name = bot.name().to_string();
            if map.insert(name.clone(), bot).is_some() {
                warn!(bot = %name, "Duplicate bot name, keeping the last definition");
            }
        }
        Self { bots: map }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

impl BotRegistry for StaticBotRegistry {
    fn bot(&self, name: &str) -> Option<Arc<dyn Bot>> {
        self.bots.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.bots.keys().cloned().collect()
    }
}
