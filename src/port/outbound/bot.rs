//! Trading bot lookup port.
//!
//! Commands only ever see bots through these traits. Lookups are synchronous;
//! a slow implementation stalls the serving loop for its duration.

use std::sync::Arc;

use crate::error::Result;

/// A running (or stopped) trading bot as seen by the operator.
pub trait Bot: Send + Sync {
    /// Registry name of the bot.
    fn name(&self) -> &str;

    /// True when the bot is not trading.
    fn is_stopped(&self) -> bool;

    /// Full text of the bot's activity log.
    fn log(&self) -> Result<String>;
}

/// Name to bot lookup.
pub trait BotRegistry: Send + Sync {
    /// Find a bot by its exact name.
    fn bot(&self, name: &str) -> Option<Arc<dyn Bot>>;

    /// All bot names, sorted.
    fn names(&self) -> Vec<String>;
}
