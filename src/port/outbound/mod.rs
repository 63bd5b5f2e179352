//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the remote-control server
//! depends on: the bot registry and the persistent settings store.

pub mod bot;
pub mod settings;
