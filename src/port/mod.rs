//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!   TLS client ──▶│  RemoteServer (inbound)  │
//!                 │   auth ─ parse ─ dispatch│
//!                 └────────────┬─────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!        ┌───────────┐                   ┌───────────┐
//!        │BotRegistry│                   │ Settings  │
//!        │  adapter  │                   │  adapter  │
//!        └───────────┘                   └───────────┘
//! ```

pub mod outbound;

pub use outbound::bot::{Bot, BotRegistry};
pub use outbound::settings::{Settings, LOGIN_SETTING, PASSWORD_SETTING};
