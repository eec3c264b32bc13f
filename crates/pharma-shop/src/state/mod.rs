//! # State Module
//!
//! Session-layer state types.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        Storefront                                │  │
//! │  │                                                                  │  │
//! │  │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐   │  │
//! │  │  │   Database   │  │   SessionState   │  │    Notifier      │   │  │
//! │  │  │              │  │                  │  │                  │   │  │
//! │  │  │  repository  │  │  Arc<Mutex<      │  │  toast queue     │   │  │
//! │  │  │  boundary    │  │    Session>>     │  │  (3 s expiry)    │   │  │
//! │  │  └──────────────┘  └──────────────────┘  └──────────────────┘   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: backends are internally thread-safe                       │
//! │  • SessionState: exclusive access via async Mutex                      │
//! │  • Notifier: its own small lock, independent of the session            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;
mod storefront;

pub use session::{Session, SessionState};
pub use storefront::Storefront;
