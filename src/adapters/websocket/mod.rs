//! WebSocket transport adapter.
//!
//! ```text
//! client ──ws──► handler ──ClientEvent──► LifecycleController / MessageRouter
//!                   ▲                                  │
//!                   │                            ServerEvent
//!                   └────── ConnectionManager ◄────────┘
//! ```
//!
//! Each connection gets a server-generated [`ConnectionId`] and an outbound
//! channel registered with the [`ConnectionManager`], which implements the
//! [`ClientSink`] port for the engine.
//!
//! [`ConnectionId`]: crate::domain::ConnectionId
//! [`ClientSink`]: crate::ports::ClientSink

mod connections;
mod handler;

pub use connections::ConnectionManager;
pub use handler::{app_router, ws_handler, AppState};
