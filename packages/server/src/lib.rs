//! Kokuban whiteboard session service library.
//!
//! This library implements the presence-and-broadcast session manager for a
//! collaborative whiteboard: JWT-gated WebSocket connections, per-class
//! membership, stroke replication, and snapshot reads against a shared
//! ephemeral key/value store.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
