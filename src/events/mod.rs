//! Diagnostic event system
//!
//! Structured events describing everything notable the control core does:
//! - RecorderEvent / EventSeverity data types
//! - EventDispatcher broadcasting to registered observers

pub mod dispatcher;
pub mod event;

pub use dispatcher::{EventDispatcher, ObserverHandle};
pub use event::{EventSeverity, RecorderEvent};
