//! # Vinylkit Core
//!
//! Core types for the Vinylkit cutter pipeline: machine data models
//! (positions, session states), the error taxonomy shared by every stage,
//! and the session event dispatcher.

pub mod data;
pub mod error;
pub mod event;

pub use data::{Position, SessionState, SessionStatus, Units};
pub use error::{Error, ExtractError, LinkError, Result, SessionError};
pub use event::{EventDispatcher, SessionEvent, SubscriptionId};
