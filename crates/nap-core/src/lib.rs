//! Core domain logic for the sleep log.
//!
//! This crate contains the fundamental types and logic for:
//! - Sessions: the recorded sleep interval and its derived duration
//! - Storage contract: the [`SessionStore`] seam and its live [`SessionFeed`]
//! - Service: [`SessionService`], the single entry point the front end calls
//! - Timer: the [`TimerController`] state machine producing session boundaries
//! - Manual entry: next-day rollover for hand-entered times

pub mod format;
pub mod manual;
pub mod service;
pub mod session;
pub mod store;
pub mod timer;
mod types;

#[cfg(test)]
mod testing;

pub use format::{format_elapsed, format_minutes};
pub use manual::{manual_bounds, roll_over_end};
pub use service::{RangePolicy, ServiceError, SessionService};
pub use session::SleepSession;
pub use store::{FeedPublisher, SessionFeed, SessionStore, StoreError};
pub use timer::{Clock, SystemClock, TimerController, TimerState};
pub use types::SessionId;
