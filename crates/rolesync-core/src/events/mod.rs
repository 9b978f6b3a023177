//! Inbound events

mod change_event;

pub use change_event::ChangeEvent;
