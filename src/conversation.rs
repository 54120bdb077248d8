//! Chat transcript and the controller that grows it
//!
//! The controller appends the user's turn, starts the stopwatch, and then
//! accumulates streamed text into a single assistant message until the
//! stream ends, fails, or is cancelled.

mod controller;
mod message;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    ConversationController, ConversationError, Submission, StreamProgress, CANCELLED_TEXT,
    PLACEHOLDER_TEXT, REQUEST_ERROR_TEXT, STREAM_ERROR_TEXT,
};
pub use message::{Message, Role, Transcript};
