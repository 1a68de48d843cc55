//! # recall-delivery
//!
//! Sends rendered session messages to the learner.
//!
//! Every [`MessageSink`] fits the body to its channel cap before sending, so
//! callers can hand over text of any length. [`TwilioSink`] posts to the
//! Twilio Messages API; [`DryRunSink`] only logs and remembers what it was
//! given.

mod dry_run;
mod error;
mod twilio;

pub use dry_run::DryRunSink;
pub use error::DeliveryError;
pub use twilio::TwilioSink;

use recall_core::render::text::cap_with_ellipsis;
use serde::Serialize;

/// What a sink reports after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// Sink name, e.g. `twilio`.
    pub channel: &'static str,
    /// Provider-assigned message id, when there is one.
    pub message_id: Option<String>,
    /// Characters actually sent.
    pub chars: usize,
    /// Whether the body had to be cut to fit the channel.
    pub truncated: bool,
}

#[allow(async_fn_in_trait)]
pub trait MessageSink {
    fn name(&self) -> &'static str;

    /// Longest body the channel accepts, in characters.
    fn cap(&self) -> usize;

    /// Deliver `body`, truncating it to [`MessageSink::cap`] first.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the provider cannot be reached or
    /// rejects the message.
    async fn send(&self, body: &str) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Cut `body` to `cap` characters with a trailing ellipsis when too long.
/// Returns the text to send and whether it was shortened.
pub fn fit_to_channel(body: &str, cap: usize) -> (String, bool) {
    if body.chars().count() <= cap {
        (body.to_string(), false)
    } else {
        (cap_with_ellipsis(body, cap), true)
    }
}
