//! A sink that sends nothing.

use std::cell::RefCell;

use crate::{DeliveryError, DeliveryReceipt, MessageSink, fit_to_channel};

/// Logs each message at info level and keeps a copy.
#[derive(Debug)]
pub struct DryRunSink {
    cap: usize,
    sent: RefCell<Vec<String>>,
}

impl DryRunSink {
    pub const fn new(cap: usize) -> Self {
        Self {
            cap,
            sent: RefCell::new(Vec::new()),
        }
    }

    /// Bodies accepted so far, after truncation.
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl MessageSink for DryRunSink {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn cap(&self) -> usize {
        self.cap
    }

    async fn send(&self, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let (body, truncated) = fit_to_channel(body, self.cap);
        let chars = body.chars().count();
        tracing::info!(chars, truncated, "dry run: message not sent");
        self.sent.borrow_mut().push(body);
        Ok(DeliveryReceipt {
            channel: self.name(),
            message_id: None,
            chars,
            truncated,
        })
    }
}
