use crate::core::message::InboundMessage;
use crate::traits::error::Result;

/// Message handler invoked for every inbound frame
///
/// Handlers run in registration order, one frame at a time. A handler
/// failure is logged and does not stop delivery to the remaining handlers,
/// nor does it affect the connection.
pub trait MessageHandler: Send + Sync {
    /// Handle one decoded inbound message
    ///
    /// # Errors
    /// Returning an error logs it and moves on to the next handler.
    fn handle(&self, message: &InboundMessage) -> Result<()>;
}

impl<F> MessageHandler for F
where
    F: Fn(&InboundMessage) -> Result<()> + Send + Sync,
{
    fn handle(&self, message: &InboundMessage) -> Result<()> {
        self(message)
    }
}
