use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Fan-out to one game's subscribers.
///
/// Broadcasts are fire-and-forget with no delivery guarantee; a
/// subscriber whose receiving task has gone away is pruned on the
/// next send.
#[derive(Debug, Default)]
pub struct Channel {
    subscribers: Vec<UnboundedSender<String>>,
}

impl Channel {
    /// Adds a subscriber and hands back its end of the pipe.
    pub fn subscribe(&mut self) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }
    /// Sends one message to every live subscriber, dropping the dead.
    pub fn broadcast(&mut self, json: &str) {
        self.subscribers.retain(|tx| tx.send(json.to_string()).is_ok());
    }
    /// Number of subscribers still considered live.
    pub fn subscribers(&self) -> usize {
        self.subscribers.len()
    }
}
