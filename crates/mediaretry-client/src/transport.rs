//! Outbound side of the connection.

use mediaretry_protocol::codec::encode_node;
use mediaretry_protocol::Node;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::TransportError;

/// Writes one node to the connection.
pub trait NodeSender: Send + Sync {
    fn send_node(&self, node: Node) -> Result<(), TransportError>;
}

/// Frames nodes and queues them for a writer task.
///
/// Never blocks: a full queue is reported as [`TransportError::QueueFull`].
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelSender {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx }
    }

    /// Create a sender together with the receiving end for the writer task.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl NodeSender for ChannelSender {
    fn send_node(&self, node: Node) -> Result<(), TransportError> {
        let data = encode_node(&node)?;
        self.tx.try_send(data).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull,
            TrySendError::Closed(_) => TransportError::Closed,
        })
    }
}
