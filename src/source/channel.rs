//! Channel-based upload source.
//!
//! Receives upload batches via a tokio mpsc channel. Any number of
//! producers (an upload handler, a watcher task) can clone the sender and
//! push batches; the dashboard drains them on its refresh tick.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::DataSource;
use crate::ingest::Upload;

/// Capacity of the upload channel, in batches.
const CHANNEL_CAPACITY: usize = 16;

/// A source that receives upload batches via a channel.
///
/// # Example
///
/// ```
/// use slawatch::{ChannelSource, DataSource, Upload};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("upload");
/// tx.send(vec![Upload::new("a.csv", b"".to_vec())]).await.unwrap();
/// assert_eq!(source.poll().len(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Vec<Upload>>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an mpsc channel of upload batches
    /// * `source_description` - A description of where uploads come from
    pub fn new(receiver: mpsc::Receiver<Vec<Upload>>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            closed: false,
        }
    }

    /// Create a channel pair for sending uploads to a ChannelSource.
    pub fn create(source_description: &str) -> (mpsc::Sender<Vec<Upload>>, Self) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Vec<Upload> {
        let mut uploads = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => uploads.extend(batch),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        uploads
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("Upload channel closed")
    }
}
