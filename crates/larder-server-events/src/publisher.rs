// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tracing::{instrument, warn};

use crate::error::PublishError;
use crate::event::DataChangeMessage;
use crate::sink::MessageSink;

/// Hands data-change messages to downstream subscribers.
///
/// `publish` returns quickly. Failures are reported to the caller, who logs
/// them; they never undo the write that produced the message.
pub trait Publisher: Send + Sync {
	fn publish(&self, topic: &str, message: &DataChangeMessage) -> Result<(), PublishError>;
}

/// Discards every message.
#[derive(Debug, Default)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
	fn publish(&self, _topic: &str, _message: &DataChangeMessage) -> Result<(), PublishError> {
		Ok(())
	}
}

struct QueuedMessage {
	topic: String,
	body: Vec<u8>,
}

/// Bounded in-memory queue drained by a pool of workers.
///
/// Messages are serialized when published, so a message that cannot be
/// encoded fails at the call site. When the queue is full the message is
/// rejected with [`PublishError::QueueFull`] rather than waiting.
pub struct QueuedPublisher {
	tx: mpsc::Sender<QueuedMessage>,
}

impl QueuedPublisher {
	/// Starts `workers` delivery tasks. Must be called from within a Tokio runtime.
	pub fn new(queue_capacity: usize, workers: usize, sinks: Vec<Arc<dyn MessageSink>>) -> Self {
		let (tx, rx) = mpsc::channel(queue_capacity.max(1));
		let rx = Arc::new(Mutex::new(rx));
		let sinks: Arc<[Arc<dyn MessageSink>]> = sinks.into();

		for worker in 0..workers.max(1) {
			tokio::spawn(Self::worker(worker, Arc::clone(&rx), Arc::clone(&sinks)));
		}

		Self { tx }
	}

	async fn worker(
		worker: usize,
		rx: Arc<Mutex<mpsc::Receiver<QueuedMessage>>>,
		sinks: Arc<[Arc<dyn MessageSink>]>,
	) {
		loop {
			let next = rx.lock().await.recv().await;
			let Some(message) = next else {
				tracing::debug!(worker, "publisher queue closed, worker exiting");
				return;
			};

			for sink in sinks.iter() {
				if let Err(e) = sink.deliver(&message.topic, &message.body).await {
					warn!(
						worker,
						sink = sink.name(),
						topic = %message.topic,
						error = %e,
						"event sink delivery failed"
					);
				}
			}
		}
	}
}

impl Publisher for QueuedPublisher {
	#[instrument(skip(self, message), fields(event_type = %message.event_type))]
	fn publish(&self, topic: &str, message: &DataChangeMessage) -> Result<(), PublishError> {
		let body = serde_json::to_vec(message)?;
		let queued = QueuedMessage {
			topic: topic.to_string(),
			body,
		};

		self.tx.try_send(queued).map_err(|e| match e {
			TrySendError::Full(_) => PublishError::QueueFull,
			TrySendError::Closed(_) => PublishError::Closed,
		})
	}
}
