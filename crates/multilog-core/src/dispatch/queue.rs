//! FIFO queue for deferred dispatches
//!
//! Jobs are executed by a single worker thread in the order they were pushed.
//! Producers on several threads each keep their own order; interleaving
//! between producers is whatever order the pushes happened in.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};

use crate::error::{LogError, LogResult};

/// A unit of deferred work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Flush(oneshot::Sender<()>),
}

/// Single-consumer queue drained by a dedicated worker thread
pub struct DeferredQueue {
    sender: Option<mpsc::UnboundedSender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl DeferredQueue {
    /// Start the worker thread
    pub fn spawn() -> LogResult<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();

        let worker = thread::Builder::new()
            .name("multilog-dispatch".to_string())
            .spawn(move || {
                while let Some(message) = receiver.blocking_recv() {
                    match message {
                        // Jobs guard themselves; this only keeps the worker alive
                        Message::Run(job) => {
                            let _ = catch_unwind(AssertUnwindSafe(job));
                        }
                        Message::Flush(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            })
            .map_err(|e| LogError::Spawn(e.to_string()))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue a job
    ///
    /// If the worker is gone the job is handed back so the caller can run it.
    pub fn push(&self, job: Job) -> Result<(), Job> {
        let Some(sender) = &self.sender else {
            return Err(job);
        };
        match sender.send(Message::Run(job)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendError(Message::Run(job))) => Err(job),
            Err(_) => Ok(()),
        }
    }

    /// Wait until every job pushed before this call has run
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.send(Message::Flush(ack)) {
            let _ = done.await;
        }
    }

    /// Blocking variant of [`flush`](Self::flush)
    ///
    /// Must not be called from within an async runtime.
    pub fn flush_blocking(&self) {
        let (ack, done) = oneshot::channel();
        if self.send(Message::Flush(ack)) {
            let _ = done.blocking_recv();
        }
    }

    fn send(&self, message: Message) -> bool {
        self.sender
            .as_ref()
            .map(|sender| sender.send(message).is_ok())
            .unwrap_or(false)
    }
}

impl Drop for DeferredQueue {
    // Closing the channel lets the worker drain what is left, then exit
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("running", &self.sender.is_some())
            .finish()
    }
}
