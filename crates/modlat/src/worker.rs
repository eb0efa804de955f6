//! Background generation on a dedicated thread.
//!
//! A [`LatticeWorker`] owns one thread that serves [`WorkerRequest`]s one at
//! a time. Each request produces any number of
//! [`WorkerResponse::Progress`] messages followed by exactly one terminal
//! message: [`WorkerResponse::Complete`] or [`WorkerResponse::Failed`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{error, info};

use crate::driver::{generate_structure, GenerationOptions};
use crate::error::{LatticeError, Result};
use crate::structure::LatticeStructure;

/// Request sent to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerRequest {
    /// Generate a catalog lattice.
    Start {
        /// Catalog name.
        lattice_name: String,
    },
}

/// Message sent back by the worker thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "id", rename_all = "camelCase")]
pub enum WorkerResponse {
    /// Intermediate progress text.
    Progress {
        /// E.g. `"120 elements"`.
        text: String,
    },
    /// Generation finished.
    Complete {
        /// The generated lattice.
        structure: Box<LatticeStructure>,
    },
    /// Generation failed.
    Failed {
        /// Rendered error.
        message: String,
    },
}

impl WorkerResponse {
    /// Returns true for `Complete` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerResponse::Progress { .. })
    }
}

/// Handle to a generation thread.
#[derive(Debug)]
pub struct LatticeWorker {
    requests: Option<Sender<WorkerRequest>>,
    responses: Receiver<WorkerResponse>,
    busy: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LatticeWorker {
    /// Spawns the worker thread.
    #[must_use]
    pub fn spawn(options: GenerationOptions) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();
        let busy = Arc::new(AtomicBool::new(false));
        let thread_busy = Arc::clone(&busy);
        let handle = thread::spawn(move || {
            serve(&request_rx, &response_tx, &thread_busy, &options);
        });
        Self {
            requests: Some(request_tx),
            responses: response_rx,
            busy,
            handle: Some(handle),
        }
    }

    /// Returns true while a generation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts generating `lattice_name`.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::WorkerBusy`] if a generation is still in flight.
    /// - [`LatticeError::WorkerDisconnected`] if the thread has stopped.
    pub fn start(&self, lattice_name: &str) -> Result<()> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LatticeError::WorkerBusy);
        }
        let request = WorkerRequest::Start {
            lattice_name: lattice_name.to_string(),
        };
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !sent {
            self.busy.store(false, Ordering::Release);
            return Err(LatticeError::WorkerDisconnected);
        }
        Ok(())
    }

    /// Blocks for the next response.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::WorkerDisconnected`] if the thread has stopped.
    pub fn recv(&self) -> Result<WorkerResponse> {
        self.responses
            .recv()
            .map_err(|_| LatticeError::WorkerDisconnected)
    }

    /// Returns the next response if one is queued.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::WorkerDisconnected`] if the thread has stopped
    /// and nothing is queued.
    pub fn try_recv(&self) -> Result<Option<WorkerResponse>> {
        match self.responses.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(LatticeError::WorkerDisconnected),
        }
    }

    /// Blocks until the current generation ends, passing progress text to
    /// `on_progress`. A failure arrives as `Ok(Err(message))`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::WorkerDisconnected`] if the thread has stopped.
    pub fn wait(
        &self,
        mut on_progress: impl FnMut(&str),
    ) -> Result<core::result::Result<LatticeStructure, String>> {
        loop {
            match self.recv()? {
                WorkerResponse::Progress { text } => on_progress(&text),
                WorkerResponse::Complete { structure } => return Ok(Ok(*structure)),
                WorkerResponse::Failed { message } => return Ok(Err(message)),
            }
        }
    }
}

impl Drop for LatticeWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the serve loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("lattice worker thread panicked");
            }
        }
    }
}

fn serve(
    requests: &Receiver<WorkerRequest>,
    responses: &Sender<WorkerResponse>,
    busy: &AtomicBool,
    options: &GenerationOptions,
) {
    while let Ok(request) = requests.recv() {
        let WorkerRequest::Start { lattice_name } = request;
        info!(lattice = %lattice_name, "worker request received");
        let result = generate_structure(&lattice_name, options, |text| {
            // The receiver may already be gone; progress is best effort.
            let _ = responses.send(WorkerResponse::Progress {
                text: text.to_string(),
            });
        });
        let response = match result {
            Ok(structure) => WorkerResponse::Complete {
                structure: Box::new(structure),
            },
            Err(e) => {
                error!(lattice = %lattice_name, error = %e, "generation failed");
                WorkerResponse::Failed {
                    message: e.to_string(),
                }
            }
        };
        busy.store(false, Ordering::Release);
        if responses.send(response).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_and_rejects_concurrent_start() {
        let worker = LatticeWorker::spawn(GenerationOptions::default());
        worker.start("2-2").expect("idle worker");
        assert_eq!(worker.start("1-1-1"), Err(LatticeError::WorkerBusy));
        let mut progress = 0;
        let structure = worker
            .wait(|_| progress += 1)
            .expect("thread alive")
            .expect("2-2 generates");
        assert_eq!(structure.elements, 18);
        assert!(progress >= 1);
        assert!(!worker.is_busy());
        assert_eq!(worker.try_recv(), Ok(None));
    }

    #[test]
    fn failure_is_terminal() {
        let worker = LatticeWorker::spawn(GenerationOptions::default());
        worker.start("nope").expect("idle worker");
        let response = worker.recv().expect("thread alive");
        assert!(response.is_terminal());
        assert_eq!(
            response,
            WorkerResponse::Failed {
                message: r#"no definition found for lattice name "nope""#.to_string()
            }
        );
        worker.start("2-1").expect("idle again");
        assert!(worker.wait(|_| {}).expect("thread alive").is_ok());
    }
}
