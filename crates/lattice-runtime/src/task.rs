use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use lattice_chunk::Chunk;
use lattice_world::{
    GenParams, GenerationControl, GenerationError, GenerationProgress, GenerationReport,
    NoiseField, TerrainGenerator, World,
};

pub type GenerationOutcome = Result<GenerationReport, GenerationError>;

/// One terrain generation run on its own named thread.
///
/// The outcome arrives on a single-slot channel and is cached once received.
/// Dropping the task cancels the run and joins the thread.
pub struct GenerationTask {
    control: Arc<GenerationControl>,
    done_rx: Receiver<GenerationOutcome>,
    outcome: Option<GenerationOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationTask {
    pub fn spawn<C, N>(world: Arc<World<C>>, noise: Arc<N>, params: GenParams) -> io::Result<Self>
    where
        C: Chunk + 'static,
        N: NoiseField + ?Sized + 'static,
    {
        let control = Arc::new(GenerationControl::new());
        let (done_tx, done_rx) = bounded::<GenerationOutcome>(1);
        let thread_control = Arc::clone(&control);

        let handle = thread::Builder::new()
            .name("lattice-gen".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    TerrainGenerator::new(noise.as_ref(), params)
                        .run(world.as_ref(), thread_control.as_ref())
                }))
                .unwrap_or(Err(GenerationError::Panicked));
                match &outcome {
                    Ok(report) => log::debug!(
                        target: "gen",
                        "generation finished: {} chunks",
                        report.chunks_created
                    ),
                    Err(GenerationError::Cancelled) => {
                        log::warn!(target: "gen", "generation cancelled at {:?}", thread_control.progress())
                    }
                    Err(e) => log::warn!(target: "gen", "generation failed: {}", e),
                }
                let _ = done_tx.send(outcome);
            })?;

        Ok(Self {
            control,
            done_rx,
            outcome: None,
            handle: Some(handle),
        })
    }

    pub fn cancel(&self) {
        self.control.cancel();
    }

    #[inline]
    pub fn progress(&self) -> GenerationProgress {
        self.control.progress()
    }

    pub fn control_handle(&self) -> Arc<GenerationControl> {
        Arc::clone(&self.control)
    }

    pub fn is_finished(&mut self) -> bool {
        self.poll();
        self.outcome.is_some()
    }

    /// Non-blocking check for the outcome.
    pub fn try_outcome(&mut self) -> Option<&GenerationOutcome> {
        self.poll();
        self.outcome.as_ref()
    }

    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<&GenerationOutcome> {
        if self.outcome.is_none() {
            match self.done_rx.recv_timeout(timeout) {
                Ok(o) => self.outcome = Some(o),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.outcome = Some(Err(GenerationError::Panicked)),
            }
        }
        self.outcome.as_ref()
    }

    /// Blocks until the run ends, then joins the thread.
    pub fn wait(mut self) -> GenerationOutcome {
        self.poll();
        let outcome = match self.outcome.take() {
            Some(o) => o,
            None => self.done_rx.recv().unwrap_or(Err(GenerationError::Panicked)),
        };
        self.join();
        outcome
    }

    fn poll(&mut self) {
        if self.outcome.is_none() {
            match self.done_rx.try_recv() {
                Ok(o) => self.outcome = Some(o),
                Err(TryRecvError::Empty) => {}
                // Sender gone without a result: the thread died outside the generator.
                Err(TryRecvError::Disconnected) => self.outcome = Some(Err(GenerationError::Panicked)),
            }
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "gen", "generation thread panicked outside the generator");
            }
        }
    }
}

impl Drop for GenerationTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.control.cancel();
            self.join();
        }
    }
}
