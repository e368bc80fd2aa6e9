//! Background PNG writer for rendered frames.
//!
//! Encoding a full-size PNG takes longer than rendering a frame, so frames are
//! handed to a small pool of worker threads over a bounded channel. A full
//! queue is reported to the caller instead of blocking the render loop.

use crossbeam_channel::{bounded, Sender, TrySendError};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::{PlanetariumError, Result};

struct FrameWriteTask {
    image: RgbaImage,
    filepath: PathBuf,
}

/// Pool of PNG writer threads. Dropping the handle closes the queue and
/// waits for queued frames to be written.
pub struct FrameWriterHandle {
    sender: Option<Sender<FrameWriteTask>>,
    workers: Vec<JoinHandle<usize>>,
}

impl FrameWriterHandle {
    pub fn new(num_workers: usize, buffer_size: usize) -> Result<Self> {
        let (sender, receiver) = bounded::<FrameWriteTask>(buffer_size);

        let mut workers = Vec::new();
        for worker_id in 0..num_workers.max(1) {
            let receiver = receiver.clone();

            let handle = std::thread::Builder::new()
                .name(format!("frame-writer-{worker_id}"))
                .spawn(move || {
                    log::debug!("Frame writer worker {} started", worker_id);
                    let mut written = 0;
                    while let Ok(task) = receiver.recv() {
                        match save_frame(&task.image, &task.filepath) {
                            Ok(()) => written += 1,
                            Err(e) => log::warn!(
                                "Worker {} failed to save frame to {}: {}",
                                worker_id,
                                task.filepath.display(),
                                e
                            ),
                        }
                    }
                    log::debug!("Frame writer worker {} shutting down", worker_id);
                    written
                })?;

            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue `image` for writing to `filepath`.
    pub fn write_frame(&self, image: RgbaImage, filepath: PathBuf) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(PlanetariumError::WriterClosed)?;
        let task = FrameWriteTask { image, filepath };
        match sender.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(task)) => Err(PlanetariumError::WriterQueueFull(task.filepath)),
            Err(TrySendError::Disconnected(_)) => Err(PlanetariumError::WriterClosed),
        }
    }

    /// Close the queue, wait for the workers and return the number of frames
    /// written.
    pub fn wait_for_completion(mut self) -> usize {
        self.finish()
    }

    fn finish(&mut self) -> usize {
        self.sender = None;

        let mut written = 0;
        for (worker_id, handle) in self.workers.drain(..).enumerate() {
            match handle.join() {
                Ok(count) => written += count,
                Err(e) => log::warn!("Worker {} panicked: {:?}", worker_id, e),
            }
        }

        log::info!("Frame writer finished, {} frames written", written);
        written
    }
}

impl Drop for FrameWriterHandle {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.finish();
        }
    }
}

fn save_frame(image: &RgbaImage, filepath: &Path) -> Result<()> {
    if let Some(parent) = filepath.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image.save_with_format(filepath, image::ImageFormat::Png)?;
    Ok(())
}
