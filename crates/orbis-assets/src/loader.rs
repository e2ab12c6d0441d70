//! Background texture decoding on a small thread pool.

use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::channel::{DecodedImage, TextureChannel, TextureSource};
use crate::error::AssetError;

/// Queue depth for both directions. A globe needs five textures, so
/// submissions never block in practice.
const QUEUE_CAPACITY: usize = TextureChannel::COUNT * 2;

struct LoadTask {
    channel: TextureChannel,
    path: PathBuf,
}

/// One finished decode, successful or not.
#[derive(Debug)]
pub struct LoadResult {
    pub channel: TextureChannel,
    pub path: PathBuf,
    pub image: Result<DecodedImage, AssetError>,
    /// Read + decode time in microseconds.
    pub decode_time_us: u64,
}

/// Decodes texture files off the main thread.
///
/// Results are drained with [`poll`](Self::poll), which never blocks.
/// Dropping the loader closes the task queue and lets the workers exit.
pub struct TextureLoader {
    task_sender: Sender<LoadTask>,
    result_receiver: Receiver<LoadResult>,
    pending: usize,
}

impl TextureLoader {
    /// Spawn `thread_count` decoder threads (at least one).
    pub fn new(thread_count: usize) -> Result<Self, AssetError> {
        let (task_sender, task_receiver) = bounded::<LoadTask>(QUEUE_CAPACITY);
        let (result_sender, result_receiver) = bounded::<LoadResult>(QUEUE_CAPACITY);

        for i in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            std::thread::Builder::new()
                .name(format!("texture-worker-{i}"))
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        let start = Instant::now();
                        let image = DecodedImage::open(&task.path);
                        let decode_time_us = start.elapsed().as_micros() as u64;
                        let result = LoadResult {
                            channel: task.channel,
                            path: task.path,
                            image,
                            decode_time_us,
                        };
                        if sender.send(result).is_err() {
                            break;
                        }
                    }
                })
                .map_err(AssetError::WorkerSpawn)?;
        }

        Ok(Self {
            task_sender,
            result_receiver,
            pending: 0,
        })
    }

    /// Loader sized from the CPU count, capped at one thread per channel.
    /// `threads = 0` picks automatically.
    pub fn with_threads(threads: usize) -> Result<Self, AssetError> {
        let threads = if threads == 0 {
            num_cpus::get().saturating_sub(1).clamp(1, TextureChannel::COUNT)
        } else {
            threads
        };
        Self::new(threads)
    }

    /// Queue one channel for decoding.
    pub fn submit(&mut self, channel: TextureChannel, path: impl Into<PathBuf>) -> Result<(), AssetError> {
        let path = path.into();
        tracing::debug!(%channel, path = %path.display(), "queued texture");
        self.task_sender
            .send(LoadTask { channel, path })
            .map_err(|_| AssetError::Disconnected)?;
        self.pending += 1;
        Ok(())
    }

    /// Queue every channel of `source`.
    pub fn submit_all(&mut self, source: &TextureSource) -> Result<(), AssetError> {
        for (channel, path) in source.iter() {
            self.submit(channel, path)?;
        }
        Ok(())
    }

    /// Drain all finished decodes. Call once per frame.
    pub fn poll(&mut self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            results.push(result);
        }
        results
    }

    /// Submitted tasks whose results have not been drained yet.
    pub fn pending(&self) -> usize {
        self.pending
    }
}
