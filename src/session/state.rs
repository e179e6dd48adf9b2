use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;

use crate::assets::pair::ImagePair;
use crate::export::png::{ExportReceipt, export_png};
use crate::export::sink::ExportSink;
use crate::foundation::error::{SegmentationError, TextBehindError, TextBehindResult};
use crate::layers::store::EditorState;
use crate::render::compositor::Compositor;
use crate::segment::adapter::{Segmenter, SourceImage};

/// Whether text layers survive loading a new image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerRetention {
    /// Start every image with an empty layer list.
    #[default]
    Discard,
    /// Carry the current layers over to the next image.
    Keep,
}

/// Options controlling [`Session`] behavior.
#[derive(Clone, Debug, Default)]
pub struct SessionOpts {
    pub retention: LayerRetention,
}

impl SessionOpts {
    pub fn with_retention(mut self, retention: LayerRetention) -> Self {
        self.retention = retention;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No image loaded.
    AwaitingUpload,
    /// A segmentation job is in flight.
    Processing,
    /// An image pair is loaded and layers can be edited.
    Editing,
}

type JobResult = Result<ImagePair, SegmentationError>;

struct Job {
    rx: mpsc::Receiver<JobResult>,
    handle: JoinHandle<()>,
    source: String,
}

/// Owns the image pair, the layer editor, and the in-flight segmentation job.
pub struct Session {
    segmenter: Arc<dyn Segmenter>,
    opts: SessionOpts,
    job: Option<Job>,
    pair: Option<ImagePair>,
    editor: EditorState,
}

impl Session {
    pub fn new(segmenter: Arc<dyn Segmenter>, opts: SessionOpts) -> Self {
        Self {
            segmenter,
            opts,
            job: None,
            pair: None,
            editor: EditorState::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.job.is_some() {
            SessionPhase::Processing
        } else if self.pair.is_some() {
            SessionPhase::Editing
        } else {
            SessionPhase::AwaitingUpload
        }
    }

    /// Start segmenting `source` on a worker thread.
    ///
    /// Only one job may be in flight; the current image pair is dropped immediately.
    pub fn begin(&mut self, source: SourceImage) -> TextBehindResult<()> {
        if let Some(job) = &self.job {
            return Err(TextBehindError::validation(format!(
                "segmentation of '{}' is already in progress",
                job.source
            )));
        }

        let (tx, rx) = mpsc::channel::<JobResult>();
        let segmenter = Arc::clone(&self.segmenter);
        let name = source.name().to_owned();
        let handle = std::thread::Builder::new()
            .name("textbehind-segment".to_owned())
            .spawn(move || {
                let _span = tracing::info_span!(
                    "segment",
                    adapter = segmenter.name(),
                    source = source.name()
                )
                .entered();
                let result = segmenter.segment(&source);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "segmentation failed");
                }
                // The session may have been reset; nobody is listening then.
                let _ = tx.send(result);
            })
            .map_err(|e| {
                SegmentationError::Environment(format!("spawn segmentation worker: {e}"))
            })?;

        tracing::info!(source = %name, "segmentation started");
        self.pair = None;
        self.editor.end_interaction();
        self.job = Some(Job {
            rx,
            handle,
            source: name,
        });
        Ok(())
    }

    /// Check the in-flight job without blocking.
    pub fn poll(&mut self) -> TextBehindResult<SessionPhase> {
        let Some(job) = &self.job else {
            return Ok(self.phase());
        };
        match job.rx.try_recv() {
            Ok(result) => self.finish(result),
            Err(mpsc::TryRecvError::Empty) => Ok(SessionPhase::Processing),
            Err(mpsc::TryRecvError::Disconnected) => {
                self.finish(Err(SegmentationError::Disconnected))
            }
        }
    }

    /// Block until the in-flight job completes.
    pub fn wait(&mut self) -> TextBehindResult<SessionPhase> {
        let Some(job) = &self.job else {
            return Ok(self.phase());
        };
        let result = job
            .rx
            .recv()
            .unwrap_or(Err(SegmentationError::Disconnected));
        self.finish(result)
    }

    fn finish(&mut self, result: JobResult) -> TextBehindResult<SessionPhase> {
        if let Some(job) = self.job.take() {
            let _ = job.handle.join();
        }
        match result {
            Ok(pair) => {
                let natural = pair.natural_size();
                tracing::info!(
                    width = natural.width,
                    height = natural.height,
                    "segmentation finished"
                );
                if self.opts.retention == LayerRetention::Discard {
                    self.editor = EditorState::new();
                }
                self.pair = Some(pair);
                Ok(SessionPhase::Editing)
            }
            Err(e) => {
                tracing::error!(error = %e, "segmentation failed, back to upload");
                if self.opts.retention == LayerRetention::Discard {
                    self.editor = EditorState::new();
                }
                Err(e.into())
            }
        }
    }

    /// Drop the image pair and layers and return to [`SessionPhase::AwaitingUpload`].
    ///
    /// An in-flight job is abandoned; its worker finishes in the background.
    pub fn reset(&mut self) {
        if let Some(job) = self.job.take() {
            tracing::debug!(source = %job.source, "abandoning segmentation job");
        }
        self.pair = None;
        self.editor = EditorState::new();
    }

    pub fn pair(&self) -> Option<&ImagePair> {
        self.pair.as_ref()
    }

    /// The layer editor, available while editing.
    pub fn editor(&self) -> Option<&EditorState> {
        self.pair.as_ref().map(|_| &self.editor)
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorState> {
        match self.pair {
            Some(_) => Some(&mut self.editor),
            None => None,
        }
    }

    /// Export the current composition; see [`export_png`].
    pub fn export(
        &self,
        compositor: &mut Compositor,
        displayed_width: f64,
        sink: &mut dyn ExportSink,
    ) -> TextBehindResult<ExportReceipt> {
        let pair = self
            .pair
            .as_ref()
            .ok_or_else(|| TextBehindError::validation("no image loaded to export"))?;
        export_png(compositor, pair, self.editor.layers(), displayed_width, sink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
