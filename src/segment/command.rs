use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::decode::load_image;
use crate::assets::pair::ImagePair;
use crate::foundation::error::SegmentationError;
use crate::segment::adapter::{Segmenter, SourceImage};

const INPUT: &str = "{input}";
const OUTPUT: &str = "{output}";

static JOB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Runs an external matting program that reads `{input}` and writes a cutout PNG to `{output}`.
///
/// The source photo is written to a scratch directory first; the directory is removed once the
/// cutout has been decoded.
#[derive(Clone, Debug)]
pub struct CommandSegmenter {
    program: String,
    args: Vec<String>,
}

impl CommandSegmenter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `rembg i {input} {output}`.
    pub fn rembg() -> Self {
        Self::new("rembg").args(["i", INPUT, OUTPUT])
    }

    /// Append an argument; `{input}` and `{output}` are substituted with file paths.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command_for(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        for a in &self.args {
            let a = a
                .replace(INPUT, &input.to_string_lossy())
                .replace(OUTPUT, &output.to_string_lossy());
            cmd.arg(a);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Segmenter for CommandSegmenter {
    #[tracing::instrument(skip_all, fields(program = %self.program, source = source.name()))]
    fn segment(&self, source: &SourceImage) -> Result<ImagePair, SegmentationError> {
        let background = source.decode()?;

        let scratch = ScratchDir::create()?;
        let ext = source.extension().unwrap_or_else(|| "png".to_owned());
        let input = scratch.0.join(format!("input.{ext}"));
        let output = scratch.0.join("cutout.png");
        std::fs::write(&input, source.bytes()).map_err(|e| {
            SegmentationError::Environment(format!("write '{}': {e}", input.display()))
        })?;

        let out = self
            .command_for(&input, &output)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SegmentationError::Environment(format!(
                    "'{}' was not found on PATH",
                    self.program
                )),
                _ => SegmentationError::Environment(format!(
                    "failed to spawn '{}': {e}",
                    self.program
                )),
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(SegmentationError::Adapter(format!(
                "'{}' exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            )));
        }

        let foreground = load_image(&output)
            .map_err(|e| SegmentationError::Adapter(format!("read cutout: {e}")))?;
        tracing::debug!(
            width = foreground.width(),
            height = foreground.height(),
            "cutout ready"
        );
        Ok(ImagePair::new(background, foreground))
    }

    fn name(&self) -> &str {
        &self.program
    }
}

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> Result<Self, SegmentationError> {
        let path = std::env::temp_dir().join(format!(
            "textbehind_segment_{}_{}",
            std::process::id(),
            JOB_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path).map_err(|e| {
            SegmentationError::Environment(format!("create '{}': {e}", path.display()))
        })?;
        Ok(Self(path))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/command.rs"]
mod tests;
