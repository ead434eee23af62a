//! Render backend that runs an external renderer program.
//!
//! The program is invoked as
//!
//! ```text
//! <program> <args...> <mode> <re_start> <re_end> <im_start> <im_end> <output> \
//!     <max_iterations> <palette_length> <palette_id>
//! ```
//!
//! where `mode` is `0` for native and `1` for high precision coordinates. A
//! zero exit status plus an image at `<output>` counts as success. Every
//! request writes to its own file so a slow render never overwrites a newer
//! one.

use crate::backend::{RenderBackend, RenderError, RenderFuture, RenderedImage};
use crate::config::{CoordinateFormat, RendererConfig};
use futures::channel::oneshot;
use futures::future::{self, FutureExt};
use mandelzoom_core::{FixedPoint, RenderCoordinates, RenderRequest};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone, Debug)]
pub struct ProcessRenderer {
    config: RendererConfig,
}

impl ProcessRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn output_path(&self, request_id: u64) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}_{:06}.png", self.config.output_stem, request_id))
    }

    /// Full argument list passed after the program name.
    pub fn command_args(&self, request: &RenderRequest, output: &Path) -> Vec<String> {
        let mut args = self.config.args.clone();
        let mode = if request.coordinates.is_high_precision() { "1" } else { "0" };
        args.push(mode.to_string());
        args.extend(self.coordinate_args(&request.coordinates));
        args.push(output.display().to_string());
        args.push(request.params.max_iterations.to_string());
        args.push(request.params.palette_length.to_string());
        args.push(request.params.palette_id.to_string());
        args
    }

    fn coordinate_args(&self, coordinates: &RenderCoordinates) -> [String; 4] {
        match (self.config.coordinate_format, coordinates) {
            (CoordinateFormat::Limbs, RenderCoordinates::HighPrecision { fixed_point, .. }) => [
                format_limbs(&fixed_point.re_start),
                format_limbs(&fixed_point.re_end),
                format_limbs(&fixed_point.im_start),
                format_limbs(&fixed_point.im_end),
            ],
            _ => coordinates.to_decimal_args(),
        }
    }
}

impl RenderBackend for ProcessRenderer {
    fn render(&self, request: RenderRequest) -> RenderFuture {
        let request_id = request.request_id;
        let output = self.output_path(request_id);
        let mut command = Command::new(&self.config.program);
        command.args(self.command_args(&request, &output));
        let timeout = self.config.timeout();

        let (sender, receiver) = oneshot::channel();
        let spawned = thread::Builder::new()
            .name(format!("renderer-{}", request_id))
            .spawn(move || {
                // Receiver may be gone if the caller dropped the pending render
                let _ = sender.send(run_renderer(command, timeout, request_id, output));
            });
        if let Err(e) = spawned {
            return future::ready(Err(RenderError::Io(e))).boxed();
        }

        async move { receiver.await.map_err(|_| RenderError::Disconnected)? }.boxed()
    }
}

/// `L0,L1,L2,L3`, most significant limb first.
fn format_limbs(value: &FixedPoint) -> String {
    let [l0, l1, l2, l3] = value.limbs();
    format!("{},{},{},{}", l0, l1, l2, l3)
}

fn run_renderer(
    mut command: Command,
    timeout: Option<Duration>,
    request_id: u64,
    output: PathBuf,
) -> Result<RenderedImage, RenderError> {
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }

    log::debug!("Launching renderer for request {}: {:?}", request_id, command);
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    // Read on its own thread; a full stderr pipe would block the child
    let stderr = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            String::from_utf8_lossy(&buffer).into_owned()
        })
    });

    let status = match timeout {
        Some(limit) => match wait_with_timeout(&mut child, limit)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                log::warn!("Renderer for request {} timed out after {:?}", request_id, limit);
                return Err(RenderError::TimedOut(limit));
            }
        },
        None => child.wait()?,
    };

    if !status.success() {
        let stderr = stderr
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();
        return Err(RenderError::Exited {
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    if !output.is_file() {
        return Err(RenderError::MissingOutput(output));
    }

    log::info!("Renderer finished request {} -> {}", request_id, output.display());
    Ok(RenderedImage {
        request_id,
        path: output,
    })
}

fn wait_with_timeout(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
