//! Fixed-size complex transform engines.
//!
//! An engine owns its frame memory and its plan for the whole lifetime of a
//! generator. Callers borrow one input frame at a time, fill it, call
//! [`TransformEngine::execute`] once per batch, then read the output frames.
//! Dropping the engine releases everything it acquired.

#[cfg(feature = "accelerated")]
pub mod batched;
pub mod software;

use rustfft::num_complex::Complex32;

use crate::error::{GeneratorError, Result};
use crate::layout::Direction;

#[cfg(feature = "accelerated")]
pub use batched::BatchedEngine;
pub use software::SoftwareEngine;

/// Transform backend selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Plan-once software transform, one frame per execution.
    #[default]
    Software,
    /// Batched engine, all frames of a call in one execution.
    Accelerated,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Software => write!(f, "software"),
            Backend::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// A prepared transform of fixed frame size and batch size.
pub trait TransformEngine: Send {
    /// Backend implementing this engine.
    fn backend(&self) -> Backend;

    /// Direction the plan was prepared for.
    fn direction(&self) -> Direction;

    /// Number of complex samples per frame.
    fn frame_size(&self) -> usize;

    /// Number of frames consumed by one [`execute`](Self::execute).
    fn batch_size(&self) -> usize;

    /// Mutable view of input frame `index` (`index < batch_size()`).
    fn input_frame(&mut self, index: usize) -> &mut [Complex32];

    /// Transform every input frame of the batch into its output frame.
    fn execute(&mut self) -> Result<()>;

    /// View of output frame `index` as left by the last execution.
    fn output_frame(&self, index: usize) -> &[Complex32];
}

/// Prepare an engine for `batch_size` frames of `frame_size` samples.
///
/// The software backend always runs one frame at a time, whatever batch is
/// requested.
pub fn prepare(
    backend: Backend,
    frame_size: usize,
    batch_size: usize,
    direction: Direction,
) -> Result<Box<dyn TransformEngine>> {
    match backend {
        Backend::Software => Ok(Box::new(SoftwareEngine::new(frame_size, direction)?)),
        #[cfg(feature = "accelerated")]
        Backend::Accelerated => Ok(Box::new(BatchedEngine::new(
            frame_size, batch_size, direction,
        )?)),
        #[cfg(not(feature = "accelerated"))]
        Backend::Accelerated => {
            let _ = batch_size;
            Err(GeneratorError::DeviceUnavailable(
                "built without the `accelerated` feature".to_string(),
            ))
        }
    }
}

/// Allocate a zeroed frame region, reporting failure instead of aborting.
fn alloc_frames(len: usize) -> Result<Vec<Complex32>> {
    let requested = len.saturating_mul(std::mem::size_of::<Complex32>());
    let mut frames = Vec::new();
    frames
        .try_reserve_exact(len)
        .map_err(|err| GeneratorError::ResourceExhausted {
            requested,
            reason: err.to_string(),
        })?;
    frames.resize(len, Complex32::new(0.0, 0.0));
    Ok(frames)
}

fn plan(frame_size: usize, direction: Direction) -> std::sync::Arc<dyn rustfft::Fft<f32>> {
    let mut planner = rustfft::FftPlanner::<f32>::new();
    match direction {
        Direction::Inverse => planner.plan_fft_inverse(frame_size),
        Direction::Forward => planner.plan_fft_forward(frame_size),
    }
}
