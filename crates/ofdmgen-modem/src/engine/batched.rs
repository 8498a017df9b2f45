//! Batched transform engine.
//!
//! Mirrors the contract of a hardware FFT queue: frames are staged into one
//! contiguous engine-resident region, a single dispatch transforms the whole
//! batch, and results are read back from a second region. The fixed cost of a
//! dispatch is paid once per batch rather than once per symbol.

use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::Fft;

use super::{alloc_frames, plan, Backend, TransformEngine};
use crate::error::{GeneratorError, Result};
use crate::layout::Direction;

/// Smallest supported frame, as a power of two.
pub const MIN_LOG2_SIZE: u32 = 8;
/// Largest supported frame, as a power of two.
pub const MAX_LOG2_SIZE: u32 = 22;
/// Engine memory available for the input and output regions.
pub const DEFAULT_MEMORY_BUDGET: usize = 256 << 20;

pub struct BatchedEngine {
    fft: Arc<dyn Fft<f32>>,
    direction: Direction,
    frame_size: usize,
    batch_size: usize,
    input: Vec<Complex32>,
    output: Vec<Complex32>,
    scratch: Vec<Complex32>,
    dispatches: u64,
}

impl BatchedEngine {
    /// Prepare `batch_size` frames of `frame_size` within the default memory budget.
    pub fn new(frame_size: usize, batch_size: usize, direction: Direction) -> Result<Self> {
        Self::with_memory_budget(frame_size, batch_size, direction, DEFAULT_MEMORY_BUDGET)
    }

    pub fn with_memory_budget(
        frame_size: usize,
        batch_size: usize,
        direction: Direction,
        budget: usize,
    ) -> Result<Self> {
        check_shape(frame_size, batch_size)?;

        let region_len = frame_size
            .checked_mul(batch_size)
            .ok_or_else(|| GeneratorError::UnsupportedSize {
                frame_size,
                batch_size,
                reason: "batch too large".to_string(),
            })?;
        let requested = region_len
            .saturating_mul(2)
            .saturating_mul(std::mem::size_of::<Complex32>());
        if requested > budget {
            return Err(GeneratorError::ResourceExhausted {
                requested,
                reason: format!(
                    "budget is {} bytes, try a smaller batch",
                    budget
                ),
            });
        }

        let fft = plan(frame_size, direction);
        let input = alloc_frames(region_len)?;
        let output = alloc_frames(region_len)?;
        let scratch = alloc_frames(fft.get_outofplace_scratch_len())?;

        log::debug!(
            "batched engine ready: {} x {} bins, {:?}, {} bytes",
            batch_size,
            frame_size,
            direction,
            requested
        );
        Ok(Self {
            fft,
            direction,
            frame_size,
            batch_size,
            input,
            output,
            scratch,
            dispatches: 0,
        })
    }

    /// Number of batched executions issued so far.
    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }
}

fn check_shape(frame_size: usize, batch_size: usize) -> Result<()> {
    let unsupported = |reason: String| GeneratorError::UnsupportedSize {
        frame_size,
        batch_size,
        reason,
    };
    if !frame_size.is_power_of_two() {
        return Err(unsupported("frame size must be a power of two".to_string()));
    }
    let log2 = frame_size.trailing_zeros();
    if !(MIN_LOG2_SIZE..=MAX_LOG2_SIZE).contains(&log2) {
        return Err(unsupported(format!(
            "log2 size {} outside {}..={}",
            log2, MIN_LOG2_SIZE, MAX_LOG2_SIZE
        )));
    }
    if batch_size == 0 {
        return Err(unsupported("batch must hold at least one frame".to_string()));
    }
    Ok(())
}

impl TransformEngine for BatchedEngine {
    fn backend(&self) -> Backend {
        Backend::Accelerated
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn input_frame(&mut self, index: usize) -> &mut [Complex32] {
        let start = index * self.frame_size;
        &mut self.input[start..start + self.frame_size]
    }

    fn execute(&mut self) -> Result<()> {
        // One call covers every frame in the region.
        self.fft
            .process_outofplace_with_scratch(&mut self.input, &mut self.output, &mut self.scratch);
        self.dispatches += 1;
        Ok(())
    }

    fn output_frame(&self, index: usize) -> &[Complex32] {
        let start = index * self.frame_size;
        &self.output[start..start + self.frame_size]
    }
}

impl Drop for BatchedEngine {
    fn drop(&mut self) {
        log::debug!(
            "batched engine released: {} x {} bins after {} dispatches",
            self.batch_size,
            self.frame_size,
            self.dispatches
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{assert_close, naive_dft};

    #[test]
    fn transforms_every_frame_in_one_dispatch() {
        let mut engine = BatchedEngine::new(256, 3, Direction::Inverse).expect("engine");
        let frames: Vec<Vec<Complex32>> = (0..3)
            .map(|f| {
                (0..256)
                    .map(|k| {
                        if k % 37 == f {
                            Complex32::new(1.0, -0.5)
                        } else {
                            Complex32::new(0.0, 0.0)
                        }
                    })
                    .collect()
            })
            .collect();

        for (i, frame) in frames.iter().enumerate() {
            engine.input_frame(i).copy_from_slice(frame);
        }
        engine.execute().expect("execute");
        assert_eq!(engine.dispatches(), 1);

        for (i, frame) in frames.iter().enumerate() {
            assert_close(engine.output_frame(i), &naive_dft(frame, 1.0));
        }
    }

    #[test]
    fn rejects_unsupported_sizes() {
        for size in [0, 100, 128, 1 << 23] {
            assert!(
                matches!(
                    BatchedEngine::new(size, 1, Direction::Inverse),
                    Err(GeneratorError::UnsupportedSize { .. })
                ),
                "size {} accepted",
                size
            );
        }
        assert!(matches!(
            BatchedEngine::new(256, 0, Direction::Inverse),
            Err(GeneratorError::UnsupportedSize { .. })
        ));
    }

    #[test]
    fn rejects_batch_over_budget() {
        let err = BatchedEngine::with_memory_budget(1024, 8, Direction::Inverse, 64 * 1024)
            .err()
            .expect("over budget");
        assert_eq!(
            err,
            GeneratorError::ResourceExhausted {
                requested: 1024 * 8 * 2 * 8,
                reason: "budget is 65536 bytes, try a smaller batch".to_string(),
            }
        );
    }
}
