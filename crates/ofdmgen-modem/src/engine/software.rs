use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::Fft;

use super::{alloc_frames, plan, Backend, TransformEngine};
use crate::error::{GeneratorError, Result};
use crate::layout::Direction;

/// Software transform: one plan built up front, one frame per execution.
pub struct SoftwareEngine {
    fft: Arc<dyn Fft<f32>>,
    direction: Direction,
    input: Vec<Complex32>,
    output: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl SoftwareEngine {
    pub fn new(frame_size: usize, direction: Direction) -> Result<Self> {
        if frame_size == 0 {
            return Err(GeneratorError::UnsupportedSize {
                frame_size,
                batch_size: 1,
                reason: "empty frame".to_string(),
            });
        }

        // Planning is the expensive part; it happens once here.
        let fft = plan(frame_size, direction);
        let input = alloc_frames(frame_size)?;
        let output = alloc_frames(frame_size)?;
        let scratch = alloc_frames(fft.get_outofplace_scratch_len())?;

        log::debug!(
            "software engine ready: {} bins, {:?}",
            frame_size,
            direction
        );
        Ok(Self {
            fft,
            direction,
            input,
            output,
            scratch,
        })
    }
}

impl TransformEngine for SoftwareEngine {
    fn backend(&self) -> Backend {
        Backend::Software
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn frame_size(&self) -> usize {
        self.input.len()
    }

    fn batch_size(&self) -> usize {
        1
    }

    fn input_frame(&mut self, index: usize) -> &mut [Complex32] {
        assert_eq!(index, 0, "software engine holds a single frame");
        &mut self.input
    }

    fn execute(&mut self) -> Result<()> {
        // The input doubles as scratch space and is clobbered.
        self.fft
            .process_outofplace_with_scratch(&mut self.input, &mut self.output, &mut self.scratch);
        Ok(())
    }

    fn output_frame(&self, index: usize) -> &[Complex32] {
        assert_eq!(index, 0, "software engine holds a single frame");
        &self.output
    }
}

impl Drop for SoftwareEngine {
    fn drop(&mut self) {
        log::debug!("software engine released: {} bins", self.input.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{assert_close, naive_dft};

    fn ramp(len: usize) -> Vec<Complex32> {
        (0..len)
            .map(|i| Complex32::new((i % 5) as f32 * 0.25, 1.0 - (i % 3) as f32 * 0.5))
            .collect()
    }

    #[test]
    fn inverse_matches_naive_dft() {
        let frame = ramp(8);
        let mut engine = SoftwareEngine::new(8, Direction::Inverse).expect("engine");
        engine.input_frame(0).copy_from_slice(&frame);
        engine.execute().expect("execute");
        assert_close(engine.output_frame(0), &naive_dft(&frame, 1.0));
    }

    #[test]
    fn forward_matches_naive_dft() {
        let frame = ramp(12);
        let mut engine = SoftwareEngine::new(12, Direction::Forward).expect("engine");
        engine.input_frame(0).copy_from_slice(&frame);
        engine.execute().expect("execute");
        assert_close(engine.output_frame(0), &naive_dft(&frame, -1.0));
    }

    #[test]
    fn plan_is_reused_across_executions() {
        let mut engine = SoftwareEngine::new(16, Direction::Inverse).expect("engine");
        for round in 0..3 {
            let frame: Vec<Complex32> = ramp(16)
                .into_iter()
                .map(|c| c * (round + 1) as f32)
                .collect();
            engine.input_frame(0).copy_from_slice(&frame);
            engine.execute().expect("execute");
            assert_close(engine.output_frame(0), &naive_dft(&frame, 1.0));
        }
    }

    #[test]
    #[should_panic(expected = "single frame")]
    fn input_frame_index_is_checked() {
        let mut engine = SoftwareEngine::new(8, Direction::Inverse).expect("engine");
        engine.input_frame(1);
    }

    #[test]
    #[should_panic(expected = "single frame")]
    fn output_frame_index_is_checked() {
        let engine = SoftwareEngine::new(8, Direction::Inverse).expect("engine");
        engine.output_frame(1);
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(matches!(
            SoftwareEngine::new(0, Direction::Inverse),
            Err(GeneratorError::UnsupportedSize { .. })
        ));
    }
}
