//! Placement of the occupied carriers inside the transform frame.

use crate::error::{GeneratorError, Result};

/// Transform direction, fixed for the lifetime of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Frequency to time (synthesis).
    #[default]
    Inverse,
    /// Time to frequency (analysis).
    Forward,
}

/// Where each half of a carrier block lands in a transform frame.
///
/// The block is split around the zero-frequency bin: the positive half sits
/// just above bin 0 and the negative half is folded to the end of the frame.
/// Everything between the two segments is guard band. With an even carrier
/// count bin 0 stays null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierLayout {
    pub pos_dst: usize,
    pub pos_src: usize,
    pub pos_size: usize,
    pub neg_dst: usize,
    pub neg_src: usize,
    pub neg_size: usize,
    pub zero_dst: usize,
    pub zero_size: usize,
}

impl CarrierLayout {
    /// Compute the layout of `carriers` subcarriers in a frame of `frame_size` bins.
    pub fn new(carriers: usize, frame_size: usize, direction: Direction) -> Result<Self> {
        if carriers == 0 {
            return Err(GeneratorError::Configuration(
                "carrier count must be at least 1".to_string(),
            ));
        }
        if carriers > frame_size {
            return Err(GeneratorError::Configuration(format!(
                "{} carriers do not fit in a frame of {} bins",
                carriers, frame_size
            )));
        }

        let half = carriers / 2;
        let ceil_half = (carriers + 1) / 2;
        let pos_dst = if carriers % 2 == 1 { 0 } else { 1 };

        // An even block needs one extra bin for the null DC carrier.
        if pos_dst + carriers > frame_size {
            return Err(GeneratorError::Configuration(format!(
                "{} carriers plus a null DC bin do not fit in a frame of {} bins",
                carriers, frame_size
            )));
        }

        let (pos_src, neg_src) = match direction {
            Direction::Inverse => (0, ceil_half),
            Direction::Forward => (half, 0),
        };
        let neg_dst = frame_size - half;
        let zero_dst = pos_dst + ceil_half;

        let layout = Self {
            pos_dst,
            pos_src,
            pos_size: ceil_half,
            neg_dst,
            neg_src,
            neg_size: half,
            zero_dst,
            zero_size: neg_dst - zero_dst,
        };
        log::debug!(
            "carrier layout for {} carriers in {} bins: {:?}",
            carriers,
            frame_size,
            layout
        );
        Ok(layout)
    }

    /// Number of carriers placed by this layout.
    pub fn carriers(&self) -> usize {
        self.pos_size + self.neg_size
    }

    /// Frame size this layout was computed for.
    pub fn frame_size(&self) -> usize {
        self.neg_dst + self.neg_size
    }

    /// Write one carrier block into `frame`.
    ///
    /// The whole frame is cleared first, so no bin outside the two mapped
    /// segments keeps data from an earlier symbol.
    pub fn scatter<T: Copy + Default>(&self, block: &[T], frame: &mut [T]) {
        debug_assert_eq!(block.len(), self.carriers());
        debug_assert_eq!(frame.len(), self.frame_size());

        frame.fill(T::default());
        frame[self.pos_dst..self.pos_dst + self.pos_size]
            .copy_from_slice(&block[self.pos_src..self.pos_src + self.pos_size]);
        frame[self.neg_dst..self.neg_dst + self.neg_size]
            .copy_from_slice(&block[self.neg_src..self.neg_src + self.neg_size]);
    }
}
