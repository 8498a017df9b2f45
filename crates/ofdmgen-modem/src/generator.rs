//! OFDM symbol generation.

use rustfft::num_complex::Complex32;

use crate::engine::{self, Backend, TransformEngine};
use crate::error::{GeneratorError, Result};
use crate::layout::{CarrierLayout, Direction};

/// Bytes per packed complex sample (two `f32`).
pub const SAMPLE_BYTES: usize = 2 * std::mem::size_of::<f32>();

/// Construction parameters for an [`OfdmGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Symbol blocks handled by each call to [`OfdmGenerator::process`].
    pub symbols: usize,
    /// Occupied carriers per symbol.
    pub carriers: usize,
    /// Transform size per symbol.
    pub spacing: usize,
    pub direction: Direction,
    pub backend: Backend,
}

impl GeneratorConfig {
    pub fn new(symbols: usize, carriers: usize, spacing: usize) -> Self {
        Self {
            symbols,
            carriers,
            spacing,
            direction: Direction::Inverse,
            backend: Backend::Software,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

/// Frame sizes a stream scheduler needs to size its buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub input_samples: usize,
    pub output_samples: usize,
}

impl FrameFormat {
    pub fn input_bytes(&self) -> usize {
        self.input_samples * SAMPLE_BYTES
    }

    pub fn output_bytes(&self) -> usize {
        self.output_samples * SAMPLE_BYTES
    }
}

/// Turns blocks of subcarrier values into time-domain OFDM symbols.
///
/// Each block of `carriers` samples is laid out around the DC bin of a
/// `spacing`-point frame and run through the inverse transform. The engine is
/// acquired here and released when the generator is dropped.
pub struct OfdmGenerator {
    config: GeneratorConfig,
    layout: CarrierLayout,
    engine: Box<dyn TransformEngine>,
    // Symbols are gathered here and only handed to the caller once every
    // batch has been transformed.
    staging: Vec<Complex32>,
}

impl OfdmGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let layout = validate(&config)?;
        // The runtime transform is always the synthesis direction; the
        // configured direction only selects the carrier layout.
        let engine = engine::prepare(
            config.backend,
            config.spacing,
            config.symbols,
            Direction::Inverse,
        )?;
        Self::assemble(config, layout, engine)
    }

    /// Build a generator around an already prepared engine.
    pub fn with_engine(config: GeneratorConfig, engine: Box<dyn TransformEngine>) -> Result<Self> {
        let layout = validate(&config)?;
        Self::assemble(config, layout, engine)
    }

    fn assemble(
        config: GeneratorConfig,
        layout: CarrierLayout,
        engine: Box<dyn TransformEngine>,
    ) -> Result<Self> {
        if engine.frame_size() != config.spacing {
            return Err(GeneratorError::Configuration(format!(
                "engine frame size {} does not match spacing {}",
                engine.frame_size(),
                config.spacing
            )));
        }
        if engine.direction() != Direction::Inverse {
            return Err(GeneratorError::Configuration(format!(
                "engine runs the {:?} transform, generation needs the inverse",
                engine.direction()
            )));
        }
        if engine.batch_size() == 0 {
            return Err(GeneratorError::Configuration(
                "engine batch size is zero".to_string(),
            ));
        }
        log::debug!(
            "ofdm generator: {} symbols x {} carriers in {} bins, {} backend",
            config.symbols,
            config.carriers,
            config.spacing,
            engine.backend()
        );
        Ok(Self {
            config,
            layout,
            engine,
            staging: Vec::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn layout(&self) -> &CarrierLayout {
        &self.layout
    }

    pub fn backend(&self) -> Backend {
        self.engine.backend()
    }

    /// Expected input and produced output per call.
    pub fn format(&self) -> FrameFormat {
        FrameFormat {
            input_samples: self.config.symbols * self.config.carriers,
            output_samples: self.config.symbols * self.config.spacing,
        }
    }

    /// Generate one time-domain symbol per carrier block.
    ///
    /// `input` must contain exactly `symbols * carriers` samples. `output` is
    /// resized to `symbols * spacing` samples and overwritten. Returns the
    /// number of samples written. On any error, including a failed transform,
    /// `output` is left untouched.
    pub fn process(
        &mut self,
        input: &[Complex32],
        output: &mut Vec<Complex32>,
    ) -> Result<usize> {
        let format = self.format();
        if input.len() != format.input_samples {
            log::warn!(
                "rejecting {} input samples, expected {}",
                input.len(),
                format.input_samples
            );
            return Err(GeneratorError::InvalidInputSize {
                expected: format.input_samples,
                actual: input.len(),
            });
        }
        let out_len = format.output_samples;
        self.staging.clear();
        if self.staging.try_reserve_exact(out_len).is_err() {
            log::warn!("cannot size output to {} samples", out_len);
            return Err(GeneratorError::InvalidOutputSize {
                expected: out_len,
                actual: output.len(),
            });
        }
        self.staging.resize(out_len, Complex32::new(0.0, 0.0));

        log::trace!("processing {} symbols", self.config.symbols);

        let carriers = self.config.carriers;
        let spacing = self.config.spacing;
        let batch = self.engine.batch_size();

        let mut blocks = input.chunks_exact(carriers);
        let mut frames = self.staging.chunks_exact_mut(spacing);
        loop {
            let mut staged = 0;
            for block in blocks.by_ref().take(batch) {
                self.layout.scatter(block, self.engine.input_frame(staged));
                staged += 1;
            }
            if staged == 0 {
                break;
            }

            if let Err(err) = self.engine.execute() {
                log::warn!("transform failed, output discarded: {}", err);
                return Err(err);
            }

            for (index, frame) in frames.by_ref().take(staged).enumerate() {
                frame.copy_from_slice(self.engine.output_frame(index));
            }
        }

        std::mem::swap(output, &mut self.staging);
        Ok(out_len)
    }
}

fn validate(config: &GeneratorConfig) -> Result<CarrierLayout> {
    if config.symbols == 0 {
        return Err(GeneratorError::Configuration(
            "symbol count must be at least 1".to_string(),
        ));
    }
    let fits = |len: usize| {
        config
            .symbols
            .checked_mul(len)
            .and_then(|samples| samples.checked_mul(SAMPLE_BYTES))
            .is_some()
    };
    if !fits(config.carriers) || !fits(config.spacing) {
        return Err(GeneratorError::Configuration(format!(
            "{} symbols of {} bins overflow a buffer",
            config.symbols, config.spacing
        )));
    }
    if std::mem::size_of::<Complex32>() != SAMPLE_BYTES {
        return Err(GeneratorError::Configuration(format!(
            "complex sample is {} bytes, transform expects {}",
            std::mem::size_of::<Complex32>(),
            SAMPLE_BYTES
        )));
    }
    CarrierLayout::new(config.carriers, config.spacing, config.direction)
}
