pub mod engine;
pub mod error;
pub mod generator;
pub mod layout;
pub mod wire;

pub use engine::{Backend, TransformEngine};
pub use error::{GeneratorError, Result};
pub use generator::{FrameFormat, GeneratorConfig, OfdmGenerator};
pub use layout::{CarrierLayout, Direction};
pub use rustfft::num_complex::Complex32;
