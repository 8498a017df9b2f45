mod stream;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ofdmgen_modem::wire::Endianness;
use ofdmgen_modem::{Backend, Direction, GeneratorConfig, OfdmGenerator};

#[derive(Parser, Debug)]
#[command(name = "ofdmgen", about = "Generate OFDM time-domain symbols from carrier blocks")]
struct Args {
    /// Symbol blocks per frame.
    #[arg(long)]
    symbols: usize,

    /// Occupied carriers per symbol.
    #[arg(long)]
    carriers: usize,

    /// Transform size per symbol.
    #[arg(long)]
    spacing: usize,

    #[arg(long, value_enum, default_value_t = DirectionArg::Inverse)]
    direction: DirectionArg,

    #[arg(long, value_enum, default_value_t = BackendArg::Software)]
    backend: BackendArg,

    /// Byte order of the input samples.
    #[arg(long, value_enum, default_value_t = OrderArg::Little)]
    input_order: OrderArg,

    /// Byte order of the output samples.
    #[arg(long, value_enum, default_value_t = OrderArg::Little)]
    output_order: OrderArg,

    /// Log level (error, warn, info, debug, trace). Falls back to RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Interleaved f32 carrier values.
    input: PathBuf,

    /// Interleaved f32 time-domain samples.
    output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Inverse,
    Forward,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Software,
    Accelerated,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Little,
    Big,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Inverse => Direction::Inverse,
            DirectionArg::Forward => Direction::Forward,
        }
    }
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Software => Backend::Software,
            BackendArg::Accelerated => Backend::Accelerated,
        }
    }
}

impl From<OrderArg> for Endianness {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Little => Endianness::Little,
            OrderArg::Big => Endianness::Big,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if let Some(level) = args.log_level.as_deref() {
        let level: log::LevelFilter = level
            .parse()
            .map_err(|_| format!("unknown log level: {}", level))?;
        logger.filter_level(level);
    }
    logger.init();

    let config = GeneratorConfig::new(args.symbols, args.carriers, args.spacing)
        .direction(args.direction.into())
        .backend(args.backend.into());
    let mut generator = OfdmGenerator::new(config)?;
    log::info!(
        "{} backend, {} -> {} samples per frame",
        generator.backend(),
        generator.format().input_samples,
        generator.format().output_samples
    );

    let mut reader = BufReader::new(File::open(&args.input)?);
    let mut writer = BufWriter::new(File::create(&args.output)?);
    stream::run(
        &mut generator,
        &mut reader,
        &mut writer,
        args.input_order.into(),
        args.output_order.into(),
    )?;
    Ok(())
}
