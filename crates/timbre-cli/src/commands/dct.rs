//! Discrete cosine and sine transforms of a list of values.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use timbre_analysis::{TrigKind, TrigTransform, TrigType};
use timbre_io::read_wav;

#[derive(Args)]
pub struct DctArgs {
    /// Values to transform
    #[arg(value_name = "VALUES", allow_negative_numbers = true, num_args = 0..)]
    values: Vec<f64>,

    /// Transform type (1-4)
    #[arg(
        short = 't',
        long = "type",
        default_value = "2",
        value_parser = clap::value_parser!(u8).range(1..=4)
    )]
    ty: u8,

    /// Use the sine transform instead of the cosine transform
    #[arg(long)]
    sine: bool,

    /// Apply the inverse transform
    #[arg(long)]
    inverse: bool,

    /// Take the values from the start of a WAV file instead
    #[arg(long, conflicts_with = "values")]
    input: Option<PathBuf>,

    /// Number of samples to take from --input
    #[arg(long, default_value = "32")]
    length: usize,

    /// Write the coefficients as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: DctArgs) -> anyhow::Result<()> {
    let values = match &args.input {
        Some(path) => {
            let (mut samples, _) =
                read_wav(path).with_context(|| format!("reading {}", path.display()))?;
            samples.truncate(args.length);
            samples
        }
        None => args.values.clone(),
    };
    if values.is_empty() {
        anyhow::bail!("no values to transform");
    }

    let Some(mut ty) = TrigType::from_number(args.ty) else {
        anyhow::bail!("transform type must be 1-4, got {}", args.ty);
    };
    if args.inverse {
        ty = ty.inverse();
    }
    let kind = if args.sine {
        TrigKind::Sine
    } else {
        TrigKind::Cosine
    };
    tracing::info!(?kind, %ty, len = values.len(), "trigonometric transform");

    let transform = TrigTransform::new(kind, ty, values.len())?;
    let coefficients = transform.process(&values)?;

    let name = match kind {
        TrigKind::Cosine => "DCT",
        TrigKind::Sine => "DST",
    };
    println!("{name}-{ty} of {} values:", values.len());
    for (k, c) in coefficients.iter().enumerate() {
        println!("  {k:>4} {c:>14.6}");
    }

    if let Some(path) = args.output {
        let json = serde_json::json!({
            "transform": format!("{name}-{ty}"),
            "input": values,
            "coefficients": coefficients,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
