//! Configures a toy training run from the command line.
//!
//! Try `cargo run -p schemargs --example trainer -- --help`, or:
//!
//! ```text
//! cargo run -p schemargs --example trainer -- --data ./set \
//!     --optimizer.lr 0.1 --layers 64 32 --no-shuffle
//! ```

use std::path::PathBuf;

use schemargs::{ArgEnum, Final, Record};

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Sgd,
    Adam,
}

/// Optimiser settings.
#[derive(Record, Debug)]
struct Optimizer {
    /// Algorithm to use.
    #[schemargs(default = Kind::Adam)]
    kind: Kind,
    /// Learning rate.
    #[schemargs(default = 0.001)]
    lr: f64,
    /// Decay factors for the moment estimates.
    #[schemargs(default = (0.9, 0.999))]
    betas: (f32, f32),
}

fn default_layers() -> Vec<u32> {
    vec![128, 64]
}

/// Train a small model.
#[derive(Record, Debug)]
struct Train {
    /// Directory holding the dataset.
    data: PathBuf,
    /// Hidden layer widths.
    #[schemargs(default_factory = default_layers)]
    layers: Vec<u32>,
    /// Passes over the data.
    #[schemargs(default = Final::new(10), label = "epochs")]
    epochs: Final<u16>,
    /// Logging verbosity.
    #[schemargs(literal(0, 1, 2), default = 1)]
    verbosity: u8,
    /// Shuffle the data between epochs.
    #[schemargs(default = true)]
    shuffle: bool,
    /// Seed for reproducible runs.
    seed: Option<u64>,
    optimizer: Optimizer,
}

#[expect(clippy::print_stdout, reason = "the demo reports the parsed record")]
fn main() {
    let train: Train = schemargs::parse();
    println!("{train:#?}");
}
