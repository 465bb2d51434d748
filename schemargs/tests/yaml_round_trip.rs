//! Writing parsed records to YAML and reading them back.
#![cfg(feature = "yaml")]

use std::path::PathBuf;

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use schemargs::{ArgEnum, Final, Record, from_yaml, to_yaml, try_parse_from};

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Constant,
    Cosine,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Optimizer {
    lr: f32,
    #[schemargs(default = Schedule::Constant)]
    schedule: Schedule,
    betas: (f64, f64),
    warmup: Option<u32>,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Experiment {
    name: String,
    output: PathBuf,
    #[schemargs(literal(16, 32, 64))]
    batch: u16,
    tags: Vec<String>,
    #[schemargs(default = Final::new(3))]
    seeds: Final<u8>,
    optimizer: Optimizer,
    #[schemargs(skip)]
    cache: Option<String>,
}

#[fixture]
fn experiment() -> Experiment {
    Experiment {
        name: String::from("baseline: v2"),
        output: PathBuf::from("/tmp/runs/a b"),
        batch: 32,
        tags: vec![String::from("nightly"), String::new()],
        seeds: Final::new(3),
        optimizer: Optimizer {
            lr: 0.1,
            schedule: Schedule::Cosine,
            betas: (0.9, 0.999),
            warmup: None,
        },
        cache: None,
    }
}

#[rstest]
fn instances_survive_a_yaml_round_trip(experiment: Experiment) -> Result<()> {
    let text = to_yaml(&experiment)?;
    ensure!(text.starts_with("# YAML generated via schemargs."), "{text}");
    ensure!(text.contains("Cosine"), "{text}");
    let restored: Experiment = from_yaml(&text)?;
    ensure!(restored == experiment, "{restored:?}\n{text}");
    Ok(())
}

#[rstest]
fn parsed_records_round_trip(experiment: Experiment) -> Result<()> {
    let parsed: Experiment = try_parse_from(
        [
            "--name",
            "baseline: v2",
            "--output",
            "/tmp/runs/a b",
            "--batch",
            "32",
            "--tags",
            "nightly",
            "",
            "--optimizer.lr",
            "0.1",
            "--optimizer.schedule",
            "Cosine",
            "--optimizer.betas",
            "0.9",
            "0.999",
        ],
        None,
    )?;
    ensure!(parsed == experiment, "{parsed:?}");
    let restored: Experiment = from_yaml(&to_yaml(&parsed)?)?;
    ensure!(restored == parsed, "{restored:?}");
    Ok(())
}

#[rstest]
fn hand_written_documents_use_defaults() -> Result<()> {
    let text = "
name: short
output: out
batch: 64
tags: []
optimizer:
  lr: 0.5
  betas: [0.8, 0.9]
";
    let restored: Experiment = from_yaml(text)?;
    ensure!(restored.batch == 64 && *restored.seeds == 3);
    ensure!(restored.optimizer.schedule == Schedule::Constant);
    ensure!(restored.optimizer.warmup.is_none());
    Ok(())
}
