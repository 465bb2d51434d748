//! Unit tests for the clap adapter.

use anyhow::{Result, anyhow, ensure};
use clap::ArgAction;
use rstest::{fixture, rstest};

use super::Engine;
use crate::{ArgEnum, ArgType, ArgsError, Record, build_definitions, is_display_request};

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[schemargs(crate = "crate")]
enum Mode {
    Fast,
    Slow,
}

/// Copies files.
#[derive(Record, Debug, PartialEq)]
#[schemargs(crate = "crate")]
struct Transfer {
    /// Number of workers.
    workers: u8,
    #[schemargs(default = Mode::Fast)]
    mode: Mode,
    #[schemargs(default = false)]
    dry_run: bool,
    #[schemargs(default = vec![String::from("*.rs")])]
    patterns: Vec<String>,
    size: Option<(u32, u32)>,
}

#[fixture]
fn engine() -> Engine {
    let definitions = match build_definitions::<Transfer>() {
        Ok(definitions) => definitions,
        Err(err) => panic!("schema should build: {err}"),
    };
    Engine::new(definitions, "copy", None)
}

fn parse(engine: &mut Engine, tokens: &[&str]) -> Result<Transfer, ArgsError> {
    let value = engine.parse(tokens.iter().copied())?;
    Ok(Transfer::from_arg_value(value)?)
}

#[rstest]
fn command_mirrors_definitions(engine: Engine) -> Result<()> {
    let cmd = engine.command();
    ensure!(cmd.get_about().map(ToString::to_string).as_deref() == Some("Copies files."));
    let dry_run = cmd
        .get_arguments()
        .find(|arg| arg.get_id() == "dry_run")
        .ok_or_else(|| anyhow!("missing dry_run"))?;
    ensure!(dry_run.get_long() == Some("dry-run"));
    ensure!(matches!(dry_run.get_action(), ArgAction::SetTrue));
    let workers = cmd
        .get_arguments()
        .find(|arg| arg.get_id() == "workers")
        .ok_or_else(|| anyhow!("missing workers"))?;
    ensure!(workers.is_required_set());
    Ok(())
}

#[rstest]
fn explicit_description_wins() -> Result<()> {
    let engine = Engine::new(build_definitions::<Transfer>()?, "copy", Some("Override."));
    ensure!(engine.command().get_about().map(ToString::to_string).as_deref() == Some("Override."));
    Ok(())
}

#[rstest]
fn parses_defaults_and_overrides(mut engine: Engine) -> Result<()> {
    let defaults = parse(&mut engine, &["--workers", "2"])?;
    ensure!(
        defaults
            == Transfer {
                workers: 2,
                mode: Mode::Fast,
                dry_run: false,
                patterns: vec!["*.rs".into()],
                size: None,
            }
    );
    let custom = parse(
        &mut engine,
        &[
            "--workers", "3", "--mode", "Slow", "--dry-run", "--patterns", "a", "b", "--size",
            "640", "480",
        ],
    )?;
    ensure!(custom.mode == Mode::Slow && custom.dry_run);
    ensure!(custom.patterns == ["a", "b"]);
    ensure!(custom.size == Some((640, 480)));
    Ok(())
}

#[rstest]
fn engine_can_parse_repeatedly(mut engine: Engine) -> Result<()> {
    ensure!(parse(&mut engine, &["--workers", "1"])?.workers == 1);
    ensure!(parse(&mut engine, &["--workers", "9"])?.workers == 9);
    Ok(())
}

#[rstest]
fn conversion_failures_carry_the_flag(mut engine: Engine) -> Result<()> {
    match parse(&mut engine, &["--workers", "many"]) {
        Err(ArgsError::Conversion { flag, value, source, .. }) => {
            ensure!(flag == "--workers" && value == "many");
            ensure!(source.kind() == clap::error::ErrorKind::ValueValidation);
            Ok(())
        }
        other => Err(anyhow!("expected a conversion error, got {other:?}")),
    }
}

#[rstest]
#[case::bad_choice(&["--workers", "1", "--mode", "Medium"])]
fn rejected_choices_are_reported(mut engine: Engine, #[case] tokens: &[&str]) {
    assert!(matches!(
        parse(&mut engine, tokens),
        Err(ArgsError::InvalidChoice { ref value, .. }) if value == "Medium"
    ));
}

#[rstest]
fn missing_required_flags_are_reported(mut engine: Engine) {
    assert!(matches!(
        parse(&mut engine, &[]),
        Err(ArgsError::MissingRequired { ref flag, .. }) if flag.contains("--workers")
    ));
}

#[rstest]
fn help_is_a_display_request(mut engine: Engine) -> Result<()> {
    let Err(ArgsError::Usage(err)) = parse(&mut engine, &["--help"]) else {
        return Err(anyhow!("expected --help to stop parsing"));
    };
    ensure!(is_display_request(&err));
    let rendered = err.to_string();
    ensure!(rendered.contains("Number of workers."), "{rendered}");
    ensure!(rendered.contains("(default: Fast)"), "{rendered}");
    ensure!(rendered.contains("(default: '*.rs')"), "{rendered}");
    Ok(())
}

#[rstest]
fn negative_numbers_are_values() -> Result<()> {
    #[derive(Record, Debug)]
    #[schemargs(crate = "crate")]
    struct Offset {
        delta: i64,
    }
    let mut engine = Engine::new(build_definitions::<Offset>()?, "offset", None);
    let value = engine.parse(["--delta", "-5"])?;
    ensure!(Offset::from_arg_value(value)?.delta == -5);
    Ok(())
}
