use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use log::LevelFilter;

use reactive_mc::model;
use reactive_mc::model::ast::PropertyKind;
use reactive_mc::persistence::PersistenceMode;
use reactive_mc::verify::{CheckOptions, Composition, ReactiveVerifier, Verdict};

#[derive(Debug, Parser)]
#[command(author, version, about = "Check reactive properties `G F f -> G F g` of a model")]
struct Cli {
    /// Model file.
    #[arg(value_name = "FILE")]
    model: PathBuf,

    /// How to decide that `!g` can persist forever.
    #[arg(long, value_enum, default_value_t = PersistenceArg::Iterated)]
    persistence: PersistenceArg,

    /// How to combine the recurrence and persistence checks.
    #[arg(long, value_enum, default_value_t = CompositionArg::Independent)]
    composition: CompositionArg,

    /// More logging (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PersistenceArg {
    /// Greatest fixpoint inside the `!g` states.
    Iterated,
    /// Every `!g` state has a `!g` successor.
    SingleStep,
}

impl From<PersistenceArg> for PersistenceMode {
    fn from(arg: PersistenceArg) -> Self {
        match arg {
            PersistenceArg::Iterated => PersistenceMode::Iterated,
            PersistenceArg::SingleStep => PersistenceMode::SingleStep,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CompositionArg {
    /// Recurrence and persistence on possibly different executions.
    Independent,
    /// Both on one execution (fair cycle search).
    Joint,
}

impl From<CompositionArg> for Composition {
    fn from(arg: CompositionArg) -> Self {
        match arg {
            CompositionArg::Independent => Composition::Independent,
            CompositionArg::Joint => Composition::Joint,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            e.print()?;
            std::process::exit(1);
        }
    };

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let model = model::load(&cli.model)?;
    let options = CheckOptions {
        persistence: cli.persistence.into(),
        composition: cli.composition.into(),
    };
    let verifier = ReactiveVerifier::new(&model.fsm).with_options(options);

    for property in &model.properties {
        println!("{} {}", property.kind, property.text);
        let verdict = match (&property.kind, &property.formula) {
            (PropertyKind::Ltl, Some(formula)) => verifier.verify(formula)?,
            _ => Verdict::NotApplicable,
        };
        match verdict {
            Verdict::NotApplicable => println!("  not applicable"),
            Verdict::Holds => println!("  holds"),
            Verdict::Violated { counterexample } => {
                println!("  violated");
                match counterexample {
                    Some(trace) => print!("{}", trace),
                    None => println!("  no counterexample available"),
                }
            }
        }
    }

    Ok(())
}
