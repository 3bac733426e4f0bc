mod cli;

use anyhow::{Context, Result};
use card_filter::{BuildOptions, Catalog, FilterEngine, Source};
use clap::Parser;
use cli::Cli;
use filter_syntax::{Node, Widget};
use itertools::Itertools;
use serde::Serialize;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output<'a> {
    count: usize,
    names: Vec<&'a str>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let catalog = Catalog::load(&cli.catalog)?;
    let mut engine = FilterEngine::new(catalog);

    if cli.widgets {
        let widgets = engine.widgets(&cli.filter)?;
        println!("{}", render_widgets(&widgets));
        return Ok(());
    }

    let node = bound_filter(&engine, &cli)?;
    debug!(filter = %node, "bound filter");
    let options = if cli.lenient {
        BuildOptions::lenient()
    } else {
        BuildOptions::strict()
    };
    let built = engine.build(&node, options)?;
    for skipped in &built.unresolved {
        eprintln!("warning: {skipped}");
    }

    let source = source(&mut engine, &cli)?;
    let mut matches = engine.execute(&built.predicate, source)?;
    if cli.sort {
        matches.sort_by_name(engine.catalog());
    }

    let names = matches.names(engine.catalog());
    if cli.json {
        let output = Output {
            count: names.len(),
            names,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to encode results")?
        );
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn bound_filter(engine: &FilterEngine, cli: &Cli) -> Result<Node> {
    let template = engine.parse(&cli.filter)?;
    template
        .bind(&cli.bindings())
        .context("Invalid --var value")
}

fn source(engine: &mut FilterEngine, cli: &Cli) -> Result<Option<Source>> {
    Ok(match &cli.card_set {
        Some(name) => {
            let id = engine
                .resolve_card_set(name)
                .with_context(|| format!("Failed to select card set `{name}`"))?;
            Some(Source::CardSetContents(id))
        }
        None => cli.universe.map(Source::from),
    })
}

fn render_widgets(widgets: &[Widget]) -> String {
    widgets
        .iter()
        .map(|widget| match widget {
            Widget::Label(text) => text.clone(),
            Widget::TextEntry {
                filter_type,
                variable,
            } => format!("[{filter_type} {variable}: text]"),
            Widget::ChoiceList {
                filter_type,
                variable,
                choices,
            } => format!("[{filter_type} {variable}: {}]", choices.join(" | ")),
        })
        .join(" ")
}
