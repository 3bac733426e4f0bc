use card_filter::Source;
use clap::{Parser, ValueEnum};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Parser, Debug)]
#[clap(name = "cardq", about = "Run a card filter against a catalog")]
pub struct Cli {
    /// Catalog document (JSON).
    #[clap(long, short)]
    pub catalog: PathBuf,
    /// Entities to search. Defaults to the first kind the filter applies to.
    #[clap(long, value_enum)]
    pub universe: Option<Universe>,
    /// Search the physical cards held by this card set.
    #[clap(long, conflicts_with = "universe")]
    pub card_set: Option<String>,
    /// Fill a `$variable` slot, e.g. `--var clan=Ventrue,Toreador`.
    #[clap(long = "var", value_name = "NAME=VALUES", value_parser = parse_binding)]
    pub vars: Vec<(String, Vec<String>)>,
    /// Skip values that name nothing in the catalog instead of failing.
    #[clap(long)]
    pub lenient: bool,
    /// Sort results by name instead of catalog order.
    #[clap(long)]
    pub sort: bool,
    /// Print the editing widgets for the filter instead of running it.
    #[clap(long)]
    pub widgets: bool,
    #[clap(long)]
    pub json: bool,
    /// Filter text; empty matches everything.
    #[clap(default_value = "")]
    pub filter: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Universe {
    Cards,
    PhysicalCards,
    CardSets,
}

impl From<Universe> for Source {
    fn from(universe: Universe) -> Self {
        match universe {
            Universe::Cards => Source::Cards,
            Universe::PhysicalCards => Source::PhysicalCards,
            Universe::CardSets => Source::CardSets,
        }
    }
}

impl Cli {
    pub fn bindings(&self) -> BTreeMap<String, Vec<String>> {
        self.vars.iter().cloned().collect()
    }
}

fn parse_binding(arg: &str) -> Result<(String, Vec<String>), String> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUES, got `{arg}`"))?;
    let name = name.trim();
    if name.is_empty() || name == "$" {
        return Err(format!("missing variable name in `{arg}`"));
    }
    let name = if name.starts_with('$') {
        name.to_string()
    } else {
        format!("${name}")
    };
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name, values))
}
