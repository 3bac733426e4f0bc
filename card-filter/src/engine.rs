use crate::{
    BuildOptions, BuiltPredicate, CardSetId, Catalog, FilterError, FilterTypeRegistry, LookupCache,
    Matches, Predicate, PredicateBuilder, Source, executor,
};
use filter_syntax::{Node, Widget, parse_filter, parse_widgets};
use tracing::info;

/// Catalog, registry, and lookup cache wired together for the usual
/// text-to-matches path.
#[derive(Debug)]
pub struct FilterEngine {
    catalog: Catalog,
    registry: FilterTypeRegistry,
    lookup: LookupCache,
}

impl FilterEngine {
    pub fn new(catalog: Catalog) -> Self {
        let registry = FilterTypeRegistry::new(&catalog);
        Self {
            catalog,
            registry,
            lookup: LookupCache::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &FilterTypeRegistry {
        &self.registry
    }

    pub fn lookup(&self) -> &LookupCache {
        &self.lookup
    }

    /// Swaps in a freshly loaded catalog: rebuilds the registry and flushes
    /// the lookup cache.
    pub fn reload(&mut self, catalog: Catalog) {
        info!(
            from = self.catalog.generation(),
            to = catalog.generation(),
            "reloading catalog"
        );
        self.registry = FilterTypeRegistry::new(&catalog);
        self.catalog = catalog;
        self.lookup.invalidate();
    }

    pub fn parse(&self, text: &str) -> Result<Node, FilterError> {
        Ok(parse_filter(text, self.registry.keywords())?)
    }

    /// Widget descriptors for editing `text` interactively.
    pub fn widgets(&self, text: &str) -> Result<Vec<Widget>, FilterError> {
        Ok(parse_widgets(text, self.registry.keywords(), &self.registry)?)
    }

    pub fn build(
        &mut self,
        node: &Node,
        options: BuildOptions,
    ) -> Result<BuiltPredicate, FilterError> {
        PredicateBuilder::new(&self.catalog, &self.registry, &mut self.lookup)
            .options(options)
            .build(node)
    }

    pub fn compile(
        &mut self,
        text: &str,
        options: BuildOptions,
    ) -> Result<BuiltPredicate, FilterError> {
        let node = self.parse(text)?;
        self.build(&node, options)
    }

    /// Looks up a card set by name the way a `CardSet = "..."` filter does.
    pub fn resolve_card_set(&mut self, name: &str) -> Result<CardSetId, FilterError> {
        self.lookup.resolve_card_set(&self.catalog, "CardSet", name)
    }

    /// Evaluates `predicate`, over its default universe when `source` is
    /// `None`.
    pub fn execute(
        &self,
        predicate: &Predicate,
        source: Option<Source>,
    ) -> Result<Matches, FilterError> {
        let source = match source {
            Some(source) => source,
            None => Source::default_for(predicate.kinds()).ok_or(FilterError::NoApplicableKind)?,
        };
        executor::execute(&self.catalog, predicate, source)
    }

    /// Parses, builds strictly, and evaluates in one step.
    pub fn run(&mut self, text: &str, source: Option<Source>) -> Result<Matches, FilterError> {
        let built = self.compile(text, BuildOptions::strict())?;
        self.execute(&built.predicate, source)
    }
}
