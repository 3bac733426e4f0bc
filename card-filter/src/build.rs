use crate::{
    Attribute, Catalog, FilterError, FilterType, FilterTypeRegistry, LookupCache, Pattern,
    Predicate,
};
use filter_syntax::{BoolOp, Node};
use hashbrown::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Skip values that do not resolve instead of failing. Skipped values are
    /// reported in [`BuiltPredicate::unresolved`].
    pub skip_unresolved: bool,
}

impl BuildOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            skip_unresolved: true,
        }
    }
}

#[derive(Debug)]
pub struct BuiltPredicate {
    pub predicate: Predicate,
    /// Values skipped in lenient mode, each as an [`FilterError::Unresolved`].
    pub unresolved: Vec<FilterError>,
}

/// Turns a parsed filter tree into a [`Predicate`], resolving every literal
/// through the lookup cache.
pub struct PredicateBuilder<'a> {
    catalog: &'a Catalog,
    registry: &'a FilterTypeRegistry,
    lookup: &'a mut LookupCache,
    options: BuildOptions,
    unresolved: Vec<FilterError>,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(
        catalog: &'a Catalog,
        registry: &'a FilterTypeRegistry,
        lookup: &'a mut LookupCache,
    ) -> Self {
        Self {
            catalog,
            registry,
            lookup,
            options: BuildOptions::default(),
            unresolved: Vec::new(),
        }
    }

    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(mut self, node: &Node) -> Result<BuiltPredicate, FilterError> {
        let predicate = self.node(node)?;
        debug!(
            kinds = %predicate.kinds(),
            unresolved = self.unresolved.len(),
            "built predicate"
        );
        Ok(BuiltPredicate {
            predicate,
            unresolved: self.unresolved,
        })
    }

    fn node(&mut self, node: &Node) -> Result<Predicate, FilterError> {
        match node {
            Node::Filter(None) => Ok(Predicate::Everything),
            Node::Filter(Some(inner)) => self.node(inner),
            Node::BinOp { left, op, right } => {
                let left = self.node(left)?;
                let right = self.node(right)?;
                match op {
                    BoolOp::And => left.and(right),
                    BoolOp::Or => left.or(right),
                }
            }
            Node::Not(inner) => Ok(self.node(inner)?.not()),
            Node::FilterPart {
                filter_type,
                values: Some(values),
                ..
            } => {
                let filter_type = self
                    .registry
                    .get(filter_type)
                    .ok_or_else(|| FilterError::UnknownFilterType(filter_type.clone()))?;
                self.filter_part(filter_type, values)
            }
            Node::FilterPart {
                filter_type,
                values: None,
                variable,
            } => Err(FilterError::UnboundVariable {
                filter_type: filter_type.clone(),
                variable: variable.clone().unwrap_or_else(|| "$".to_string()),
            }),
            other => Err(FilterError::MalformedTree(format!("{other:?}"))),
        }
    }

    fn filter_part(
        &mut self,
        filter_type: FilterType,
        values: &[Node],
    ) -> Result<Predicate, FilterError> {
        let texts = values
            .iter()
            .map(literal_text)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match filter_type {
            FilterType::Attribute(attribute) => Predicate::Attribute {
                attribute,
                values: self.resolve_all(&texts, |builder, text| {
                    builder.lookup.resolve(builder.catalog, attribute, text)
                })?,
            },
            FilterType::PhysicalExpansion => {
                Predicate::PhysicalExpansion(self.resolve_all(&texts, |builder, text| {
                    builder
                        .lookup
                        .resolve(builder.catalog, Attribute::Expansion, text)
                })?)
            }
            FilterType::Integer(attribute) => Predicate::Integer {
                attribute,
                values: self.resolve_all(&texts, |_, text| {
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| FilterError::Unresolved {
                            filter_type: attribute.name().to_string(),
                            value: text.to_string(),
                        })
                })?,
            },
            FilterType::CardSet => Predicate::InCardSet(self.resolve_all(&texts, |builder, text| {
                builder
                    .lookup
                    .resolve_card_set(builder.catalog, "CardSet", text)
            })?),
            FilterType::ParentCardSet => {
                Predicate::ParentCardSet(self.resolve_all(&texts, |builder, text| {
                    builder
                        .lookup
                        .resolve_card_set(builder.catalog, "ParentCardSet", text)
                })?)
            }
            FilterType::Text(field) => Predicate::Text {
                field,
                pattern: Pattern::new(texts)?,
            },
            FilterType::CardSetText(field) => Predicate::CardSetText {
                field,
                pattern: Pattern::new(texts)?,
            },
        })
    }

    /// Resolves each value, collecting the results. In lenient mode values
    /// that do not resolve are logged, recorded, and left out.
    fn resolve_all<T, F>(&mut self, texts: &[String], mut resolve: F) -> Result<HashSet<T>, FilterError>
    where
        T: Eq + std::hash::Hash,
        F: FnMut(&mut Self, &str) -> Result<T, FilterError>,
    {
        let mut resolved = HashSet::with_capacity(texts.len());
        for text in texts {
            match resolve(self, text) {
                Ok(value) => {
                    resolved.insert(value);
                }
                Err(err) if self.options.skip_unresolved && err.is_unresolved() => {
                    warn!("skipping filter value: {err}");
                    self.unresolved.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(resolved)
    }
}

fn literal_text(node: &Node) -> Result<String, FilterError> {
    match node {
        Node::StringLit(text) | Node::IdLit(text) => Ok(text.clone()),
        Node::IntLit(value) => Ok(value.to_string()),
        other => Err(FilterError::MalformedTree(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_syntax::parse_filter;

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"{
                "vocabulary": {
                    "Discipline": [{"name": "Dominate", "aliases": ["dom"]}]
                },
                "cards": [
                    {"name": "Anson", "card_types": ["Vampire"], "clans": ["Toreador"],
                     "disciplines": ["Dominate"], "group": 1},
                    {"name": "Aire of Elation", "card_types": ["Action Modifier"]},
                    {"name": "Akram", "card_types": ["Vampire"], "clans": ["Brujah"], "group": 2}
                ],
                "card_sets": [{"name": "Deck"}]
            }"#,
        )
        .unwrap()
    }

    fn build(text: &str, options: BuildOptions) -> Result<BuiltPredicate, FilterError> {
        let catalog = catalog();
        let registry = FilterTypeRegistry::new(&catalog);
        let mut lookup = LookupCache::new();
        let node = parse_filter(text, registry.keywords())?;
        PredicateBuilder::new(&catalog, &registry, &mut lookup)
            .options(options)
            .build(&node)
    }

    #[test]
    fn empty_filter_builds_the_identity() {
        let built = build("", BuildOptions::strict()).unwrap();
        assert!(matches!(built.predicate, Predicate::Everything));
    }

    #[test]
    fn values_are_canonicalized() {
        let built = build("Discipline = \"DOM\" AND Clan = \"toreador\"", BuildOptions::strict())
            .unwrap();
        let Predicate::And(left, right) = built.predicate else {
            panic!("expected And");
        };
        assert!(matches!(*left, Predicate::Attribute { ref values, .. } if values.contains("Dominate")));
        assert!(matches!(*right, Predicate::Attribute { ref values, .. } if values.contains("Toreador")));
    }

    #[test]
    fn strict_mode_fails_on_the_first_unknown_value() {
        let err = build("Clan = \"Toreador\", \"Foo\"", BuildOptions::strict()).unwrap_err();
        assert_eq!(err.to_string(), "no such Clan: Foo");
    }

    #[test]
    fn lenient_mode_skips_and_reports() {
        let built = build(
            "Clan = \"Foo\", \"Brujah\" OR CardSet = \"Nope\"",
            BuildOptions::lenient(),
        )
        .unwrap();
        let skipped: Vec<String> = built.unresolved.iter().map(ToString::to_string).collect();
        assert_eq!(skipped, ["no such Clan: Foo", "no such CardSet: Nope"]);
    }

    #[test]
    fn integer_values_accept_quoted_numbers() {
        let built = build("Group = 1, \"2\"", BuildOptions::strict()).unwrap();
        let Predicate::Integer { values, .. } = built.predicate else {
            panic!("expected Integer");
        };
        assert_eq!(values.len(), 2);

        let err = build("Group = \"one\"", BuildOptions::strict()).unwrap_err();
        assert!(err.is_unresolved());
    }

    #[test]
    fn unbound_variables_are_reported() {
        let err = build("Clan = $clan", BuildOptions::lenient()).unwrap_err();
        assert_eq!(err.to_string(), "no value bound for Clan = $clan");
    }

    #[test]
    fn incompatible_kinds_fail_at_build_time() {
        let err = build(
            "Clan = \"Brujah\" AND CardSetName = \"deck\"",
            BuildOptions::strict(),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidComposition { .. }));
    }

    #[test]
    fn hand_built_trees_are_checked() {
        let catalog = catalog();
        let registry = FilterTypeRegistry::new(&catalog);
        let mut lookup = LookupCache::new();
        let err = PredicateBuilder::new(&catalog, &registry, &mut lookup)
            .build(&Node::filter_part("Bogus", ["x"]))
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownFilterType(name) if name == "Bogus"));

        let err = PredicateBuilder::new(&catalog, &registry, &mut lookup)
            .build(&Node::IntLit(3))
            .unwrap_err();
        assert!(matches!(err, FilterError::MalformedTree(_)));
    }
}
