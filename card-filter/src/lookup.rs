use crate::{Attribute, CardSetId, Catalog, FilterError};
use hashbrown::HashMap;
use tracing::{debug, warn};

/// Maps raw filter values (`"dom"`, `"AH"`, `"ventrue"`) to canonical catalog
/// names, filled lazily one attribute at a time.
///
/// The cache does not watch the catalog. Whoever reloads the catalog must call
/// [`LookupCache::invalidate`]; until then lookups answer from the catalog the
/// tables were built from and a warning is logged.
#[derive(Debug, Default)]
pub struct LookupCache {
    generation: Option<u64>,
    warned_generation: Option<u64>,
    names: HashMap<Attribute, HashMap<String, String>>,
    card_sets: Option<HashMap<String, CardSetId>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every table. The next lookup repopulates from the catalog it is
    /// given.
    pub fn invalidate(&mut self) {
        debug!(generation = ?self.generation, "lookup cache invalidated");
        *self = Self::default();
    }

    pub fn is_populated(&self) -> bool {
        self.generation.is_some()
    }

    /// Generation of the catalog the tables were built from.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Resolves `value` to the canonical name of an `attribute` entity.
    /// Names and aliases match case-insensitively, but only in full.
    pub fn resolve(
        &mut self,
        catalog: &Catalog,
        attribute: Attribute,
        value: &str,
    ) -> Result<String, FilterError> {
        self.check_generation(catalog);
        let table = self.names.entry(attribute).or_insert_with(|| {
            let mut table = HashMap::new();
            for entity in catalog.vocabulary(attribute) {
                for key in std::iter::once(&entity.name).chain(&entity.aliases) {
                    table.insert(key.to_lowercase(), entity.name.clone());
                }
            }
            debug!(%attribute, entries = table.len(), "lookup table populated");
            table
        });
        table
            .get(&value.to_lowercase())
            .cloned()
            .ok_or_else(|| FilterError::Unresolved {
                filter_type: attribute.name().to_string(),
                value: value.to_string(),
            })
    }

    /// Resolves a card-set name, ignoring case.
    pub fn resolve_card_set(
        &mut self,
        catalog: &Catalog,
        filter_type: &str,
        name: &str,
    ) -> Result<CardSetId, FilterError> {
        self.check_generation(catalog);
        let table = self.card_sets.get_or_insert_with(|| {
            catalog
                .card_sets()
                .map(|(id, set)| (set.name.to_lowercase(), id))
                .collect()
        });
        table
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| FilterError::Unresolved {
                filter_type: filter_type.to_string(),
                value: name.to_string(),
            })
    }

    fn check_generation(&mut self, catalog: &Catalog) {
        let current = catalog.generation();
        match self.generation {
            None => self.generation = Some(current),
            Some(filled) if filled != current => {
                if self.warned_generation != Some(current) {
                    warn!(
                        filled,
                        current, "lookup cache is stale; invalidate it after reloading the catalog"
                    );
                    self.warned_generation = Some(current);
                }
            }
            Some(_) => {}
        }
    }
}
