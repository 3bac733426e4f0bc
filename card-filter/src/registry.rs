use crate::{Attribute, Catalog, EntityKinds, IntAttribute, SetTextField, TextField};
use filter_syntax::{DomainSource, KeywordTable, ValueDomain};
use hashbrown::HashMap;
use std::fmt;

/// A queryable attribute, as named in filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Attribute(Attribute),
    Integer(IntAttribute),
    Text(TextField),
    /// Printed expansion of an owned copy.
    PhysicalExpansion,
    /// Membership in a card set.
    CardSet,
    /// Card sets whose parent is one of the given sets.
    ParentCardSet,
    CardSetText(SetTextField),
}

/// How literal values of a filter type are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Enumerated,
    Integer,
    FreeText,
}

impl FilterType {
    pub fn all() -> impl Iterator<Item = FilterType> {
        Attribute::ALL
            .into_iter()
            .map(FilterType::Attribute)
            .chain(IntAttribute::ALL.into_iter().map(FilterType::Integer))
            .chain([
                FilterType::Text(TextField::Name),
                FilterType::Text(TextField::Text),
                FilterType::PhysicalExpansion,
                FilterType::CardSet,
                FilterType::ParentCardSet,
                FilterType::CardSetText(SetTextField::Name),
                FilterType::CardSetText(SetTextField::Author),
                FilterType::CardSetText(SetTextField::Description),
            ])
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterType::Attribute(attribute) => attribute.name(),
            FilterType::Integer(attribute) => attribute.name(),
            FilterType::Text(field) => field.name(),
            FilterType::PhysicalExpansion => "PhysicalExpansion",
            FilterType::CardSet => "CardSet",
            FilterType::ParentCardSet => "ParentCardSet",
            FilterType::CardSetText(field) => field.name(),
        }
    }

    pub fn kinds(self) -> EntityKinds {
        match self {
            FilterType::Attribute(_)
            | FilterType::Integer(_)
            | FilterType::Text(_)
            | FilterType::CardSet => EntityKinds::CARD_ATTRIBUTE,
            FilterType::PhysicalExpansion => EntityKinds::PHYSICAL_CARD,
            FilterType::ParentCardSet | FilterType::CardSetText(_) => EntityKinds::CARD_SET,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            FilterType::Attribute(_)
            | FilterType::PhysicalExpansion
            | FilterType::CardSet
            | FilterType::ParentCardSet => ValueKind::Enumerated,
            FilterType::Integer(_) => ValueKind::Integer,
            FilterType::Text(_) | FilterType::CardSetText(_) => ValueKind::FreeText,
        }
    }

    fn domain(self, catalog: &Catalog) -> ValueDomain {
        match self {
            FilterType::Attribute(attribute) => ValueDomain::Choices(catalog.domain(attribute)),
            FilterType::Integer(attribute) => ValueDomain::Choices(
                catalog
                    .int_domain(attribute)
                    .into_iter()
                    .map(|value| value.to_string())
                    .collect(),
            ),
            FilterType::PhysicalExpansion => {
                ValueDomain::Choices(catalog.domain(Attribute::Expansion))
            }
            FilterType::CardSet | FilterType::ParentCardSet => {
                ValueDomain::Choices(catalog.card_set_names())
            }
            FilterType::Text(_) | FilterType::CardSetText(_) => ValueDomain::FreeText,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filter-type names, their value domains, and the keyword table the lexer
/// classifies with. Built once per catalog and read-only afterwards.
#[derive(Debug, Clone)]
pub struct FilterTypeRegistry {
    types: HashMap<&'static str, FilterType>,
    domains: HashMap<FilterType, ValueDomain>,
    keywords: KeywordTable,
}

impl FilterTypeRegistry {
    pub fn new(catalog: &Catalog) -> Self {
        let types: HashMap<&'static str, FilterType> = FilterType::all()
            .map(|filter_type| (filter_type.name(), filter_type))
            .collect();
        let domains = FilterType::all()
            .map(|filter_type| (filter_type, filter_type.domain(catalog)))
            .collect();
        let keywords = KeywordTable::new(types.keys().copied());
        Self {
            types,
            domains,
            keywords,
        }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn get(&self, name: &str) -> Option<FilterType> {
        self.types.get(name).copied()
    }

    /// Registered filter types in name order.
    pub fn filter_types(&self) -> impl Iterator<Item = FilterType> + '_ {
        self.keywords
            .filter_types()
            .filter_map(|name| self.types.get(name).copied())
    }

    pub fn value_domain(&self, filter_type: FilterType) -> ValueDomain {
        self.domains
            .get(&filter_type)
            .cloned()
            .unwrap_or(ValueDomain::FreeText)
    }
}

impl DomainSource for FilterTypeRegistry {
    fn domain(&self, filter_type: &str) -> ValueDomain {
        self.get(filter_type)
            .map_or(ValueDomain::FreeText, |filter_type| {
                self.value_domain(filter_type)
            })
    }
}
