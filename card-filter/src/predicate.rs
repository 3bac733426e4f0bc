use crate::{
    AbstractCard, Attribute, CardSet, CardSetId, Catalog, EntityKinds, FilterError, IntAttribute,
    Pattern, SetTextField, TextField, kinds::Candidate,
};
use hashbrown::HashSet;

/// Composable boolean test over catalog entities.
///
/// Leaf predicates test one attribute against a set of already-resolved
/// values; a candidate matches when its values intersect that set. A
/// candidate with no value for the attribute does not match the leaf, so a
/// negated leaf does match it.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Identity filter: matches every candidate of every kind.
    Everything,
    Attribute {
        attribute: Attribute,
        values: HashSet<String>,
    },
    Integer {
        attribute: IntAttribute,
        values: HashSet<i64>,
    },
    Text {
        field: TextField,
        pattern: Pattern,
    },
    PhysicalExpansion(HashSet<String>),
    InCardSet(HashSet<CardSetId>),
    ParentCardSet(HashSet<CardSetId>),
    CardSetText {
        field: SetTextField,
        pattern: Pattern,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Entity kinds this predicate can be evaluated against. Combinators
    /// take the intersection of their children.
    pub fn kinds(&self) -> EntityKinds {
        match self {
            Predicate::Everything => EntityKinds::all(),
            Predicate::Attribute { .. }
            | Predicate::Integer { .. }
            | Predicate::Text { .. }
            | Predicate::InCardSet(_) => EntityKinds::CARD_ATTRIBUTE,
            Predicate::PhysicalExpansion(_) => EntityKinds::PHYSICAL_CARD,
            Predicate::ParentCardSet(_) | Predicate::CardSetText { .. } => EntityKinds::CARD_SET,
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.kinds() & right.kinds()
            }
            Predicate::Not(inner) => inner.kinds(),
        }
    }

    pub fn and(self, other: Predicate) -> Result<Predicate, FilterError> {
        match (self, other) {
            (Predicate::Everything, only) | (only, Predicate::Everything) => Ok(only),
            (left, right) => {
                check_overlap(&left, &right)?;
                Ok(Predicate::And(Box::new(left), Box::new(right)))
            }
        }
    }

    pub fn or(self, other: Predicate) -> Result<Predicate, FilterError> {
        check_overlap(&self, &other)?;
        Ok(Predicate::Or(Box::new(self), Box::new(other)))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        match self {
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    /// Whether the predicate names `id` anywhere. A cheap structural check
    /// used to decide if editing that set can change the match result.
    pub fn references_card_set(&self, id: CardSetId) -> bool {
        match self {
            Predicate::InCardSet(ids) | Predicate::ParentCardSet(ids) => ids.contains(&id),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.references_card_set(id) || right.references_card_set(id)
            }
            Predicate::Not(inner) => inner.references_card_set(id),
            _ => false,
        }
    }

    /// Tests one candidate. Candidates of a kind outside [`Self::kinds`] and
    /// ids not in `catalog` never match a leaf.
    pub fn matches(&self, catalog: &Catalog, candidate: impl Into<Candidate>) -> bool {
        self.matches_candidate(catalog, candidate.into())
    }

    fn matches_candidate(&self, catalog: &Catalog, candidate: Candidate) -> bool {
        match self {
            Predicate::Everything => true,
            Predicate::And(left, right) => {
                left.matches_candidate(catalog, candidate)
                    && right.matches_candidate(catalog, candidate)
            }
            Predicate::Or(left, right) => {
                left.matches_candidate(catalog, candidate)
                    || right.matches_candidate(catalog, candidate)
            }
            Predicate::Not(inner) => !inner.matches_candidate(catalog, candidate),
            leaf => match candidate {
                Candidate::Card(id) => catalog
                    .card(id)
                    .is_some_and(|card| leaf.matches_card(catalog, card, id.into())),
                Candidate::PhysicalCard(id) => catalog.physical_card(id).is_some_and(|physical| {
                    match leaf {
                        Predicate::PhysicalExpansion(expansions) => physical
                            .expansion
                            .as_ref()
                            .is_some_and(|expansion| expansions.contains(expansion)),
                        _ => catalog.card(physical.card).is_some_and(|card| {
                            leaf.matches_card(catalog, card, Holder::Owned(id))
                        }),
                    }
                }),
                Candidate::CardSet(id) => catalog
                    .card_set(id)
                    .is_some_and(|set| leaf.matches_card_set(set)),
            },
        }
    }

    fn matches_card(&self, catalog: &Catalog, card: &AbstractCard, holder: Holder) -> bool {
        match self {
            Predicate::Attribute { attribute, values } => {
                attribute.values(card).any(|value| values.contains(value))
            }
            Predicate::Integer { attribute, values } => attribute
                .value(card)
                .is_some_and(|value| values.contains(&value)),
            Predicate::Text { field, pattern } => pattern.is_match(field.value(card)),
            Predicate::InCardSet(ids) => ids.iter().any(|&id| {
                catalog.card_set(id).is_some_and(|set| match holder {
                    Holder::Card(card_id) => catalog
                        .copies_of(card_id)
                        .iter()
                        .any(|&copy| set.contains(copy)),
                    Holder::Owned(copy) => set.contains(copy),
                })
            }),
            _ => false,
        }
    }

    fn matches_card_set(&self, set: &CardSet) -> bool {
        match self {
            Predicate::ParentCardSet(ids) => set.parent.is_some_and(|parent| ids.contains(&parent)),
            Predicate::CardSetText { field, pattern } => pattern.is_match(field.value(set)),
            _ => false,
        }
    }
}

/// What a card-attribute leaf is looking at: the catalog card itself, or one
/// owned copy of it. Set membership differs between the two.
#[derive(Clone, Copy)]
enum Holder {
    Card(crate::CardId),
    Owned(crate::PhysicalCardId),
}

impl From<crate::CardId> for Holder {
    fn from(id: crate::CardId) -> Self {
        Holder::Card(id)
    }
}

fn check_overlap(left: &Predicate, right: &Predicate) -> Result<(), FilterError> {
    let (left, right) = (left.kinds(), right.kinds());
    if left.intersects(right) {
        Ok(())
    } else {
        Err(FilterError::InvalidComposition { left, right })
    }
}
