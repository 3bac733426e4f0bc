use crate::{
    CardId, CardSetId, Catalog, EntityKinds, FilterError, PhysicalCardId, Predicate,
    kinds::Candidate,
};
use hashbrown::HashSet;
use serde::Serialize;
use std::{hash::Hash, time::Instant};
use tracing::debug;

/// Universe a predicate is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cards,
    PhysicalCards,
    CardSets,
    /// The physical cards held by one card set.
    CardSetContents(CardSetId),
}

impl Source {
    pub fn kind(self) -> EntityKinds {
        match self {
            Source::Cards => EntityKinds::CARD,
            Source::PhysicalCards | Source::CardSetContents(_) => EntityKinds::PHYSICAL_CARD,
            Source::CardSets => EntityKinds::CARD_SET,
        }
    }

    /// Preferred universe for a predicate: catalog cards, then owned cards,
    /// then card sets.
    pub fn default_for(kinds: EntityKinds) -> Option<Source> {
        [Source::Cards, Source::PhysicalCards, Source::CardSets]
            .into_iter()
            .find(|source| kinds.contains(source.kind()))
    }
}

/// Matching ids, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum Matches {
    Cards(Vec<CardId>),
    PhysicalCards(Vec<PhysicalCardId>),
    CardSets(Vec<CardSetId>),
}

impl Matches {
    pub fn len(&self) -> usize {
        match self {
            Matches::Cards(ids) => ids.len(),
            Matches::PhysicalCards(ids) => ids.len(),
            Matches::CardSets(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display names in result order. A physical card shows its card's name.
    pub fn names<'c>(&self, catalog: &'c Catalog) -> Vec<&'c str> {
        match self {
            Matches::Cards(ids) => ids
                .iter()
                .filter_map(|&id| catalog.card(id))
                .map(|card| card.name.as_str())
                .collect(),
            Matches::PhysicalCards(ids) => ids
                .iter()
                .filter_map(|&id| catalog.physical_card(id))
                .filter_map(|physical| catalog.card(physical.card))
                .map(|card| card.name.as_str())
                .collect(),
            Matches::CardSets(ids) => ids
                .iter()
                .filter_map(|&id| catalog.card_set(id))
                .map(|set| set.name.as_str())
                .collect(),
        }
    }

    /// Execution keeps catalog order; this gives a stable case-insensitive
    /// name order instead.
    pub fn sort_by_name(&mut self, catalog: &Catalog) {
        fn sort<I: Copy>(ids: &mut [I], name: impl Fn(I) -> String) {
            ids.sort_by_cached_key(|&id| name(id));
        }
        match self {
            Matches::Cards(ids) => sort(ids, |id| {
                catalog
                    .card(id)
                    .map(|card| card.name.to_lowercase())
                    .unwrap_or_default()
            }),
            Matches::PhysicalCards(ids) => sort(ids, |id| {
                catalog
                    .physical_card(id)
                    .and_then(|physical| catalog.card(physical.card))
                    .map(|card| card.name.to_lowercase())
                    .unwrap_or_default()
            }),
            Matches::CardSets(ids) => sort(ids, |id| {
                catalog
                    .card_set(id)
                    .map(|set| set.name.to_lowercase())
                    .unwrap_or_default()
            }),
        }
    }
}

/// Evaluates `predicate` over `source`.
///
/// AND narrows the running result, OR adds what the right side matches among
/// the rest, NOT removes what its operand matches. Leaves test candidates one
/// at a time.
pub fn execute(
    catalog: &Catalog,
    predicate: &Predicate,
    source: Source,
) -> Result<Matches, FilterError> {
    let kinds = predicate.kinds();
    if kinds.is_empty() {
        return Err(FilterError::NoApplicableKind);
    }
    if !kinds.contains(source.kind()) {
        return Err(FilterError::UnsupportedUniverse {
            kinds,
            universe: source.kind(),
        });
    }
    let search_time = Instant::now();
    let matches = match source {
        Source::Cards => Matches::Cards(evaluate(catalog, predicate, catalog.card_ids().collect())),
        Source::PhysicalCards => Matches::PhysicalCards(evaluate(
            catalog,
            predicate,
            catalog.physical_card_ids().collect(),
        )),
        Source::CardSets => {
            Matches::CardSets(evaluate(catalog, predicate, catalog.card_set_ids().collect()))
        }
        Source::CardSetContents(id) => {
            let set = catalog
                .card_set(id)
                .ok_or(FilterError::UnknownCardSet(id))?;
            Matches::PhysicalCards(evaluate(catalog, predicate, set.cards.clone()))
        }
    };
    debug!(
        ?source,
        matched = matches.len(),
        "search time: {:?}",
        search_time.elapsed()
    );
    Ok(matches)
}

/// Whether editing card set `id` can change what `predicate` matches.
pub fn affects(predicate: &Predicate, id: CardSetId) -> bool {
    predicate.references_card_set(id)
}

fn evaluate<I>(catalog: &Catalog, predicate: &Predicate, universe: Vec<I>) -> Vec<I>
where
    I: Copy + Eq + Hash + Into<Candidate>,
{
    match predicate {
        Predicate::Everything => universe,
        Predicate::And(left, right) => {
            let narrowed = evaluate(catalog, left, universe);
            evaluate(catalog, right, narrowed)
        }
        Predicate::Or(left, right) => {
            let matched = evaluate(catalog, left, universe.clone());
            let mut rest = universe.clone();
            difference_in_place(&mut rest, &matched);
            let extra = evaluate(catalog, right, rest);
            let mut result = universe;
            retain_union(&mut result, &matched, &extra);
            result
        }
        Predicate::Not(inner) => {
            let negated = evaluate(catalog, inner, universe.clone());
            let mut result = universe;
            difference_in_place(&mut result, &negated);
            result
        }
        leaf => universe
            .into_iter()
            .filter(|&id| leaf.matches(catalog, id))
            .collect(),
    }
}

fn difference_in_place<I: Copy + Eq + Hash>(values: &mut Vec<I>, rhs: &[I]) {
    if values.is_empty() || rhs.is_empty() {
        return;
    }
    let rhs_set: HashSet<I> = rhs.iter().copied().collect();
    values.retain(|value| !rhs_set.contains(value));
}

// Keeps the members of `a ∪ b` in `values`' order.
fn retain_union<I: Copy + Eq + Hash>(values: &mut Vec<I>, a: &[I], b: &[I]) {
    let seen: HashSet<I> = a.iter().chain(b).copied().collect();
    values.retain(|value| seen.contains(value));
}
