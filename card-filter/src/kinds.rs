use crate::{CardId, CardSetId, PhysicalCardId};
use bitflags::bitflags;
use itertools::Itertools;
use std::fmt;

bitflags! {
    /// Entity kinds a predicate can be evaluated against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntityKinds: u8 {
        const CARD = 1;
        const PHYSICAL_CARD = 1 << 1;
        const CARD_SET = 1 << 2;
    }
}

impl EntityKinds {
    /// Catalog card attributes are also visible through an owned copy.
    pub const CARD_ATTRIBUTE: Self = Self::CARD.union(Self::PHYSICAL_CARD);
}

impl fmt::Display for EntityKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no entity");
        }
        let names = [
            (Self::CARD, "card"),
            (Self::PHYSICAL_CARD, "physical card"),
            (Self::CARD_SET, "card set"),
        ]
        .into_iter()
        .filter(|(kind, _)| self.contains(*kind))
        .map(|(_, name)| name)
        .join(" or ");
        f.write_str(&names)
    }
}

/// One entity a predicate is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Candidate {
    Card(CardId),
    PhysicalCard(PhysicalCardId),
    CardSet(CardSetId),
}

impl Candidate {
    pub fn kind(self) -> EntityKinds {
        match self {
            Candidate::Card(_) => EntityKinds::CARD,
            Candidate::PhysicalCard(_) => EntityKinds::PHYSICAL_CARD,
            Candidate::CardSet(_) => EntityKinds::CARD_SET,
        }
    }
}

impl From<CardId> for Candidate {
    fn from(id: CardId) -> Self {
        Candidate::Card(id)
    }
}

impl From<PhysicalCardId> for Candidate {
    fn from(id: PhysicalCardId) -> Self {
        Candidate::PhysicalCard(id)
    }
}

impl From<CardSetId> for Candidate {
    fn from(id: CardSetId) -> Self {
        Candidate::CardSet(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_each_kind() {
        assert_eq!(EntityKinds::CARD_ATTRIBUTE.to_string(), "card or physical card");
        assert_eq!(EntityKinds::CARD_SET.to_string(), "card set");
        assert_eq!(EntityKinds::empty().to_string(), "no entity");
    }
}
