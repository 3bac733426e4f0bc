use crate::{AbstractCard, CardSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumerated card attribute whose values are canonical vocabulary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    CardType,
    Clan,
    Discipline,
    Sect,
    Expansion,
    Rarity,
    Artist,
    Keyword,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::CardType,
        Attribute::Clan,
        Attribute::Discipline,
        Attribute::Sect,
        Attribute::Expansion,
        Attribute::Rarity,
        Attribute::Artist,
        Attribute::Keyword,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::CardType => "CardType",
            Attribute::Clan => "Clan",
            Attribute::Discipline => "Discipline",
            Attribute::Sect => "Sect",
            Attribute::Expansion => "Expansion",
            Attribute::Rarity => "Rarity",
            Attribute::Artist => "Artist",
            Attribute::Keyword => "Keyword",
        }
    }

    /// Values the card carries for this attribute. Empty means undefined.
    pub fn values(self, card: &AbstractCard) -> Box<dyn Iterator<Item = &str> + '_> {
        fn names(values: &[String]) -> Box<dyn Iterator<Item = &str> + '_> {
            Box::new(values.iter().map(String::as_str))
        }
        match self {
            Attribute::CardType => names(&card.card_types),
            Attribute::Clan => names(&card.clans),
            Attribute::Discipline => names(&card.disciplines),
            Attribute::Sect => names(&card.sects),
            Attribute::Artist => names(&card.artists),
            Attribute::Keyword => names(&card.keywords),
            Attribute::Expansion => Box::new(card.printings.iter().map(|p| p.expansion.as_str())),
            Attribute::Rarity => Box::new(card.printings.iter().filter_map(|p| p.rarity.as_deref())),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer-valued card attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntAttribute {
    Group,
    Capacity,
    Cost,
    Life,
}

impl IntAttribute {
    pub const ALL: [IntAttribute; 4] = [
        IntAttribute::Group,
        IntAttribute::Capacity,
        IntAttribute::Cost,
        IntAttribute::Life,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntAttribute::Group => "Group",
            IntAttribute::Capacity => "Capacity",
            IntAttribute::Cost => "Cost",
            IntAttribute::Life => "Life",
        }
    }

    pub fn value(self, card: &AbstractCard) -> Option<i64> {
        match self {
            IntAttribute::Group => card.group,
            IntAttribute::Capacity => card.capacity,
            IntAttribute::Cost => card.cost,
            IntAttribute::Life => card.life,
        }
    }
}

/// Free-text card field searched with `%`/`_` patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Text,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::Name => "CardName",
            TextField::Text => "CardText",
        }
    }

    pub fn value(self, card: &AbstractCard) -> &str {
        match self {
            TextField::Name => &card.name,
            TextField::Text => &card.text,
        }
    }
}

/// Free-text card-set field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetTextField {
    Name,
    Author,
    Description,
}

impl SetTextField {
    pub fn name(self) -> &'static str {
        match self {
            SetTextField::Name => "CardSetName",
            SetTextField::Author => "CardSetAuthor",
            SetTextField::Description => "CardSetDescription",
        }
    }

    pub fn value(self, set: &CardSet) -> &str {
        match self {
            SetTextField::Name => &set.name,
            SetTextField::Author => &set.author,
            SetTextField::Description => &set.description,
        }
    }
}
