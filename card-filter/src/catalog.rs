use crate::{Attribute, CatalogError, IntAttribute};
use anyhow::{Context, Result};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};
use tracing::{debug, info};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Index of an [`AbstractCard`] in its catalog.
    CardId,
    "card"
);
entity_id!(
    /// Index of a [`PhysicalCard`] in its catalog.
    PhysicalCardId,
    "physical card"
);
entity_id!(
    /// Index of a [`CardSet`] in its catalog.
    CardSetId,
    "card set"
);

/// Canonical vocabulary entry, e.g. `Dominate` with the alias `dom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl NamedEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printing {
    pub expansion: String,
    #[serde(default)]
    pub rarity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractCard {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub card_types: Vec<String>,
    #[serde(default)]
    pub clans: Vec<String>,
    #[serde(default)]
    pub disciplines: Vec<String>,
    #[serde(default)]
    pub sects: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub printings: Vec<Printing>,
    #[serde(default)]
    pub group: Option<i64>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub cost: Option<i64>,
    #[serde(default)]
    pub life: Option<i64>,
}

/// Owned copy as stored in the catalog document: the card is referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalCardData {
    pub card: String,
    #[serde(default)]
    pub expansion: Option<String>,
}

/// Card set as stored in the catalog document. `cards` indexes
/// `physical_cards`; `parent` names another set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSetData {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub in_use: bool,
    #[serde(default)]
    pub cards: Vec<usize>,
}

/// The on-disk catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub vocabulary: BTreeMap<Attribute, Vec<NamedEntity>>,
    #[serde(default)]
    pub cards: Vec<AbstractCard>,
    #[serde(default)]
    pub physical_cards: Vec<PhysicalCardData>,
    #[serde(default)]
    pub card_sets: Vec<CardSetData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalCard {
    pub card: CardId,
    /// Printed expansion, when known.
    pub expansion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CardSet {
    pub name: String,
    pub author: String,
    pub description: String,
    pub parent: Option<CardSetId>,
    pub in_use: bool,
    pub cards: Vec<PhysicalCardId>,
    members: HashSet<PhysicalCardId>,
}

impl CardSet {
    pub fn contains(&self, id: PhysicalCardId) -> bool {
        self.members.contains(&id)
    }
}

/// Validated, canonicalized card catalog.
///
/// Every loaded catalog gets a fresh generation number. Caches keyed on
/// catalog contents remember the generation they were filled from.
#[derive(Debug, Clone)]
pub struct Catalog {
    generation: u64,
    vocabulary: BTreeMap<Attribute, Vec<NamedEntity>>,
    cards: Vec<AbstractCard>,
    physical_cards: Vec<PhysicalCard>,
    card_sets: Vec<CardSet>,
    copies: Vec<Vec<PhysicalCardId>>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let load_time = Instant::now();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Self::from_json_str(&text)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        info!(
            "Catalog load time: {:?}, {} cards, {} card sets",
            load_time.elapsed(),
            catalog.cards.len(),
            catalog.card_sets.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let data: CatalogData =
            serde_json::from_str(text).context("Failed to decode catalog document")?;
        Ok(Self::from_data(data)?)
    }

    /// Validates `data` and canonicalizes every card value through the
    /// vocabulary. Values no vocabulary entry names become new entries.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut vocabulary = VocabularyBuilder::new(data.vocabulary)?;

        let mut cards = data.cards;
        let mut card_ids: HashMap<String, CardId> = HashMap::with_capacity(cards.len());
        for (index, card) in cards.iter_mut().enumerate() {
            if card_ids
                .insert(card.name.clone(), CardId(index))
                .is_some()
            {
                return Err(CatalogError::DuplicateCard(card.name.clone()));
            }
            vocabulary.canonicalize_card(card);
        }

        let mut copies = vec![Vec::new(); cards.len()];
        let mut physical_cards = Vec::with_capacity(data.physical_cards.len());
        for (index, physical) in data.physical_cards.into_iter().enumerate() {
            let card = *card_ids
                .get(&physical.card)
                .ok_or_else(|| CatalogError::UnknownCard(physical.card.clone()))?;
            copies[card.0].push(PhysicalCardId(index));
            physical_cards.push(PhysicalCard {
                card,
                expansion: physical
                    .expansion
                    .map(|expansion| vocabulary.canonical(Attribute::Expansion, &expansion)),
            });
        }

        let card_sets = build_card_sets(data.card_sets, physical_cards.len())?;
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        debug!(generation, "catalog validated");
        Ok(Self {
            generation,
            vocabulary: vocabulary.entities,
            cards,
            physical_cards,
            card_sets,
            copies,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn card(&self, id: CardId) -> Option<&AbstractCard> {
        self.cards.get(id.0)
    }

    pub fn physical_card(&self, id: PhysicalCardId) -> Option<&PhysicalCard> {
        self.physical_cards.get(id.0)
    }

    pub fn card_set(&self, id: CardSetId) -> Option<&CardSet> {
        self.card_sets.get(id.0)
    }

    pub fn cards(&self) -> impl Iterator<Item = (CardId, &AbstractCard)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(index, card)| (CardId(index), card))
    }

    pub fn physical_cards(&self) -> impl Iterator<Item = (PhysicalCardId, &PhysicalCard)> {
        self.physical_cards
            .iter()
            .enumerate()
            .map(|(index, card)| (PhysicalCardId(index), card))
    }

    pub fn card_sets(&self) -> impl Iterator<Item = (CardSetId, &CardSet)> {
        self.card_sets
            .iter()
            .enumerate()
            .map(|(index, set)| (CardSetId(index), set))
    }

    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(CardId)
    }

    pub fn physical_card_ids(&self) -> impl Iterator<Item = PhysicalCardId> + '_ {
        (0..self.physical_cards.len()).map(PhysicalCardId)
    }

    pub fn card_set_ids(&self) -> impl Iterator<Item = CardSetId> + '_ {
        (0..self.card_sets.len()).map(CardSetId)
    }

    pub fn card_by_name(&self, name: &str) -> Option<CardId> {
        self.cards()
            .find(|(_, card)| card.name == name)
            .map(|(id, _)| id)
    }

    pub fn card_set_by_name(&self, name: &str) -> Option<CardSetId> {
        self.card_sets()
            .find(|(_, set)| set.name == name)
            .map(|(id, _)| id)
    }

    /// Physical copies of `card`, in catalog order.
    pub fn copies_of(&self, card: CardId) -> &[PhysicalCardId] {
        self.copies.get(card.0).map_or(&[], Vec::as_slice)
    }

    /// Canonical entities of `attribute`, declared ones first.
    pub fn vocabulary(&self, attribute: Attribute) -> &[NamedEntity] {
        self.vocabulary.get(&attribute).map_or(&[], Vec::as_slice)
    }

    /// Canonical names of `attribute`, sorted.
    pub fn domain(&self, attribute: Attribute) -> Vec<String> {
        let mut names: Vec<String> = self
            .vocabulary(attribute)
            .iter()
            .map(|entity| entity.name.clone())
            .collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    /// Distinct values any card carries for `attribute`.
    pub fn int_domain(&self, attribute: IntAttribute) -> Vec<i64> {
        self.cards
            .iter()
            .filter_map(|card| attribute.value(card))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn card_set_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.card_sets.iter().map(|set| set.name.clone()).collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }
}

struct VocabularyBuilder {
    entities: BTreeMap<Attribute, Vec<NamedEntity>>,
    index: HashMap<(Attribute, String), String>,
}

impl VocabularyBuilder {
    fn new(declared: BTreeMap<Attribute, Vec<NamedEntity>>) -> Result<Self, CatalogError> {
        let mut entities = BTreeMap::new();
        let mut index = HashMap::new();
        for (attribute, declared) in declared {
            // an entity listed twice under one name is merged
            let mut list: Vec<NamedEntity> = Vec::with_capacity(declared.len());
            for entity in declared {
                match list.iter_mut().find(|known| known.name == entity.name) {
                    Some(known) => {
                        for alias in entity.aliases {
                            if !known.aliases.contains(&alias) {
                                known.aliases.push(alias);
                            }
                        }
                    }
                    None => list.push(entity),
                }
            }
            for entity in &list {
                for key in std::iter::once(&entity.name).chain(&entity.aliases) {
                    let previous = index.insert((attribute, key.to_lowercase()), entity.name.clone());
                    if previous.is_some_and(|previous| previous != entity.name) {
                        return Err(CatalogError::AmbiguousName {
                            attribute,
                            name: key.clone(),
                        });
                    }
                }
            }
            entities.insert(attribute, list);
        }
        Ok(Self { entities, index })
    }

    fn canonical(&mut self, attribute: Attribute, value: &str) -> String {
        let key = (attribute, value.to_lowercase());
        if let Some(name) = self.index.get(&key) {
            return name.clone();
        }
        self.entities
            .entry(attribute)
            .or_default()
            .push(NamedEntity::new(value));
        self.index.insert(key, value.to_string());
        value.to_string()
    }

    fn canonicalize_all(&mut self, attribute: Attribute, values: &mut [String]) {
        for value in values {
            *value = self.canonical(attribute, value);
        }
    }

    fn canonicalize_card(&mut self, card: &mut AbstractCard) {
        self.canonicalize_all(Attribute::CardType, &mut card.card_types);
        self.canonicalize_all(Attribute::Clan, &mut card.clans);
        self.canonicalize_all(Attribute::Discipline, &mut card.disciplines);
        self.canonicalize_all(Attribute::Sect, &mut card.sects);
        self.canonicalize_all(Attribute::Artist, &mut card.artists);
        self.canonicalize_all(Attribute::Keyword, &mut card.keywords);
        for printing in &mut card.printings {
            printing.expansion = self.canonical(Attribute::Expansion, &printing.expansion);
            if let Some(rarity) = &printing.rarity {
                printing.rarity = Some(self.canonical(Attribute::Rarity, rarity));
            }
        }
    }
}

fn build_card_sets(
    data: Vec<CardSetData>,
    physical_count: usize,
) -> Result<Vec<CardSet>, CatalogError> {
    let mut set_ids: HashMap<String, CardSetId> = HashMap::with_capacity(data.len());
    for (index, set) in data.iter().enumerate() {
        // set names resolve ignoring case, so they must be unique ignoring case
        if set_ids.insert(set.name.to_lowercase(), CardSetId(index)).is_some() {
            return Err(CatalogError::DuplicateCardSet(set.name.clone()));
        }
    }

    let mut card_sets = Vec::with_capacity(data.len());
    for set in data {
        let parent = match &set.parent {
            None => None,
            Some(parent) => Some(*set_ids.get(&parent.to_lowercase()).ok_or_else(|| {
                CatalogError::UnknownParent {
                    set: set.name.clone(),
                    parent: parent.clone(),
                }
            })?),
        };
        if let Some(&index) = set.cards.iter().find(|&&index| index >= physical_count) {
            return Err(CatalogError::PhysicalCardOutOfRange {
                set: set.name,
                index,
            });
        }
        let cards: Vec<PhysicalCardId> = set.cards.into_iter().map(PhysicalCardId).collect();
        card_sets.push(CardSet {
            name: set.name,
            author: set.author,
            description: set.description,
            parent,
            in_use: set.in_use,
            members: cards.iter().copied().collect(),
            cards,
        });
    }

    // A parent chain longer than the number of sets must revisit a set.
    for set in &card_sets {
        let mut current = set.parent;
        for _ in 0..card_sets.len() {
            match current {
                Some(id) => current = card_sets[id.0].parent,
                None => break,
            }
        }
        if current.is_some() {
            return Err(CatalogError::ParentCycle(set.name.clone()));
        }
    }
    Ok(card_sets)
}
