//! Game-mode configuration.
//!
//! A game mode is loaded once and is read-only afterwards:
//! - `PatienceRules`: slot counts and the ordering/packing policies
//! - `CardData`: one entry per card in the deck
//! - `GameMode`: name + rules + deck, loaded from JSON
//!
//! `PatienceComponent` carries the rules on the game-mode entity together
//! with the monster bay roster built during setup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::error::{PatienceError, PatienceResult};
use crate::cards::{CardKind, RankOrdering, SlotRules, SlotType, Suit, SuitOrdering};

/// When dealt cards become face-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revelation {
    /// Every card is face-up from the start.
    #[default]
    Open,
    /// Only the top card of each column is face-up; a card turns over when
    /// it becomes the top card.
    TopOnly,
}

/// What an empty column accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyColumn {
    /// Any card.
    #[default]
    Any,
    /// Only a card of the highest rank (a King in a standard deck).
    HighestRank,
    /// Nothing; an emptied column stays empty.
    Never,
}

/// Rules of a patience game mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatienceRules {
    pub columns: usize,
    pub sites: usize,
    pub freecells: usize,
    pub stocks: usize,
    pub wastepiles: usize,

    pub revelation: Revelation,

    /// Rank ordering when building on a site.
    pub building_order: RankOrdering,

    /// Suit ordering when building on a site.
    pub building_suit: SuitOrdering,

    /// Rank that starts an empty site. `None` for any rank.
    pub foundation_rank: Option<u8>,

    /// Rank ordering when packing in a column.
    pub packing_order: RankOrdering,

    /// Suit ordering when packing in a column.
    pub packing_type: SuitOrdering,

    pub empty_column: EmptyColumn,

    pub max_rank: u8,

    /// Whether the by-one orderings wrap from `max_rank` to 1.
    pub loop_around: bool,
}

impl Default for PatienceRules {
    fn default() -> Self {
        Self {
            columns: 7,
            sites: 4,
            freecells: 0,
            stocks: 0,
            wastepiles: 0,
            revelation: Revelation::Open,
            building_order: RankOrdering::Any,
            building_suit: SuitOrdering::Any,
            foundation_rank: None,
            packing_order: RankOrdering::DescendingByOne,
            packing_type: SuitOrdering::AlternateColour,
            empty_column: EmptyColumn::Any,
            max_rank: 13,
            loop_around: false,
        }
    }
}

impl PatienceRules {
    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_sites(mut self, sites: usize) -> Self {
        self.sites = sites;
        self
    }

    #[must_use]
    pub fn with_freecells(mut self, freecells: usize) -> Self {
        self.freecells = freecells;
        self
    }

    #[must_use]
    pub fn with_stocks(mut self, stocks: usize, wastepiles: usize) -> Self {
        self.stocks = stocks;
        self.wastepiles = wastepiles;
        self
    }

    #[must_use]
    pub fn with_revelation(mut self, revelation: Revelation) -> Self {
        self.revelation = revelation;
        self
    }

    #[must_use]
    pub fn with_packing(mut self, order: RankOrdering, suit: SuitOrdering) -> Self {
        self.packing_order = order;
        self.packing_type = suit;
        self
    }

    #[must_use]
    pub fn with_building(mut self, order: RankOrdering, suit: SuitOrdering, foundation_rank: Option<u8>) -> Self {
        self.building_order = order;
        self.building_suit = suit;
        self.foundation_rank = foundation_rank;
        self
    }

    #[must_use]
    pub fn with_empty_column(mut self, empty_column: EmptyColumn) -> Self {
        self.empty_column = empty_column;
        self
    }

    /// Slot rules for a column under these game rules.
    #[must_use]
    pub fn column_rules(&self) -> SlotRules {
        let rules = self.ranked(SlotRules::for_type(SlotType::Column))
            .with_ordering(self.packing_order, self.packing_type);
        match self.empty_column {
            EmptyColumn::Any => rules,
            EmptyColumn::HighestRank => rules.with_foundation(Some(self.max_rank), None),
            EmptyColumn::Never => rules.closed_when_empty(),
        }
    }

    /// Slot rules for a site under these game rules.
    #[must_use]
    pub fn site_rules(&self) -> SlotRules {
        self.ranked(SlotRules::for_type(SlotType::Site))
            .with_ordering(self.building_order, self.building_suit)
            .with_foundation(self.foundation_rank, None)
    }

    fn ranked(&self, rules: SlotRules) -> SlotRules {
        if self.loop_around {
            rules.with_loop_around(self.max_rank)
        } else {
            rules.with_max_rank(self.max_rank)
        }
    }
}

/// One card of a game-mode deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    pub rank: u8,
    pub suit: Suit,
    #[serde(default)]
    pub kind: CardKind,
    /// Face sprite asset path.
    #[serde(default)]
    pub sprite: String,
}

impl CardData {
    #[must_use]
    pub fn new(name: impl Into<String>, rank: u8, suit: Suit) -> Self {
        Self {
            name: name.into(),
            rank,
            suit,
            kind: CardKind::Normal,
            sprite: String::new(),
        }
    }

    #[must_use]
    pub fn monster(name: impl Into<String>, rank: u8, suit: Suit, health: u32) -> Self {
        Self {
            kind: CardKind::Monster { health },
            ..Self::new(name, rank, suit)
        }
    }

    /// Every rank of every suit, `1..=max_rank`.
    #[must_use]
    pub fn standard_deck(max_rank: u8) -> Vec<CardData> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| {
                (1..=max_rank).map(move |rank| {
                    let mut card = CardData::new(format!("{rank}{suit}"), rank, suit);
                    card.sprite = format!("textures/cards/{suit:?}_{rank}.png").to_lowercase();
                    card
                })
            })
            .collect()
    }
}

/// A complete game mode: rules and deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMode {
    pub name: String,
    #[serde(default)]
    pub rules: PatienceRules,
    pub deck: Vec<CardData>,
}

impl GameMode {
    #[must_use]
    pub fn new(name: impl Into<String>, rules: PatienceRules, deck: Vec<CardData>) -> Self {
        Self {
            name: name.into(),
            rules,
            deck,
        }
    }

    /// Parse and validate a game mode from JSON.
    pub fn from_json_str(json: &str) -> PatienceResult<Self> {
        let mode: GameMode = serde_json::from_str(json)?;
        mode.validate()?;
        Ok(mode)
    }

    /// Read, parse and validate a game-mode file.
    pub fn from_path(path: impl AsRef<Path>) -> PatienceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the deck against the rules.
    pub fn validate(&self) -> PatienceResult<()> {
        let max = self.rules.max_rank;
        if max == 0 {
            return Err(PatienceError::InvalidConfig("max_rank must be at least 1".into()));
        }
        if self.rules.columns == 0 && !self.deck.is_empty() {
            return Err(PatienceError::InvalidConfig(
                "a deck needs at least one column to be dealt into".into(),
            ));
        }
        if let Some(rank) = self.rules.foundation_rank {
            if !(1..=max).contains(&rank) {
                return Err(PatienceError::InvalidConfig(format!(
                    "foundation rank {rank} outside 1..={max}"
                )));
            }
        }
        for card in &self.deck {
            if !(1..=max).contains(&card.rank) {
                return Err(PatienceError::InvalidConfig(format!(
                    "card '{}' has rank {} outside 1..={max}",
                    card.name, card.rank
                )));
            }
            if card.kind == (CardKind::Monster { health: 0 }) {
                return Err(PatienceError::InvalidConfig(format!(
                    "monster '{}' has no health",
                    card.name
                )));
            }
        }
        Ok(())
    }
}

/// Game-mode entity component.
#[derive(Clone, Debug, PartialEq)]
pub struct PatienceComponent {
    pub rules: PatienceRules,

    /// Monster bays in roster order. Released monsters take the first
    /// empty one.
    pub monster_slots: Vec<EntityId>,

    /// Name of the game mode this board was built from.
    pub setup_script: String,
}

impl PatienceComponent {
    #[must_use]
    pub fn new(rules: PatienceRules, setup_script: impl Into<String>) -> Self {
        Self {
            rules,
            monster_slots: Vec::new(),
            setup_script: setup_script.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = PatienceRules::default();
        assert_eq!(rules.columns, 7);
        assert_eq!(rules.sites, 4);
        assert_eq!(rules.max_rank, 13);
        assert_eq!(rules.revelation, Revelation::Open);
    }

    #[test]
    fn test_column_rules_follow_packing() {
        let rules = PatienceRules::default()
            .with_packing(RankOrdering::Descending, SuitOrdering::Any)
            .with_empty_column(EmptyColumn::HighestRank);
        let column = rules.column_rules();

        assert_eq!(column.rank_ordering, RankOrdering::Descending);
        assert_eq!(column.suit_ordering, SuitOrdering::Any);
        assert_eq!(column.foundation_rank, Some(13));
        assert!(column.accepts_sequences);
    }

    #[test]
    fn test_column_rules_never_refill() {
        let rules = PatienceRules::default().with_empty_column(EmptyColumn::Never);
        assert!(!rules.column_rules().accepts_when_empty);
    }

    #[test]
    fn test_site_rules_follow_building() {
        let mut rules = PatienceRules::default().with_building(
            RankOrdering::AscendingByOne,
            SuitOrdering::SameSuit,
            Some(1),
        );
        rules.loop_around = true;
        let site = rules.site_rules();

        assert_eq!(site.rank_ordering, RankOrdering::AscendingByOne);
        assert_eq!(site.suit_ordering, SuitOrdering::SameSuit);
        assert_eq!(site.foundation_rank, Some(1));
        assert!(site.loop_around);
    }

    #[test]
    fn test_standard_deck() {
        let deck = CardData::standard_deck(13);
        assert_eq!(deck.len(), 52);
        assert!(deck.iter().all(|c| c.kind == CardKind::Normal));
        assert_eq!(deck[0].rank, 1);
        assert_eq!(deck[0].suit, Suit::Clubs);
    }

    #[test]
    fn test_game_mode_from_json() {
        let json = r#"{
            "name": "Dungeon",
            "rules": { "columns": 3, "sites": 2, "revelation": "top_only", "packing_order": "descending" },
            "deck": [
                { "name": "Five", "rank": 5, "suit": "clubs" },
                { "name": "Goblin", "rank": 11, "suit": "spades", "kind": { "monster": { "health": 7 } } }
            ]
        }"#;
        let mode = GameMode::from_json_str(json).unwrap();

        assert_eq!(mode.name, "Dungeon");
        assert_eq!(mode.rules.columns, 3);
        assert_eq!(mode.rules.freecells, 0);
        assert_eq!(mode.rules.revelation, Revelation::TopOnly);
        assert_eq!(mode.rules.packing_order, RankOrdering::Descending);
        assert_eq!(mode.deck[1].kind, CardKind::Monster { health: 7 });
    }

    #[test]
    fn test_validate_rejects_bad_rank() {
        let mode = GameMode::new(
            "bad",
            PatienceRules::default(),
            vec![CardData::new("Fourteen", 14, Suit::Hearts)],
        );
        assert!(matches!(mode.validate(), Err(PatienceError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_dead_monster() {
        let mode = GameMode::new(
            "bad",
            PatienceRules::default(),
            vec![CardData::monster("Ghost", 3, Suit::Hearts, 0)],
        );
        assert!(mode.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_deck_without_columns() {
        let mode = GameMode::new(
            "bad",
            PatienceRules::default().with_columns(0),
            CardData::standard_deck(13),
        );
        assert!(mode.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameMode::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PatienceError::Io(_)));
    }

    #[test]
    fn test_rules_serde_round_trip() {
        let rules = PatienceRules::default().with_freecells(4).with_stocks(1, 1);
        let json = serde_json::to_string(&rules).unwrap();
        let parsed: PatienceRules = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, parsed);
    }
}
