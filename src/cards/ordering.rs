//! Rank and suit ordering policies.
//!
//! A slot decides whether a card may go on top of another by combining a
//! `RankOrdering` and a `SuitOrdering`. The same pair decides whether a run
//! of cards inside a column is a packed sequence that can be lifted as one.
//! Both are pure functions of the two cards involved.

use serde::{Deserialize, Serialize};

use super::card::Suit;

/// How the rank of the next card relates to the card beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrdering {
    /// Any rank may follow.
    #[default]
    Any,
    /// Strictly higher rank.
    Ascending,
    /// Strictly lower rank.
    Descending,
    /// Exactly one higher (King→Ace with loop-around).
    AscendingByOne,
    /// Exactly one lower (Ace→King with loop-around).
    DescendingByOne,
    /// Same rank.
    SameRank,
}

impl RankOrdering {
    /// Check whether `next` may follow `below`.
    ///
    /// `loop_around` only affects the by-one orderings: with it, `max_rank`
    /// and 1 are adjacent.
    #[must_use]
    pub fn allows(self, below: u8, next: u8, max_rank: u8, loop_around: bool) -> bool {
        match self {
            RankOrdering::Any => true,
            RankOrdering::Ascending => next > below,
            RankOrdering::Descending => next < below,
            RankOrdering::AscendingByOne => {
                below.checked_add(1) == Some(next) || (loop_around && below == max_rank && next == 1)
            }
            RankOrdering::DescendingByOne => {
                (next >= 1 && below.checked_sub(1) == Some(next))
                    || (loop_around && below == 1 && next == max_rank)
            }
            RankOrdering::SameRank => next == below,
        }
    }
}

/// How the suit of the next card relates to the card beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitOrdering {
    /// Any suit may follow.
    #[default]
    Any,
    SameSuit,
    SameColour,
    /// Red on black, black on red.
    AlternateColour,
    DifferentSuit,
}

impl SuitOrdering {
    /// Check whether `next` may follow `below`.
    #[must_use]
    pub fn allows(self, below: Suit, next: Suit) -> bool {
        match self {
            SuitOrdering::Any => true,
            SuitOrdering::SameSuit => next == below,
            SuitOrdering::SameColour => next.colour() == below.colour(),
            SuitOrdering::AlternateColour => next.colour() != below.colour(),
            SuitOrdering::DifferentSuit => next != below,
        }
    }
}
