use crate::error::{Result, RevealError};
use crate::seed::{HashAlgorithm, Seed};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// Deck construction order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn code(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn code(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Two-character code, e.g. `AS`, `TD`, `2C`.
    pub fn code(&self) -> String {
        format!("{}{}", self.rank.code(), self.suit.code())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.symbol())
    }
}

/// 52 cards, suits ♠ ♥ ♦ ♣, ranks 2 through A within each suit.
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|suit| Rank::ALL.iter().map(move |rank| Card::new(*rank, *suit)))
        .collect()
}

/// Reduce a big-endian 256-bit integer modulo `modulus`.
pub fn reduce_mod(digest: &[u8; 32], modulus: u64) -> u64 {
    debug_assert!(modulus > 0);
    let m = modulus as u128;
    digest
        .iter()
        .fold(0u128, |acc, b| ((acc << 8) | *b as u128) % m) as u64
}

/// Swap partner for Fisher-Yates step `step` with `remaining` cards left.
pub fn swap_index(seed: &Seed, step: usize, remaining: usize, hash: HashAlgorithm) -> usize {
    let mut step_bytes = [0u8; 32];
    step_bytes[24..].copy_from_slice(&(step as u64).to_be_bytes());
    let h = hash.digest(&[seed.as_bytes(), &step_bytes]);
    step + reduce_mod(&h, remaining as u64) as usize
}

/// Seeded Fisher-Yates over a copy of `items`.
///
/// Step `i` swaps position `i` with `i + H(seed || i) mod (n - i)`, where `i`
/// is encoded as a 32-byte big-endian word. The last step is always the
/// identity and is skipped.
pub fn shuffle_with_seed<T: Clone>(seed: &Seed, items: &[T], hash: HashAlgorithm) -> Vec<T> {
    let mut out = items.to_vec();
    let n = out.len();
    for i in 0..n.saturating_sub(1) {
        let j = swap_index(seed, i, n - i, hash);
        out.swap(i, j);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealLayout {
    pub players: usize,
    pub hole_cards: usize,
    pub community: usize,
}

impl Default for DealLayout {
    fn default() -> Self {
        Self {
            players: 2,
            hole_cards: 2,
            community: 5,
        }
    }
}

impl DealLayout {
    /// Cards consumed by one deal, or a config error if the count overflows.
    pub fn cards_needed(&self) -> Result<usize> {
        self.players
            .checked_mul(self.hole_cards)
            .and_then(|hole| hole.checked_add(self.community))
            .ok_or_else(|| {
                RevealError::config(format!(
                    "Deal layout of {} players x {} hole cards + {} community overflows",
                    self.players, self.hole_cards, self.community
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub community: Vec<Card>,
}

/// Deal from the top of the pile (the end of `shuffled`): each player's hole
/// cards in turn, then the community cards.
pub fn deal(mut shuffled: Vec<Card>, layout: &DealLayout) -> Result<Deal> {
    let needed = layout.cards_needed()?;
    if needed > shuffled.len() {
        return Err(RevealError::InsufficientCards {
            needed,
            available: shuffled.len(),
        });
    }

    let mut hands = Vec::with_capacity(layout.players);
    for _ in 0..layout.players {
        let hand: Vec<Card> = (0..layout.hole_cards)
            .filter_map(|_| shuffled.pop())
            .collect();
        hands.push(hand);
    }
    let community = (0..layout.community)
        .filter_map(|_| shuffled.pop())
        .collect();

    Ok(Deal { hands, community })
}

/// Shuffle the standard deck with `seed` and deal it.
pub fn deal_from_seed(seed: &Seed, layout: &DealLayout, hash: HashAlgorithm) -> Result<Deal> {
    let shuffled = shuffle_with_seed(seed, &standard_deck(), hash);
    deal(shuffled, layout)
}
