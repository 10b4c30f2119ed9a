use std::fmt;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BOARD_HEIGHT, BOARD_WIDTH, Position};

/// Seed for deterministic random generators.
///
/// This is a 128-bit (16-byte) seed used to initialize [`Pcg32`] generators.
/// The same seed always yields the same food positions for the same sequence of
/// moves, which makes episodes reproducible. Seeds serialize as a 32-character
/// hex string.
///
/// # Example
///
/// ```
/// use oxisnake_engine::{SnakeGame, Seed};
/// use rand::Rng as _;
///
/// let seed: Seed = rand::rng().random();
///
/// let game1 = SnakeGame::with_seed(seed);
/// let game2 = SnakeGame::with_seed(seed);
/// assert_eq!(game1.food(), game2.food());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; 16]);

impl Seed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates a [`Pcg32`] generator from this seed.
    #[must_use]
    pub fn to_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for Seed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing a [`Seed`] from a hex string fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl std::str::FromStr for Seed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `Seed` values using the standard random distribution.
///
/// This implementation enables idiomatic seed generation with `rng.random()`.
impl Distribution<Seed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Seed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        Seed(seed)
    }
}

/// Draws uniformly random food positions.
#[derive(Debug, Clone)]
pub struct FoodPlacer {
    rng: Pcg32,
}

impl Default for FoodPlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodPlacer {
    /// Creates a food placer with a random seed.
    ///
    /// For deterministic placement, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: Seed) -> Self {
        Self { rng: seed.to_rng() }
    }

    /// Draws cells uniformly until one is not rejected by `is_occupied`.
    ///
    /// The caller must guarantee that at least one free cell exists.
    pub fn place<F>(&mut self, mut is_occupied: F) -> Position
    where
        F: FnMut(Position) -> bool,
    {
        loop {
            let pos = Position::new(
                self.rng.random_range(0..BOARD_WIDTH),
                self.rng.random_range(0..BOARD_HEIGHT),
            );
            if !is_occupied(pos) {
                return pos;
            }
        }
    }
}
