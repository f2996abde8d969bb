//! Sequencing strategies for frozen UUIDs.
//!
//! A [`Generator`] decides which [`Identifier`] each call to a patched UUID
//! factory returns. The strategy is picked by [`Strategy`], a closed set that
//! mirrors the `side_effect` names accepted in declared overrides.

use std::fmt;
use std::str::FromStr;

use rand_mt::Mt;
use tracing::trace;

use crate::config::FreezeConfig;
use crate::error::FreezeError;
use crate::identifier::Identifier;

/// Named policy deciding how successive identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Start from the first predefined value and add one on each call.
    #[default]
    AutoIncrement,
    /// Repeat the predefined values forever.
    Cycle,
    /// Seeded pseudo-random identifiers tagged with the configured version.
    Random,
    /// Return the predefined values once, then fail.
    Values,
}

impl Strategy {
    /// Every supported strategy, in documentation order.
    pub const ALL: [Self; 4] = [Self::AutoIncrement, Self::Cycle, Self::Random, Self::Values];

    /// The `side_effect` name of this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoIncrement => "auto_increment",
            Self::Cycle => "cycle",
            Self::Random => "random",
            Self::Values => "values",
        }
    }

    /// Whether the strategy draws from the predefined values list.
    #[must_use]
    pub const fn requires_values(self) -> bool {
        !matches!(self, Self::Random)
    }
}

impl FromStr for Strategy {
    type Err = FreezeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| FreezeError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateful producer of frozen identifiers.
///
/// One generator is shared by every binding patched in a scope, so all
/// aliases of the target advance the same sequence.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Raw 128-bit increment; `None` once the all-ones value has been drawn.
    AutoIncrement {
        /// Next value to hand out.
        next: Option<u128>,
        /// Values produced so far.
        drawn: usize,
    },
    /// Endless repetition of a non-empty list.
    Cycle {
        /// Values to repeat.
        values: Vec<Identifier>,
        /// Index of the next value.
        position: usize,
    },
    /// Seeded MT19937 output stamped with a version.
    Random {
        /// Pseudo-random source.
        rng: Box<Mt>,
        /// Version nibble applied to every draw.
        version: u8,
    },
    /// The list exactly once.
    Values {
        /// Values to hand out.
        values: Vec<Identifier>,
        /// Index of the next value.
        position: usize,
    },
}

impl Generator {
    /// Counts up from `start`.
    #[must_use]
    pub fn auto_increment(start: Identifier) -> Self {
        Self::AutoIncrement { next: Some(start.as_u128()), drawn: 0 }
    }

    /// Cycles through `values`.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::EmptySequence`] if `values` is empty.
    pub fn cycle(values: Vec<Identifier>) -> Result<Self, FreezeError> {
        if values.is_empty() {
            return Err(FreezeError::EmptySequence(Strategy::Cycle.to_string()));
        }
        Ok(Self::Cycle { values, position: 0 })
    }

    /// Draws seeded random identifiers tagged with `version`.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::InvalidVersion`] unless `version` is in 1..=5.
    pub fn random(seed: i64, version: u8) -> Result<Self, FreezeError> {
        if !(1..=5).contains(&version) {
            return Err(FreezeError::InvalidVersion(version));
        }
        Ok(Self::Random { rng: Box::new(Mt::new_with_key(seed_key(seed))), version })
    }

    /// Hands out `values` once, then reports exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::EmptySequence`] if `values` is empty.
    pub fn values(values: Vec<Identifier>) -> Result<Self, FreezeError> {
        if values.is_empty() {
            return Err(FreezeError::EmptySequence(Strategy::Values.to_string()));
        }
        Ok(Self::Values { values, position: 0 })
    }

    /// Builds the generator a resolved configuration asks for.
    ///
    /// # Errors
    ///
    /// Propagates the constructor errors above; a configuration that came out
    /// of [`crate::config::resolve`] never triggers them.
    pub fn from_config(config: &FreezeConfig) -> Result<Self, FreezeError> {
        let values = config.values.clone();
        match config.strategy {
            Strategy::AutoIncrement => {
                let Some(start) = values.first().copied() else {
                    return Err(FreezeError::EmptySequence(Strategy::AutoIncrement.to_string()));
                };
                Ok(Self::auto_increment(start))
            }
            Strategy::Cycle => Self::cycle(values),
            Strategy::Random => Self::random(config.seed, config.version),
            Strategy::Values => Self::values(values),
        }
    }

    /// The strategy this generator implements.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::AutoIncrement { .. } => Strategy::AutoIncrement,
            Self::Cycle { .. } => Strategy::Cycle,
            Self::Random { .. } => Strategy::Random,
            Self::Values { .. } => Strategy::Values,
        }
    }

    /// Produces the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::SequenceExhausted`] when a `values` generator has
    /// handed out its whole list, or an auto-increment generator has passed
    /// the all-ones identifier.
    pub fn draw(&mut self) -> Result<Identifier, FreezeError> {
        let id = match self {
            Self::AutoIncrement { next, drawn } => {
                let current = next.ok_or(FreezeError::SequenceExhausted { drawn: *drawn })?;
                *next = current.checked_add(1);
                *drawn += 1;
                Identifier::from_u128(current)
            }
            Self::Cycle { values, position } => {
                let id = values[*position];
                *position = (*position + 1) % values.len();
                id
            }
            Self::Random { rng, version } => {
                Identifier::from_u128_versioned(next_u128(rng), *version)?
            }
            Self::Values { values, position } => {
                let id = *values
                    .get(*position)
                    .ok_or(FreezeError::SequenceExhausted { drawn: values.len() })?;
                *position += 1;
                id
            }
        };
        trace!(strategy = %self.strategy(), %id, "drew frozen uuid");
        Ok(id)
    }
}

/// Key words for an integer seed, following CPython's `random.seed(n)`:
/// `|n|` split into little-endian 32-bit words, zero as a single zero word.
#[allow(clippy::cast_possible_truncation)]
fn seed_key(seed: i64) -> Vec<u32> {
    let magnitude = seed.unsigned_abs();
    let low = magnitude as u32;
    let high = (magnitude >> 32) as u32;
    if high == 0 {
        vec![low]
    } else {
        vec![low, high]
    }
}

/// 128 random bits filled from the least significant word upward, as
/// `getrandbits(128)` does.
fn next_u128(rng: &mut Mt) -> u128 {
    (0..4).fold(0u128, |acc, word| acc | (u128::from(rng.next_u32()) << (32 * word)))
}

impl Iterator for Generator {
    type Item = Identifier;

    fn next(&mut self) -> Option<Self::Item> {
        self.draw().ok()
    }
}
