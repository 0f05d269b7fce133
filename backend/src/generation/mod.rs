//! Horse generation
//!
//! Two ways of seeding a horse's starting confidence besides an explicit
//! caller value or a persisted record:
//!
//! - **Random horses**: word-list names, alphanumeric symbols, fixed
//!   starting confidence. All draws go through the injected [`RandomSource`],
//!   so generated rosters are reproducible from a seed.
//! - **Breed profiles**: a base confidence scaled by breed, coat, saddle and
//!   horseshoe multipliers.

pub mod profile;

pub use profile::{Breed, BreedProfile, CoatColour, Horseshoe, Saddle};

use thiserror::Error;
use tracing::debug;

use crate::models::horse::Horse;
use crate::models::roster::{LaneRoster, RosterError};
use crate::rng::RandomSource;

/// Confidence every randomly generated horse starts with
pub const RANDOM_HORSE_CONFIDENCE: f64 = 0.25;

/// Name draws attempted before giving up on finding an unused name
pub const MAX_NAME_ATTEMPTS: usize = 1_000;

const NAME_PREFIXES: [&str; 20] = [
    "Thunder", "Midnight", "Shadow", "Lightning", "Silver", "Golden", "Diamond", "Black",
    "White", "Red", "Wild", "Crazy", "Majestic", "Royal", "Brave", "Flying", "Dancing",
    "Galloping", "Mystic", "Spirit",
];

const NAME_SUFFIXES: [&str; 20] = [
    "hoof", "mane", "tail", "storm", "fire", "wind", "blaze", "dancer", "chaser", "runner",
    "prince", "king", "queen", "star", "moon", "sun", "dream", "whisper", "shadow", "flash",
];

#[derive(Debug, Error, PartialEq, Clone)]
pub enum GenerationError {
    #[error("No unused horse name found after {0} attempts")]
    NamesExhausted(usize),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

fn pick<'a, R: RandomSource>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words[rng.range(0, words.len() as i64) as usize]
}

/// Draw a "Prefix suffix" name
pub fn random_name<R: RandomSource>(rng: &mut R) -> String {
    let prefix = pick(rng, &NAME_PREFIXES);
    let suffix = pick(rng, &NAME_SUFFIXES);
    format!("{} {}", prefix, suffix)
}

/// Draw a symbol from A-Z, a-z or 0-9
///
/// The category is drawn first, then a character within it, so digits are
/// as likely overall as either letter case.
pub fn random_symbol<R: RandomSource>(rng: &mut R) -> char {
    let (base, span) = match rng.range(0, 3) {
        0 => (b'A', 26),
        1 => (b'a', 26),
        _ => (b'0', 10),
    };
    (base + rng.range(0, span) as u8) as char
}

/// Generate a horse whose name is not yet used in `roster`
///
/// # Example
/// ```
/// use horse_race_core::{generation, LaneRoster, RngManager};
///
/// let roster = LaneRoster::new(2).unwrap();
/// let mut rng = RngManager::new(42);
/// let horse = generation::random_horse(&roster, &mut rng).unwrap();
///
/// assert_eq!(horse.confidence(), 0.25);
/// assert!(horse.symbol().is_ascii_alphanumeric());
/// ```
pub fn random_horse<R: RandomSource>(
    roster: &LaneRoster,
    rng: &mut R,
) -> Result<Horse, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = random_name(rng);
        if roster.contains_name(&name) {
            continue;
        }
        let symbol = random_symbol(rng);
        debug!(%name, %symbol, "generated random horse");
        return Ok(Horse::new(name, symbol, RANDOM_HORSE_CONFIDENCE));
    }
    Err(GenerationError::NamesExhausted(MAX_NAME_ATTEMPTS))
}

/// Add up to `count` random horses to the empty lanes of `roster`
///
/// Stops quietly once every lane is occupied. Returns how many were added.
pub fn fill_roster<R: RandomSource>(
    roster: &mut LaneRoster,
    count: usize,
    rng: &mut R,
) -> Result<usize, GenerationError> {
    let mut added = 0;
    while added < count {
        let Some(lane) = roster.first_empty_lane() else {
            break;
        };
        let horse = random_horse(roster, rng)?;
        roster.add_horse(horse, lane)?;
        added += 1;
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngManager, SequenceRng};

    #[test]
    fn test_random_symbol_categories() {
        // category draw, then character draw
        let mut rng = SequenceRng::new(vec![0.0, 0.0, 0.5, 0.99, 0.9, 0.5]);
        assert_eq!(random_symbol(&mut rng), 'A');
        assert_eq!(random_symbol(&mut rng), 'z');
        assert_eq!(random_symbol(&mut rng), '5');
    }

    #[test]
    fn test_fill_roster_stops_at_capacity() {
        let mut roster = LaneRoster::new(3).unwrap();
        let mut rng = RngManager::new(7);

        let added = fill_roster(&mut roster, 8, &mut rng).unwrap();

        assert_eq!(added, 3);
        assert!(roster.is_full());
    }

    #[test]
    fn test_roster_errors_convert() {
        let err: GenerationError = RosterError::LaneTaken(2).into();
        assert_eq!(err, GenerationError::Roster(RosterError::LaneTaken(2)));
        assert_eq!(err.to_string(), "Lane 2 is already taken");
    }

    #[test]
    fn test_fill_roster_skips_taken_lanes() {
        let mut roster = LaneRoster::new(4).unwrap();
        roster.add_horse(Horse::new("Thunder hoof", 'T', 0.5), 2).unwrap();
        let mut rng = RngManager::new(11);

        assert_eq!(fill_roster(&mut roster, 2, &mut rng), Ok(2));
        assert_eq!(roster.full_lanes(), vec![1, 2, 3]);
        assert_eq!(roster.get(2).unwrap().name(), "Thunder hoof");
    }

    #[test]
    fn test_names_exhausted_when_only_one_name_possible() {
        let mut roster = LaneRoster::new(2).unwrap();
        roster.add_horse(Horse::new("Thunder hoof", 'T', 0.5), 1).unwrap();
        // Always draws index 0 for both word lists
        let mut rng = SequenceRng::new(vec![0.0]);

        assert_eq!(
            random_horse(&roster, &mut rng),
            Err(GenerationError::NamesExhausted(MAX_NAME_ATTEMPTS))
        );
    }
}
