//! Breed profiles
//!
//! Starting confidence derived from a horse's breed and equipment:
//! `0.15 × breed × coat × saddle × shoes`, then normalized like any other
//! confidence value.

use serde::{Deserialize, Serialize};

use crate::models::horse::{normalize_confidence, Horse};

/// Confidence before any multiplier is applied
pub const BASE_PROFILE_CONFIDENCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Breed {
    Arabian,
    Thoroughbred,
    Mustang,
    Clydesdale,
    Appaloosa,
}

impl Breed {
    pub fn multiplier(self) -> f64 {
        match self {
            Breed::Arabian => 1.1,
            Breed::Thoroughbred => 1.0,
            Breed::Mustang | Breed::Clydesdale | Breed::Appaloosa => 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoatColour {
    Black,
    Chestnut,
    Bay,
    Palomino,
    Grey,
}

impl CoatColour {
    pub fn multiplier(self) -> f64 {
        match self {
            CoatColour::Black | CoatColour::Palomino => 1.05,
            CoatColour::Chestnut | CoatColour::Grey => 1.0,
            CoatColour::Bay => 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Saddle {
    Racing,
    Comfort,
    Old,
}

impl Saddle {
    pub fn multiplier(self) -> f64 {
        match self {
            Saddle::Racing => 1.1,
            Saddle::Comfort => 1.0,
            Saddle::Old => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horseshoe {
    Steel,
    Rubber,
    Worn,
}

impl Horseshoe {
    pub fn multiplier(self) -> f64 {
        match self {
            Horseshoe::Steel => 1.05,
            Horseshoe::Rubber => 1.0,
            Horseshoe::Worn => 0.85,
        }
    }
}

/// Breed and equipment of a horse
///
/// # Example
/// ```
/// use horse_race_core::generation::{Breed, BreedProfile, CoatColour, Horseshoe, Saddle};
///
/// let profile = BreedProfile {
///     breed: Breed::Arabian,
///     coat: CoatColour::Chestnut,
///     saddle: Saddle::Racing,
///     shoes: Horseshoe::Rubber,
/// };
/// // 0.15 * 1.1 * 1.0 * 1.1 * 1.0 = 0.1815
/// assert_eq!(profile.confidence(), 0.18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedProfile {
    pub breed: Breed,
    pub coat: CoatColour,
    pub saddle: Saddle,
    pub shoes: Horseshoe,
}

impl Default for BreedProfile {
    fn default() -> Self {
        Self {
            breed: Breed::Thoroughbred,
            coat: CoatColour::Chestnut,
            saddle: Saddle::Comfort,
            shoes: Horseshoe::Rubber,
        }
    }
}

impl BreedProfile {
    /// Normalized starting confidence
    pub fn confidence(&self) -> f64 {
        normalize_confidence(
            BASE_PROFILE_CONFIDENCE
                * self.breed.multiplier()
                * self.coat.multiplier()
                * self.saddle.multiplier()
                * self.shoes.multiplier(),
        )
    }

    /// Build a fresh horse seeded from this profile
    pub fn build(&self, name: impl Into<String>, symbol: char) -> Horse {
        Horse::new(name, symbol, self.confidence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_base_confidence() {
        assert_eq!(BreedProfile::default().confidence(), 0.15);
    }

    #[test]
    fn test_worst_profile() {
        let profile = BreedProfile {
            breed: Breed::Mustang,
            coat: CoatColour::Bay,
            saddle: Saddle::Old,
            shoes: Horseshoe::Worn,
        };
        // 0.15 * 0.95 * 0.95 * 0.9 * 0.85 = 0.1035...
        assert_eq!(profile.confidence(), 0.10);
    }
}
