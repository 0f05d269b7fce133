//! Lane roster
//!
//! Owns the lane slots of the track. Each slot holds at most one horse.
//!
//! # Critical Invariants
//!
//! 1. **Capacity**: lane count is always within [`MIN_LANES`, `MAX_LANES`]
//! 2. **Uniqueness**: no two occupied lanes hold horses with the same name
//! 3. **Lane Consistency**: after every structural mutation, each horse's
//!    `lane()` equals its 1-based slot position
//!
//! The race loop never resizes the roster; only the explicit add/remove
//! operations below do.

use thiserror::Error;

use crate::models::horse::Horse;

/// Fewest lanes a roster may have
pub const MIN_LANES: usize = 2;

/// Most lanes a roster may have
pub const MAX_LANES: usize = 8;

/// Errors from structural roster mutation
#[derive(Debug, Error, PartialEq, Clone)]
pub enum RosterError {
    #[error("Lane count {requested} outside [{min}, {max}]")]
    InvalidLaneCount {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Roster already has the maximum of {max} lanes")]
    Capacity { max: usize },

    #[error("Invalid lane {lane} (roster has {lane_count} lanes)")]
    InvalidLane { lane: usize, lane_count: usize },

    #[error("Cannot remove lane: roster must keep at least {min} lanes")]
    TooFewLanes { min: usize },

    #[error("Lane {0} is already taken")]
    LaneTaken(usize),

    #[error("Lane {0} is empty")]
    EmptyLane(usize),

    #[error("A horse named '{0}' is already in the roster")]
    DuplicateName(String),
}

/// Ordered lane slots, index = lane number - 1
///
/// # Example
/// ```
/// use horse_race_core::{Horse, LaneRoster};
///
/// let mut roster = LaneRoster::new(3).unwrap();
/// roster.add_horse(Horse::new("Shadow moon", 'S', 0.5), 2).unwrap();
///
/// assert_eq!(roster.occupied_count(), 1);
/// assert_eq!(roster.empty_lanes(), vec![1, 3]);
/// assert_eq!(roster.get(2).unwrap().lane(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LaneRoster {
    lanes: Vec<Option<Horse>>,
}

impl LaneRoster {
    /// Create a roster of `lane_count` empty lanes
    pub fn new(lane_count: usize) -> Result<Self, RosterError> {
        if !(MIN_LANES..=MAX_LANES).contains(&lane_count) {
            return Err(RosterError::InvalidLaneCount {
                requested: lane_count,
                min: MIN_LANES,
                max: MAX_LANES,
            });
        }
        Ok(Self {
            lanes: vec![None; lane_count],
        })
    }

    /// Rebuild a roster from explicit slots (used when restoring a checkpoint)
    pub fn from_slots(slots: Vec<Option<Horse>>) -> Result<Self, RosterError> {
        let mut roster = Self::new(slots.len())?;
        for (index, slot) in slots.into_iter().enumerate() {
            if let Some(horse) = slot {
                roster.add_horse(horse, index + 1)?;
            }
        }
        Ok(roster)
    }

    // ========================================================================
    // Structural mutation
    // ========================================================================

    /// Append an empty lane
    pub fn add_lane(&mut self) -> Result<usize, RosterError> {
        if self.lanes.len() >= MAX_LANES {
            return Err(RosterError::Capacity { max: MAX_LANES });
        }
        self.lanes.push(None);
        self.reindex();
        Ok(self.lanes.len())
    }

    /// Remove lane `lane` (1-based), discarding any horse in it
    ///
    /// Lanes after it shift down by one and their horses are renumbered.
    pub fn remove_lane(&mut self, lane: usize) -> Result<Option<Horse>, RosterError> {
        self.check_lane(lane)?;
        if self.lanes.len() <= MIN_LANES {
            return Err(RosterError::TooFewLanes { min: MIN_LANES });
        }
        let removed = self.lanes.remove(lane - 1);
        self.reindex();
        Ok(removed)
    }

    /// Place `horse` in lane `lane` (1-based)
    pub fn add_horse(&mut self, horse: Horse, lane: usize) -> Result<(), RosterError> {
        self.check_lane(lane)?;
        if self.lanes[lane - 1].is_some() {
            return Err(RosterError::LaneTaken(lane));
        }
        if self.contains_name(horse.name()) {
            return Err(RosterError::DuplicateName(horse.name().to_string()));
        }
        self.lanes[lane - 1] = Some(horse);
        self.reindex();
        Ok(())
    }

    /// Clear lane `lane` (1-based), returning its horse
    pub fn remove_horse(&mut self, lane: usize) -> Result<Horse, RosterError> {
        self.check_lane(lane)?;
        let horse = self.lanes[lane - 1]
            .take()
            .ok_or(RosterError::EmptyLane(lane))?;
        self.reindex();
        Ok(horse)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.lanes.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when every lane holds a horse
    pub fn is_full(&self) -> bool {
        self.lanes.iter().all(|slot| slot.is_some())
    }

    /// 1-based numbers of empty lanes, ascending
    pub fn empty_lanes(&self) -> Vec<usize> {
        self.lane_numbers_where(|slot| slot.is_none())
    }

    /// 1-based numbers of occupied lanes, ascending
    pub fn full_lanes(&self) -> Vec<usize> {
        self.lane_numbers_where(|slot| slot.is_some())
    }

    pub fn first_empty_lane(&self) -> Option<usize> {
        self.lanes.iter().position(|slot| slot.is_none()).map(|i| i + 1)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.horses().any(|horse| horse.name() == name)
    }

    /// Horse in lane `lane` (1-based), if any
    pub fn get(&self, lane: usize) -> Option<&Horse> {
        lane.checked_sub(1)
            .and_then(|index| self.lanes.get(index))
            .and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, lane: usize) -> Option<&mut Horse> {
        lane.checked_sub(1)
            .and_then(|index| self.lanes.get_mut(index))
            .and_then(|slot| slot.as_mut())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Horse> {
        self.horses().find(|horse| horse.name() == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Horse> {
        self.horses_mut().find(|horse| horse.name() == name)
    }

    /// Occupied horses in lane order
    pub fn horses(&self) -> impl Iterator<Item = &Horse> {
        self.lanes.iter().filter_map(|slot| slot.as_ref())
    }

    /// Occupied horses in lane order, mutable
    ///
    /// Lane numbers are owned by the roster and cannot be changed through
    /// this iterator.
    pub fn horses_mut(&mut self) -> impl Iterator<Item = &mut Horse> {
        self.lanes.iter_mut().filter_map(|slot| slot.as_mut())
    }

    /// Raw slots in lane order
    pub fn slots(&self) -> &[Option<Horse>] {
        &self.lanes
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn check_lane(&self, lane: usize) -> Result<(), RosterError> {
        if lane == 0 || lane > self.lanes.len() {
            return Err(RosterError::InvalidLane {
                lane,
                lane_count: self.lanes.len(),
            });
        }
        Ok(())
    }

    fn lane_numbers_where(&self, predicate: impl Fn(&Option<Horse>) -> bool) -> Vec<usize> {
        self.lanes
            .iter()
            .enumerate()
            .filter(|(_, slot)| predicate(slot))
            .map(|(index, _)| index + 1)
            .collect()
    }

    fn reindex(&mut self) {
        for (index, slot) in self.lanes.iter_mut().enumerate() {
            if let Some(horse) = slot {
                horse.set_lane(index + 1);
            }
        }
    }
}
