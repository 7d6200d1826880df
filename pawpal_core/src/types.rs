//! Core domain types for PawPal.
//!
//! This module defines the fundamental types used throughout the system:
//! - Habit identifiers and habit records
//! - The fixed habit collection
//! - Pet mood and pet type
//! - Session state (habits, streak, coins)

use crate::{mood::derive_mood, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Habit Types
// ============================================================================

/// Identifier of a tracked habit. Membership is fixed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum HabitId {
    Water,
    Sleep,
    Steps,
    Meals,
    ScreenTime,
}

impl HabitId {
    /// Every habit, in display order
    pub const ALL: [HabitId; 5] = [
        HabitId::Water,
        HabitId::Sleep,
        HabitId::Steps,
        HabitId::Meals,
        HabitId::ScreenTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitId::Water => "water",
            HabitId::Sleep => "sleep",
            HabitId::Steps => "steps",
            HabitId::Meals => "meals",
            HabitId::ScreenTime => "screenTime",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HabitId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "water" => Ok(HabitId::Water),
            "sleep" => Ok(HabitId::Sleep),
            "steps" => Ok(HabitId::Steps),
            "meals" => Ok(HabitId::Meals),
            "screentime" => Ok(HabitId::ScreenTime),
            _ => Err(Error::UnknownHabit(s.to_string())),
        }
    }
}

/// A tracked wellness metric
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub goal: f64,
    pub unit: String,
    pub progress: f64,
}

impl Habit {
    pub fn new(id: HabitId, name: impl Into<String>, goal: f64, unit: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            goal,
            unit: unit.into(),
            progress: 0.0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= self.goal
    }

    /// Goal rendered with its unit, e.g. "8 glasses"
    pub fn goal_description(&self) -> String {
        format!("{} {}", self.goal, self.unit)
    }
}

/// Reject goals that are zero, negative or not a number
pub fn validate_goal(id: HabitId, goal: f64) -> Result<()> {
    if !goal.is_finite() || goal <= 0.0 {
        return Err(Error::Config(format!(
            "Goal for {} must be a positive number, got {}",
            id, goal
        )));
    }
    Ok(())
}

/// One habit per identifier, indexed by the identifier itself.
///
/// Only constructed through [`HabitCollection::with_goals`] or `Default`, so
/// every goal is finite and positive.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(transparent)]
pub struct HabitCollection {
    habits: [Habit; 5],
}

impl HabitCollection {
    /// Build a collection with the given goal for each habit
    pub fn with_goals(goal_for: impl Fn(HabitId) -> f64) -> Result<Self> {
        for id in HabitId::ALL {
            validate_goal(id, goal_for(id))?;
        }
        Ok(Self::build(goal_for))
    }

    fn build(goal_for: impl Fn(HabitId) -> f64) -> Self {
        let habit = |id: HabitId, name: &str, unit: &str| Habit::new(id, name, goal_for(id), unit);
        Self {
            habits: [
                habit(HabitId::Water, "Water Intake", "glasses"),
                habit(HabitId::Sleep, "Sleep", "hours"),
                habit(HabitId::Steps, "Steps", "steps"),
                habit(HabitId::Meals, "Healthy Meals", "meals"),
                habit(HabitId::ScreenTime, "Screen Time", "hours"),
            ],
        }
    }

    pub fn get(&self, id: HabitId) -> &Habit {
        &self.habits[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: HabitId) -> &mut Habit {
        &mut self.habits[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.is_completed()).count()
    }
}

impl Default for HabitCollection {
    fn default() -> Self {
        Self::build(|id| match id {
            HabitId::Water => 8.0,
            HabitId::Sleep => 8.0,
            HabitId::Steps => 10_000.0,
            HabitId::Meals => 3.0,
            HabitId::ScreenTime => 2.0,
        })
    }
}

// ============================================================================
// Pet Types
// ============================================================================

/// Emotional state of the pet
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PetMood {
    Idle,
    Happy,
    Sad,
    Energetic,
}

impl fmt::Display for PetMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PetMood::Idle => "idle",
            PetMood::Happy => "happy",
            PetMood::Sad => "sad",
            PetMood::Energetic => "energetic",
        };
        f.pad(label)
    }
}

/// Kind of companion shown to the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    #[default]
    Dog,
    Cat,
    Dragon,
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
            PetType::Dragon => "dragon",
        };
        f.pad(label)
    }
}

impl FromStr for PetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(PetType::Dog),
            "cat" => Ok(PetType::Cat),
            "dragon" => Ok(PetType::Dragon),
            _ => Err(Error::UnknownPetType(s.to_string())),
        }
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Everything the engine mutates as one unit per user action
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SessionState {
    pub habits: HabitCollection,
    pub streak: u32,
    pub coins: u32,
    /// Set by a minigame win; cleared by the next progress mutation
    pub celebrating: bool,
}

impl SessionState {
    pub fn new(habits: HabitCollection, initial_coins: u32) -> Self {
        Self {
            habits,
            streak: 0,
            coins: initial_coins,
            celebrating: false,
        }
    }

    /// Current mood, derived from the habit collection
    pub fn mood(&self) -> PetMood {
        if self.celebrating {
            PetMood::Happy
        } else {
            derive_mood(&self.habits)
        }
    }
}

/// A completion transition recorded during the session
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CompletionRecord {
    pub habit: HabitId,
    pub progress: f64,
    pub streak: u32,
    pub coins: u32,
    pub completed_at: DateTime<Utc>,
}
