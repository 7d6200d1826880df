//! Pet mood derivation.
//!
//! Mood is a pure function of the habit collection: the share of habits at
//! or above goal is mapped onto four bands.

use crate::{HabitCollection, PetMood};

/// Lowest completion ratio that makes the pet happy
pub const HAPPY_RATIO: f64 = 0.8;

/// Lowest completion ratio that makes the pet energetic
pub const ENERGETIC_RATIO: f64 = 0.4;

/// Fraction of habits currently at or above goal
pub fn completion_ratio(habits: &HabitCollection) -> f64 {
    habits.completed_count() as f64 / habits.len() as f64
}

/// Map a completion ratio onto a mood. First matching band wins.
pub fn mood_for_ratio(ratio: f64) -> PetMood {
    if ratio >= HAPPY_RATIO {
        PetMood::Happy
    } else if ratio >= ENERGETIC_RATIO {
        PetMood::Energetic
    } else if ratio > 0.0 {
        PetMood::Idle
    } else {
        PetMood::Sad
    }
}

pub fn derive_mood(habits: &HabitCollection) -> PetMood {
    mood_for_ratio(completion_ratio(habits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HabitId;

    fn with_completed(count: usize) -> HabitCollection {
        let mut habits = HabitCollection::default();
        for id in HabitId::ALL.iter().take(count) {
            let habit = habits.get_mut(*id);
            habit.progress = habit.goal;
        }
        habits
    }

    #[test]
    fn test_mood_boundaries_for_five_habits() {
        assert_eq!(derive_mood(&with_completed(0)), PetMood::Sad);
        assert_eq!(derive_mood(&with_completed(1)), PetMood::Idle);
        assert_eq!(derive_mood(&with_completed(2)), PetMood::Energetic);
        assert_eq!(derive_mood(&with_completed(3)), PetMood::Energetic);
        assert_eq!(derive_mood(&with_completed(4)), PetMood::Happy);
        assert_eq!(derive_mood(&with_completed(5)), PetMood::Happy);
    }

    #[test]
    fn test_band_lower_bounds_are_inclusive() {
        assert_eq!(mood_for_ratio(0.8), PetMood::Happy);
        assert_eq!(mood_for_ratio(0.79), PetMood::Energetic);
        assert_eq!(mood_for_ratio(0.4), PetMood::Energetic);
        assert_eq!(mood_for_ratio(0.39), PetMood::Idle);
        assert_eq!(mood_for_ratio(0.01), PetMood::Idle);
        assert_eq!(mood_for_ratio(0.0), PetMood::Sad);
    }

    #[test]
    fn test_progress_beyond_goal_counts_once() {
        let mut habits = HabitCollection::default();
        habits.get_mut(HabitId::Water).progress = 80.0;
        assert!((completion_ratio(&habits) - 0.2).abs() < f64::EPSILON);
    }
}
