//! Habit state engine.
//!
//! This module owns the session state and applies the two progress
//! operations:
//! - `adjust_progress` adds a signed delta
//! - `set_progress` replaces the total
//!
//! Both clamp progress at zero. A habit crossing from below goal to at or
//! above goal in a single call awards coins, bumps the streak and emits a
//! message request. Mood is recomputed from the habits on every read.

use crate::{
    Config, CompletionRecord, HabitCollection, HabitId, MessageRequest, MessageSink, PetMood,
    SessionState,
};
use chrono::Utc;
use uuid::Uuid;

/// Starting balance unless configured otherwise
pub const DEFAULT_INITIAL_COINS: u32 = 100;

/// Coins awarded per completion transition unless configured otherwise
pub const DEFAULT_COMPLETION_REWARD: u32 = 10;

/// Coins awarded for winning the minigame unless configured otherwise
pub const DEFAULT_MINIGAME_BONUS: u32 = 50;

/// Result of a single progress operation
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressOutcome {
    pub habit: HabitId,
    pub progress: f64,
    /// True when this call moved the habit from below goal to at or above it
    pub completed: bool,
    pub mood: PetMood,
}

/// Single-writer owner of the session state
pub struct HabitStateEngine<S: MessageSink> {
    state: SessionState,
    completion_reward: u32,
    minigame_bonus: u32,
    sink: S,
    next_seq: u64,
    completions: Vec<CompletionRecord>,
}

impl<S: MessageSink> HabitStateEngine<S> {
    /// Engine with default habits, starting coins and rewards
    pub fn new(sink: S) -> Self {
        Self::with_habits(HabitCollection::default(), DEFAULT_INITIAL_COINS, sink)
    }

    /// Engine initialized from configuration. Fails if a goal is unusable.
    pub fn from_config(config: &Config, sink: S) -> crate::Result<Self> {
        let habits = config.goals.build_habits()?;
        let mut engine = Self::with_habits(habits, config.session.initial_coins, sink);
        engine.completion_reward = config.session.completion_reward;
        engine.minigame_bonus = config.session.minigame_bonus;
        Ok(engine)
    }

    /// Goals are already validated by `HabitCollection::with_goals`
    pub fn with_habits(habits: HabitCollection, initial_coins: u32, sink: S) -> Self {
        Self {
            state: SessionState::new(habits, initial_coins),
            completion_reward: DEFAULT_COMPLETION_REWARD,
            minigame_bonus: DEFAULT_MINIGAME_BONUS,
            sink,
            next_seq: 1,
            completions: Vec::new(),
        }
    }

    /// Add `delta` to a habit's progress, clamping at zero
    pub fn adjust_progress(&mut self, habit: HabitId, delta: f64) -> ProgressOutcome {
        let delta = if delta.is_nan() { 0.0 } else { delta };
        let current = self.state.habits.get(habit).progress;
        tracing::debug!("Adjusting {} by {}", habit, delta);
        self.apply(habit, current + delta)
    }

    /// Replace a habit's progress, clamping at zero
    pub fn set_progress(&mut self, habit: HabitId, value: f64) -> ProgressOutcome {
        tracing::debug!("Setting {} to {}", habit, value);
        self.apply(habit, value)
    }

    fn apply(&mut self, id: HabitId, target: f64) -> ProgressOutcome {
        // f64::max ignores a NaN operand, so NaN clamps to zero
        let progress = target.max(0.0);

        let habit = self.state.habits.get_mut(id);
        let was_completed = habit.is_completed();
        habit.progress = progress;
        let is_completed = habit.is_completed();

        self.state.celebrating = false;

        let completed = is_completed && !was_completed;
        if completed {
            self.on_completion(id);
        }

        ProgressOutcome {
            habit: id,
            progress,
            completed,
            mood: self.state.mood(),
        }
    }

    fn on_completion(&mut self, id: HabitId) {
        self.state.coins = self.state.coins.saturating_add(self.completion_reward);
        self.state.streak = self.state.streak.saturating_add(1);

        let habit = self.state.habits.get(id);
        tracing::info!(
            "{} completed ({}), streak {}, coins {}",
            habit.name,
            habit.goal_description(),
            self.state.streak,
            self.state.coins
        );

        self.completions.push(CompletionRecord {
            habit: id,
            progress: habit.progress,
            streak: self.state.streak,
            coins: self.state.coins,
            completed_at: Utc::now(),
        });

        let request = MessageRequest {
            seq: self.next_seq,
            id: Uuid::new_v4(),
            habit_type: habit.name.clone(),
            habit_goal: habit.goal_description(),
            habit_progress: habit.progress,
            streak_length: self.state.streak,
        };
        self.next_seq += 1;
        self.sink.submit(request);
    }

    /// Award the minigame bonus and celebrate until the next progress change
    pub fn reward_minigame_win(&mut self) -> u32 {
        self.state.coins = self.state.coins.saturating_add(self.minigame_bonus);
        self.state.celebrating = true;
        tracing::info!("Minigame won, coins now {}", self.state.coins);
        self.state.coins
    }

    /// Remove coins for a purchase. Fails without side effects when the
    /// balance is too small.
    pub(crate) fn debit(&mut self, cost: u32) -> crate::Result<u32> {
        let balance = self.state.coins;
        let remaining = balance
            .checked_sub(cost)
            .ok_or(crate::Error::InsufficientCoins { cost, balance })?;
        self.state.coins = remaining;
        Ok(remaining)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn habits(&self) -> &HabitCollection {
        &self.state.habits
    }

    pub fn mood(&self) -> PetMood {
        self.state.mood()
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn coins(&self) -> u32 {
        self.state.coins
    }

    pub fn completions(&self) -> &[CompletionRecord] {
        &self.completions
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Hand back the sink, ending the session
    pub fn into_sink(self) -> S {
        self.sink
    }
}
