#![forbid(unsafe_code)]

//! Core domain model and business logic for PawPal.
//!
//! This crate provides:
//! - Domain types (habits, session state, pet mood)
//! - The habit state engine and mood derivation
//! - Encouraging-message requests, generators and dispatch
//! - Pet profile and cosmetic shop
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod mood;
pub mod messages;
pub mod engine;
pub mod encouragement;
pub mod pet;
pub mod shop;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use mood::derive_mood;
pub use messages::{MessageRequest, MessageSink, NullSink};
pub use engine::{HabitStateEngine, ProgressOutcome};
pub use encouragement::{
    build_generator, MessageBoard, MessageDispatcher, MessageGenerator, OfflineGenerator,
};
pub use pet::{illustration, PetProfile};
pub use shop::{get_default_cosmetics, purchase};
