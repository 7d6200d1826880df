//! Error types for the pawpal_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pawpal_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP transport error from the message generator
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text did not name one of the tracked habits
    #[error("Unknown habit: {0}")]
    UnknownHabit(String),

    /// Text did not name a pet type
    #[error("Unknown pet type: {0}")]
    UnknownPetType(String),

    /// Cosmetic id not present in the shop
    #[error("Unknown cosmetic: {0}")]
    UnknownCosmetic(String),

    /// Cosmetic has already been bought this session
    #[error("Cosmetic already owned: {0}")]
    AlreadyOwned(String),

    /// Purchase would drive the coin balance negative
    #[error("Not enough coins: costs {cost}, balance is {balance}")]
    InsufficientCoins { cost: u32, balance: u32 },

    /// Pet names must contain something other than whitespace
    #[error("Pet name cannot be empty")]
    InvalidPetName,

    /// Message generator returned an unusable response
    #[error("Generator error: {0}")]
    Generator(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
