//! Pet profile and illustrations.

use crate::{Config, Error, PetMood, PetType, Result};
use std::collections::BTreeSet;

/// Name, kind and owned cosmetics of the companion
#[derive(Clone, Debug, PartialEq)]
pub struct PetProfile {
    name: String,
    pub pet_type: PetType,
    owned: BTreeSet<String>,
}

impl Default for PetProfile {
    fn default() -> Self {
        Self {
            name: "Buddy".into(),
            pet_type: PetType::Dog,
            owned: BTreeSet::new(),
        }
    }
}

impl PetProfile {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.session.pet_name.trim().to_string(),
            pet_type: config.session.pet_type,
            owned: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidPetName);
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn owns(&self, cosmetic_id: &str) -> bool {
        self.owned.contains(cosmetic_id)
    }

    pub(crate) fn grant(&mut self, cosmetic_id: &str) {
        self.owned.insert(cosmetic_id.to_string());
    }

    pub fn owned(&self) -> impl Iterator<Item = &str> {
        self.owned.iter().map(String::as_str)
    }
}

/// Illustration description for a pet in a given mood
pub fn illustration(pet_type: PetType, mood: PetMood) -> &'static str {
    match (pet_type, mood) {
        (PetType::Dog, PetMood::Idle) => "dog sitting",
        (PetType::Dog, PetMood::Happy) => "happy dog",
        (PetType::Dog, PetMood::Sad) => "sad dog",
        (PetType::Dog, PetMood::Energetic) => "dog running",
        (PetType::Cat, PetMood::Idle) => "cat sitting",
        (PetType::Cat, PetMood::Happy) => "happy cat",
        (PetType::Cat, PetMood::Sad) => "sad cat",
        (PetType::Cat, PetMood::Energetic) => "cat playing",
        (PetType::Dragon, PetMood::Idle) => "dragon resting",
        (PetType::Dragon, PetMood::Happy) => "happy dragon",
        (PetType::Dragon, PetMood::Sad) => "sad dragon",
        (PetType::Dragon, PetMood::Energetic) => "dragon flying",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_trims_and_rejects_blank() {
        let mut profile = PetProfile::default();
        profile.rename("  Rex ").unwrap();
        assert_eq!(profile.name(), "Rex");
        assert!(matches!(profile.rename("   "), Err(Error::InvalidPetName)));
        assert_eq!(profile.name(), "Rex");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.session.pet_name = "Smaug".into();
        config.session.pet_type = PetType::Dragon;
        let profile = PetProfile::from_config(&config);
        assert_eq!(profile.name(), "Smaug");
        assert_eq!(profile.pet_type, PetType::Dragon);
        assert_eq!(profile.owned().count(), 0);
    }

    #[test]
    fn test_illustration_lookup() {
        assert_eq!(illustration(PetType::Dog, PetMood::Idle), "dog sitting");
        assert_eq!(illustration(PetType::Cat, PetMood::Energetic), "cat playing");
        assert_eq!(illustration(PetType::Dragon, PetMood::Energetic), "dragon flying");
    }
}
