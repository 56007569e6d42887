//! D&D 5e statistics block attached to an NPC when stats were requested.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    /// Accepts full names and the usual three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ability::ALL
            .into_iter()
            .find(|a| a.as_str() == lower || a.abbreviation() == lower)
            .ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// Ability scores; each one is optional because generators skip some.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wisdom: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charisma: Option<u8>,
}

impl AbilityScores {
    pub const MIN_SCORE: i64 = 1;
    pub const MAX_SCORE: i64 = 30;

    fn check(ability: Ability, value: i64) -> Result<(), DomainError> {
        if (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&value) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "{} must be between {} and {}, got {}",
                ability,
                Self::MIN_SCORE,
                Self::MAX_SCORE,
                value
            )))
        }
    }

    /// Set a score, rejecting values outside 1..=30.
    pub fn set(&mut self, ability: Ability, value: i64) -> Result<(), DomainError> {
        Self::check(ability, value)?;
        let score = Some(value as u8);
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
        Ok(())
    }

    pub fn get(&self, ability: Ability) -> Option<u8> {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn is_empty(&self) -> bool {
        Ability::ALL.iter().all(|a| self.get(*a).is_none())
    }

    /// Check every present score; deserialized blocks bypass `set`.
    pub fn validate(&self) -> Result<(), DomainError> {
        Ability::ALL.into_iter().try_for_each(|ability| match self.get(ability) {
            Some(score) => Self::check(ability, i64::from(score)),
            None => Ok(()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub ability: Ability,
    pub bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBonus {
    pub name: String,
    pub bonus: i32,
}

/// Stat block for an NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcStats {
    #[serde(default)]
    pub ability_scores: AbilityScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_class: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_rating: Option<String>,
    #[serde(default)]
    pub saving_throws: Vec<SavingThrow>,
    #[serde(default)]
    pub skills: Vec<SkillBonus>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

impl NpcStats {
    /// True when nothing at all was captured.
    pub fn is_empty(&self) -> bool {
        self.ability_scores.is_empty()
            && self.armor_class.is_none()
            && self.hit_points.is_none()
            && self.speed.is_none()
            && self.proficiency_bonus.is_none()
            && self.challenge_rating.is_none()
            && self.saving_throws.is_empty()
            && self.skills.is_empty()
            && self.languages.is_empty()
            && self.equipment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_parses_names_and_abbreviations() {
        assert_eq!("Dexterity".parse::<Ability>(), Ok(Ability::Dexterity));
        assert_eq!("WIS".parse::<Ability>(), Ok(Ability::Wisdom));
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn ability_scores_are_bounded() {
        let mut scores = AbilityScores::default();
        assert!(scores.is_empty());
        scores.set(Ability::Strength, 18).expect("in range");
        assert_eq!(scores.strength, Some(18));
        assert!(scores.set(Ability::Wisdom, 0).is_err());
        assert!(scores.set(Ability::Wisdom, 31).is_err());
        assert_eq!(scores.wisdom, None);
        assert!(!scores.is_empty());
    }

    #[test]
    fn deserialized_scores_are_validated() {
        let scores: AbilityScores =
            serde_json::from_str(r#"{"strength": 99, "wisdom": 12}"#).expect("parse scores");
        assert!(scores.validate().is_err());

        let scores: AbilityScores =
            serde_json::from_str(r#"{"strength": 30, "wisdom": 1}"#).expect("parse scores");
        assert!(scores.validate().is_ok());
    }

    #[test]
    fn empty_stats_detected() {
        let mut stats = NpcStats::default();
        assert!(stats.is_empty());
        stats.languages.push("Common".to_string());
        assert!(!stats.is_empty());
    }
}
