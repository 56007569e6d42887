//! What the DM asked for, and how the generator should go about it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::clean_text;
use crate::DomainError;

/// Optional hints the generated NPC should respect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DesiredTraits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_traits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl DesiredTraits {
    /// Trim every hint; blank hints become `None`.
    pub fn cleaned(self) -> Self {
        Self {
            race: clean_text(self.race),
            name: clean_text(self.name),
            class: clean_text(self.class),
            personality_traits: clean_text(self.personality_traits),
            appearance: clean_text(self.appearance),
            other: clean_text(self.other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.race.is_none()
            && self.name.is_none()
            && self.class.is_none()
            && self.personality_traits.is_none()
            && self.appearance.is_none()
            && self.other.is_none()
    }
}

/// The DM's generation request, stored with the record so it can be regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationRequest {
    pub role: String,
    pub story_fit: String,
    #[serde(default)]
    pub desired_traits: DesiredTraits,
    #[serde(default)]
    pub include_stats: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_context: Option<String>,
}

impl GenerationRequest {
    /// Build a validated request from the two required fields.
    pub fn new(
        role: impl Into<String>,
        story_fit: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self {
            role: role.into(),
            story_fit: story_fit.into(),
            desired_traits: DesiredTraits::default(),
            include_stats: false,
            campaign_context: None,
        }
        .validated()
    }

    pub fn with_desired_traits(mut self, traits: DesiredTraits) -> Self {
        self.desired_traits = traits.cleaned();
        self
    }

    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    pub fn with_campaign_context(mut self, context: Option<String>) -> Self {
        self.campaign_context = clean_text(context);
        self
    }

    /// Trim all text and reject requests missing a role or story fit.
    pub fn validated(self) -> Result<Self, DomainError> {
        let role = self.role.trim().to_string();
        let story_fit = self.story_fit.trim().to_string();

        if role.is_empty() || story_fit.is_empty() {
            return Err(DomainError::validation(
                "Role and story fit are required fields",
            ));
        }

        Ok(Self {
            role,
            story_fit,
            desired_traits: self.desired_traits.cleaned(),
            include_stats: self.include_stats,
            campaign_context: clean_text(self.campaign_context),
        })
    }
}

/// How adventurous the generator should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativityLevel {
    Conservative,
    #[default]
    Balanced,
    Creative,
}

impl CreativityLevel {
    /// Sampling temperature for this band.
    pub fn temperature(self) -> f32 {
        match self {
            CreativityLevel::Conservative => 0.3,
            CreativityLevel::Balanced => 0.6,
            CreativityLevel::Creative => 0.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreativityLevel::Conservative => "conservative",
            CreativityLevel::Balanced => "balanced",
            CreativityLevel::Creative => "creative",
        }
    }
}

impl fmt::Display for CreativityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingStyle {
    #[default]
    HighFantasy,
    LowFantasy,
    Modern,
    SciFi,
    Custom,
}

impl SettingStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingStyle::HighFantasy => "high-fantasy",
            SettingStyle::LowFantasy => "low-fantasy",
            SettingStyle::Modern => "modern",
            SettingStyle::SciFi => "sci-fi",
            SettingStyle::Custom => "custom",
        }
    }
}

impl fmt::Display for SettingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Serious,
    Lighthearted,
    Dark,
    Comedic,
    #[default]
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Serious => "serious",
            Tone::Lighthearted => "lighthearted",
            Tone::Dark => "dark",
            Tone::Comedic => "comedic",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style knobs for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationSettings {
    #[serde(default)]
    pub creativity_level: CreativityLevel,
    #[serde(default)]
    pub setting_style: SettingStyle,
    #[serde(default)]
    pub tone: Tone,
}
