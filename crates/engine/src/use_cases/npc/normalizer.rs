//! Turn raw provider output into a `GeneratedNpc`.
//!
//! Two strategies share one interface, picked once from the provider capability
//! flag:
//! - `StructuredNormalizer` - schema-shaped JSON mapped field by field
//! - `LabeledTextNormalizer` - `Label: value` lines, tolerant of bullets, numbering
//!   and bold markers
//!
//! Missing optional fields never fail normalization. A single malformed value
//! (non-numeric AC, ability score outside 1..=30) only leaves that field unset.

use std::sync::{Arc, LazyLock};

use npcforge_domain::common::{clean_list, clean_text, strip_emphasis};
use npcforge_domain::{Ability, AbilityScores, GeneratedNpc, NpcStats, SavingThrow, SkillBonus};
use regex_lite::Regex;

use super::prompt::OutputMode;
use super::schema::{StructuredBonus, StructuredNpcPayload, StructuredStats};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("provider returned no content")]
    Empty,
    #[error("provider output is not valid NPC JSON: {0}")]
    Malformed(String),
}

pub trait ResponseNormalizer: Send + Sync {
    /// The answer shape this strategy expects, used when building the prompt.
    fn output_mode(&self) -> OutputMode;

    /// Parse provider output. Stats are dropped unless `include_stats` is set.
    fn normalize(&self, raw: &str, include_stats: bool) -> Result<GeneratedNpc, NormalizeError>;
}

/// Pick the strategy matching the provider's capability.
pub fn normalizer_for(structured_output: bool) -> Arc<dyn ResponseNormalizer> {
    if structured_output {
        Arc::new(StructuredNormalizer)
    } else {
        Arc::new(LabeledTextNormalizer)
    }
}

// =============================================================================
// Shared cleanup
// =============================================================================

// Regex to remove model-specific special tokens (e.g., from gpt-oss, llama, etc.)
static SPECIAL_TOKENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // - <|...|> style tokens
    // - [INST], [/INST] tokens (llama)
    // - <<SYS>>, <</SYS>> tokens (llama)
    Regex::new(r"<\|[^|>]+\|>|\[/?INST\]|<</?SYS>>").expect("valid regex")
});

// gpt-oss: <|channel|>analysis<|message|>...<|end|><|start|>assistant<|channel|>final<|message|>CONTENT
static FINAL_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\|channel\|>final<\|message\|>(.*)$").expect("valid regex"));

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\n?\s*```$").expect("valid regex")
});

/// Remove model-specific special tokens that may leak through from LLM output.
pub fn strip_special_tokens(raw: &str) -> String {
    if let Some(content) = FINAL_CONTENT_RE.captures(raw).and_then(|caps| caps.get(1)) {
        return SPECIAL_TOKENS_RE
            .replace_all(content.as_str().trim(), "")
            .to_string();
    }
    SPECIAL_TOKENS_RE.replace_all(raw, "").to_string()
}

fn clean_value(value: Option<String>) -> Option<String> {
    clean_text(value.map(|v| strip_emphasis(&v)))
}

fn clean_values(values: Vec<String>) -> Vec<String> {
    clean_list(values.iter().map(|v| strip_emphasis(v)).collect())
}

fn set_ability(scores: &mut AbilityScores, ability: Ability, value: i64) {
    if let Err(e) = scores.set(ability, value) {
        tracing::debug!(error = %e, "Dropping out-of-range ability score");
    }
}

fn non_negative(field: &'static str, value: Option<i64>) -> Option<u32> {
    let value = value?;
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::debug!(field, value, "Dropping negative stat value");
            None
        }
    }
}

fn finish_stats(stats: NpcStats) -> Option<NpcStats> {
    (!stats.is_empty()).then_some(stats)
}

// =============================================================================
// Structured
// =============================================================================

/// Maps the schema-validated JSON payload 1:1.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredNormalizer;

impl StructuredNormalizer {
    fn convert_stats(stats: StructuredStats) -> Option<NpcStats> {
        let mut ability_scores = AbilityScores::default();
        let scores = &stats.ability_scores;
        let raw = [
            (Ability::Strength, scores.strength),
            (Ability::Dexterity, scores.dexterity),
            (Ability::Constitution, scores.constitution),
            (Ability::Intelligence, scores.intelligence),
            (Ability::Wisdom, scores.wisdom),
            (Ability::Charisma, scores.charisma),
        ];
        for (ability, value) in raw {
            if let Some(value) = value {
                set_ability(&mut ability_scores, ability, value);
            }
        }

        let saving_throws = stats
            .saving_throws
            .into_iter()
            .filter_map(|StructuredBonus { name, bonus }| {
                let ability = name.parse::<Ability>().ok()?;
                Some(SavingThrow {
                    ability,
                    bonus: i32::try_from(bonus).ok()?,
                })
            })
            .collect();

        let skills = stats
            .skills
            .into_iter()
            .filter_map(|StructuredBonus { name, bonus }| {
                Some(SkillBonus {
                    name: clean_value(Some(name))?,
                    bonus: i32::try_from(bonus).ok()?,
                })
            })
            .collect();

        finish_stats(NpcStats {
            ability_scores,
            armor_class: non_negative("armorClass", stats.armor_class),
            hit_points: non_negative("hitPoints", stats.hit_points),
            speed: clean_value(stats.speed),
            proficiency_bonus: stats.proficiency_bonus.and_then(|b| i32::try_from(b).ok()),
            challenge_rating: clean_value(stats.challenge_rating),
            saving_throws,
            skills,
            languages: clean_values(stats.languages),
            equipment: clean_values(stats.equipment),
        })
    }
}

impl ResponseNormalizer for StructuredNormalizer {
    fn output_mode(&self) -> OutputMode {
        OutputMode::Structured
    }

    fn normalize(&self, raw: &str, include_stats: bool) -> Result<GeneratedNpc, NormalizeError> {
        let cleaned = strip_special_tokens(raw);
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return Err(NormalizeError::Empty);
        }
        let json = CODE_FENCE_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map_or(trimmed, |m| m.as_str());

        let payload: StructuredNpcPayload =
            serde_json::from_str(json).map_err(|e| NormalizeError::Malformed(e.to_string()))?;

        let stats = if include_stats {
            payload.stats.and_then(Self::convert_stats)
        } else {
            None
        };

        Ok(GeneratedNpc {
            name: clean_value(payload.name),
            alternative_names: clean_values(payload.alternative_names),
            race: clean_value(payload.race),
            class: clean_value(payload.class),
            background: clean_value(payload.background),
            occupation: clean_value(payload.occupation),
            location: clean_value(payload.location),
            role_in_story: clean_value(payload.role_in_story),
            personality_traits: clean_values(payload.personality_traits),
            ideals: clean_value(payload.ideals),
            bonds: clean_value(payload.bonds),
            flaws: clean_value(payload.flaws),
            appearance: clean_value(payload.appearance),
            mannerisms: clean_value(payload.mannerisms),
            stats,
            ..Default::default()
        })
    }
}

// =============================================================================
// Labeled text
// =============================================================================

// After emphasis is stripped: optional heading hashes, bullet or list number, then
// `Label: value`. Labels are short runs of letters, spaces, slashes and parens.
static LABEL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#*\s*(?:[-*•]\s+|\d+[.)]\s*)?([A-Za-z][A-Za-z /()']{0,40}?)\s*:\s*(.*)$")
        .expect("valid regex")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+").expect("valid regex"));

static UNSIGNED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

// "STR 10 (+0), DEX 14" or "Strength: 10"
static ABILITY_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s*:?\s*(\d+)").expect("valid regex"));

// "Dex +4" or "Perception -1"
static BONUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*([+-]\s*\d+)$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    AlternativeNames,
    Race,
    Class,
    Background,
    Occupation,
    Location,
    RoleInStory,
    PersonalityTraits,
    Ideals,
    Bonds,
    Flaws,
    Appearance,
    Mannerisms,
    Score(Ability),
    AbilityScores,
    ArmorClass,
    HitPoints,
    Speed,
    ProficiencyBonus,
    ChallengeRating,
    SavingThrows,
    Skills,
    Languages,
    Equipment,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        let key = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        let key = key.trim_end_matches("(s)");

        let field = match key {
            "name" | "primary name" => Field::Name,
            "alternative names" | "alternative name" | "alternate names" | "other names"
            | "other name" | "aliases" => Field::AlternativeNames,
            "race" => Field::Race,
            "class" => Field::Class,
            "background" => Field::Background,
            "occupation" => Field::Occupation,
            "location" | "where to find" | "typical location" => Field::Location,
            "role in story" | "story integration" => Field::RoleInStory,
            "personality traits" | "personality trait" | "personality" => {
                Field::PersonalityTraits
            }
            "ideals" | "ideal" => Field::Ideals,
            "bonds" | "bond" => Field::Bonds,
            "flaws" | "flaw" => Field::Flaws,
            "appearance" | "physical description" | "physical appearance" => Field::Appearance,
            "mannerisms" | "mannerism" => Field::Mannerisms,
            "ability scores" => Field::AbilityScores,
            "armor class" | "armour class" | "ac" => Field::ArmorClass,
            "hit points" | "hp" => Field::HitPoints,
            "speed" => Field::Speed,
            "proficiency bonus" | "proficiency" => Field::ProficiencyBonus,
            "challenge rating" | "challenge" | "cr" => Field::ChallengeRating,
            "saving throws" | "saving throw" | "saves" => Field::SavingThrows,
            "skills" | "skill" => Field::Skills,
            "languages" | "language" => Field::Languages,
            "equipment" | "gear" => Field::Equipment,
            other => return other.parse::<Ability>().ok().map(Field::Score),
        };
        Some(field)
    }

    fn is_stat(self) -> bool {
        matches!(
            self,
            Field::Score(_)
                | Field::AbilityScores
                | Field::ArmorClass
                | Field::HitPoints
                | Field::Speed
                | Field::ProficiencyBonus
                | Field::ChallengeRating
                | Field::SavingThrows
                | Field::Skills
                | Field::Languages
                | Field::Equipment
        )
    }
}

fn split_list(value: &str) -> Vec<String> {
    clean_list(value.split([',', ';']).map(str::to_string).collect())
}

fn first_integer(re: &Regex, field: &'static str, value: &str) -> Option<i64> {
    let parsed = re
        .find(value)
        .and_then(|m| m.as_str().replace(' ', "").parse::<i64>().ok());
    if parsed.is_none() {
        tracing::debug!(field, value, "Dropping non-numeric stat value");
    }
    parsed
}

fn parse_bonuses(value: &str) -> Vec<(String, i32)> {
    split_list(value)
        .into_iter()
        .filter_map(|item| {
            let caps = BONUS_RE.captures(&item)?;
            let bonus = caps[2].replace(' ', "").parse::<i32>().ok()?;
            Some((caps[1].trim().to_string(), bonus))
        })
        .collect()
}

/// Extracts `Label: value` lines from free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledTextNormalizer;

impl LabeledTextNormalizer {
    /// First occurrence of each recognized label, in document order.
    fn labeled_lines(text: &str) -> Vec<(Field, String)> {
        let mut seen = Vec::new();
        let mut found = Vec::new();
        for line in text.lines() {
            let line = strip_emphasis(line);
            let Some(caps) = LABEL_LINE_RE.captures(&line) else {
                continue;
            };
            let Some(field) = Field::from_label(&caps[1]) else {
                continue;
            };
            let value = caps[2].trim();
            if value.is_empty() || seen.contains(&field) {
                continue;
            }
            seen.push(field);
            found.push((field, value.to_string()));
        }
        found
    }

    fn apply_stat(stats: &mut NpcStats, field: Field, value: &str) {
        match field {
            Field::Score(ability) => {
                if let Some(score) = first_integer(&UNSIGNED_RE, ability.as_str(), value) {
                    set_ability(&mut stats.ability_scores, ability, score);
                }
            }
            Field::AbilityScores => {
                for caps in ABILITY_PAIR_RE.captures_iter(value) {
                    let (Ok(ability), Ok(score)) =
                        (caps[1].parse::<Ability>(), caps[2].parse::<i64>())
                    else {
                        continue;
                    };
                    if stats.ability_scores.get(ability).is_none() {
                        set_ability(&mut stats.ability_scores, ability, score);
                    }
                }
            }
            Field::ArmorClass => {
                stats.armor_class = first_integer(&UNSIGNED_RE, "armorClass", value)
                    .and_then(|v| u32::try_from(v).ok());
            }
            Field::HitPoints => {
                stats.hit_points = first_integer(&UNSIGNED_RE, "hitPoints", value)
                    .and_then(|v| u32::try_from(v).ok());
            }
            Field::Speed => stats.speed = clean_text(Some(value.to_string())),
            Field::ProficiencyBonus => {
                stats.proficiency_bonus = first_integer(&INTEGER_RE, "proficiencyBonus", value)
                    .and_then(|v| i32::try_from(v).ok());
            }
            Field::ChallengeRating => {
                stats.challenge_rating = clean_text(Some(value.to_string()));
            }
            Field::SavingThrows => {
                stats.saving_throws = parse_bonuses(value)
                    .into_iter()
                    .filter_map(|(name, bonus)| {
                        let ability = name.parse::<Ability>().ok()?;
                        Some(SavingThrow { ability, bonus })
                    })
                    .collect();
            }
            Field::Skills => {
                stats.skills = parse_bonuses(value)
                    .into_iter()
                    .map(|(name, bonus)| SkillBonus { name, bonus })
                    .collect();
            }
            Field::Languages => stats.languages = split_list(value),
            Field::Equipment => stats.equipment = split_list(value),
            _ => {}
        }
    }
}

impl ResponseNormalizer for LabeledTextNormalizer {
    fn output_mode(&self) -> OutputMode {
        OutputMode::LabeledText
    }

    fn normalize(&self, raw: &str, include_stats: bool) -> Result<GeneratedNpc, NormalizeError> {
        let text = strip_special_tokens(raw);
        if text.trim().is_empty() {
            return Err(NormalizeError::Empty);
        }

        let mut npc = GeneratedNpc::default();
        let mut stats = NpcStats::default();

        for (field, value) in Self::labeled_lines(&text) {
            if field.is_stat() {
                if include_stats {
                    Self::apply_stat(&mut stats, field, &value);
                }
                continue;
            }

            let cleaned = clean_text(Some(value.clone()));
            match field {
                Field::Name => npc.name = cleaned,
                Field::AlternativeNames => npc.alternative_names = split_list(&value),
                Field::Race => npc.race = cleaned,
                Field::Class => npc.class = cleaned,
                Field::Background => npc.background = cleaned,
                Field::Occupation => npc.occupation = cleaned,
                Field::Location => npc.location = cleaned,
                Field::RoleInStory => npc.role_in_story = cleaned,
                Field::PersonalityTraits => npc.personality_traits = split_list(&value),
                Field::Ideals => npc.ideals = cleaned,
                Field::Bonds => npc.bonds = cleaned,
                Field::Flaws => npc.flaws = cleaned,
                Field::Appearance => npc.appearance = cleaned,
                Field::Mannerisms => npc.mannerisms = cleaned,
                _ => {}
            }
        }

        if include_stats {
            npc.stats = finish_stats(stats);
        }
        Ok(npc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_and_class_only() {
        let npc = LabeledTextNormalizer
            .normalize("Race: Elf\nClass: Rogue\n", false)
            .unwrap();
        assert_eq!(npc.race.as_deref(), Some("Elf"));
        assert_eq!(npc.class.as_deref(), Some("Rogue"));
        assert_eq!(
            npc,
            GeneratedNpc {
                race: Some("Elf".into()),
                class: Some("Rogue".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn tolerates_bullets_numbering_and_bold() {
        let raw = "\
## Character Sheet
1. **Primary Name:** Elda Brightwater
- **Alternative Names**: Ellie, The Widow of the Wharf, ,
* __Where to find__: The Gilded Anchor tavern
2) Story Integration: Knows who sank the *Sea Maiden*
Personality Traits: curious, stubborn
Physical Description: Weathered hands, silver braid";
        let npc = LabeledTextNormalizer.normalize(raw, false).unwrap();
        assert_eq!(npc.name.as_deref(), Some("Elda Brightwater"));
        assert_eq!(
            npc.alternative_names,
            vec!["Ellie", "The Widow of the Wharf"]
        );
        assert_eq!(npc.location.as_deref(), Some("The Gilded Anchor tavern"));
        assert_eq!(
            npc.role_in_story.as_deref(),
            Some("Knows who sank the *Sea Maiden*")
        );
        assert_eq!(npc.personality_traits, vec!["curious", "stubborn"]);
        assert_eq!(
            npc.appearance.as_deref(),
            Some("Weathered hands, silver braid")
        );
    }

    #[test]
    fn first_label_wins() {
        let npc = LabeledTextNormalizer
            .normalize("Name: Elda\nName: Borin", false)
            .unwrap();
        assert_eq!(npc.name.as_deref(), Some("Elda"));
    }

    #[test]
    fn parses_stats_when_requested() {
        let raw = "\
Name: Borin
Strength: 16 (+3)
DEX: 12
Constitution: 40
Wisdom: lots
Armor Class: 16 (chain mail)
Hit Points: 27 (5d8 + 5)
Speed: 25 ft.
Proficiency Bonus: +2
Challenge Rating: 1/2
Saving Throws: Str +5, Con +4, Luck +9
Skills: Athletics +5, Perception -1
Languages: Common, Dwarvish
Equipment: warhammer, shield";
        let npc = LabeledTextNormalizer.normalize(raw, true).unwrap();
        let stats = npc.stats.unwrap();
        assert_eq!(stats.ability_scores.strength, Some(16));
        assert_eq!(stats.ability_scores.dexterity, Some(12));
        assert_eq!(stats.ability_scores.constitution, None);
        assert_eq!(stats.ability_scores.wisdom, None);
        assert_eq!(stats.armor_class, Some(16));
        assert_eq!(stats.hit_points, Some(27));
        assert_eq!(stats.speed.as_deref(), Some("25 ft."));
        assert_eq!(stats.proficiency_bonus, Some(2));
        assert_eq!(stats.challenge_rating.as_deref(), Some("1/2"));
        assert_eq!(
            stats.saving_throws,
            vec![
                SavingThrow { ability: Ability::Strength, bonus: 5 },
                SavingThrow { ability: Ability::Constitution, bonus: 4 },
            ]
        );
        assert_eq!(
            stats.skills,
            vec![
                SkillBonus { name: "Athletics".into(), bonus: 5 },
                SkillBonus { name: "Perception".into(), bonus: -1 },
            ]
        );
        assert_eq!(stats.languages, vec!["Common", "Dwarvish"]);
        assert_eq!(stats.equipment, vec!["warhammer", "shield"]);
    }

    #[test]
    fn ability_score_line_is_split() {
        let npc = LabeledTextNormalizer
            .normalize("Ability Scores: STR 10, DEX 14, CON 12, INT 8, WIS 13, CHA 15", true)
            .unwrap();
        let scores = npc.stats.unwrap().ability_scores;
        assert_eq!(scores.dexterity, Some(14));
        assert_eq!(scores.charisma, Some(15));
    }

    #[test]
    fn stats_suppressed_unless_requested() {
        let raw = "Name: Borin\nArmor Class: 16\nStrength: 16";
        let npc = LabeledTextNormalizer.normalize(raw, false).unwrap();
        assert_eq!(npc.name.as_deref(), Some("Borin"));
        assert!(npc.stats.is_none());
    }

    #[test]
    fn non_numeric_armor_class_leaves_stats_unset() {
        let npc = LabeledTextNormalizer
            .normalize("Armor Class: sturdy", true)
            .unwrap();
        assert!(npc.stats.is_none());
    }

    #[test]
    fn strips_special_tokens_before_parsing() {
        let raw = "<|channel|>analysis<|message|>Name: Wrong<|end|><|start|>assistant<|channel|>final<|message|>Name: Elda";
        let npc = LabeledTextNormalizer.normalize(raw, false).unwrap();
        assert_eq!(npc.name.as_deref(), Some("Elda"));
    }

    #[test]
    fn empty_output_is_an_error() {
        assert_eq!(
            LabeledTextNormalizer.normalize("  \n", false),
            Err(NormalizeError::Empty)
        );
        assert_eq!(
            StructuredNormalizer.normalize("", false),
            Err(NormalizeError::Empty)
        );
    }

    #[test]
    fn structured_maps_fields_and_strips_bold() {
        let raw = r#"{
            "name": "**Elda**",
            "alternativeNames": ["Ellie", "", "__Widow__"],
            "race": "Human",
            "class": null,
            "background": null,
            "occupation": "Merchant",
            "location": null,
            "roleInStory": "Quest giver",
            "personalityTraits": ["shrewd"],
            "ideals": null, "bonds": null, "flaws": null,
            "appearance": null, "mannerisms": null,
            "stats": null
        }"#;
        let npc = StructuredNormalizer.normalize(raw, false).unwrap();
        assert_eq!(npc.name.as_deref(), Some("Elda"));
        assert_eq!(npc.alternative_names, vec!["Ellie", "Widow"]);
        assert_eq!(npc.race.as_deref(), Some("Human"));
        assert_eq!(npc.occupation.as_deref(), Some("Merchant"));
        assert!(npc.class.is_none());
        assert!(npc.stats.is_none());
    }

    #[test]
    fn structured_accepts_code_fences() {
        let raw = "```json\n{\"name\": \"Elda\"}\n```";
        let npc = StructuredNormalizer.normalize(raw, false).unwrap();
        assert_eq!(npc.name.as_deref(), Some("Elda"));
    }

    #[test]
    fn structured_drops_stats_unless_requested() {
        let raw = r#"{"name": "Borin", "stats": {"abilityScores": {"strength": 16}, "armorClass": 16}}"#;
        assert!(StructuredNormalizer.normalize(raw, false).unwrap().stats.is_none());

        let stats = StructuredNormalizer.normalize(raw, true).unwrap().stats.unwrap();
        assert_eq!(stats.ability_scores.strength, Some(16));
        assert_eq!(stats.armor_class, Some(16));
    }

    #[test]
    fn structured_drops_out_of_range_fields_only() {
        let raw = r#"{"stats": {"abilityScores": {"strength": 35, "wisdom": 12}, "armorClass": -3, "hitPoints": 9}}"#;
        let stats = StructuredNormalizer.normalize(raw, true).unwrap().stats.unwrap();
        assert_eq!(stats.ability_scores.strength, None);
        assert_eq!(stats.ability_scores.wisdom, Some(12));
        assert_eq!(stats.armor_class, None);
        assert_eq!(stats.hit_points, Some(9));
    }

    #[test]
    fn structured_rejects_non_json_and_wrong_types() {
        assert!(matches!(
            StructuredNormalizer.normalize("Name: Elda", false),
            Err(NormalizeError::Malformed(_))
        ));
        assert!(matches!(
            StructuredNormalizer.normalize(r#"{"name": 42}"#, false),
            Err(NormalizeError::Malformed(_))
        ));
    }

    #[test]
    fn factory_follows_capability() {
        assert_eq!(normalizer_for(true).output_mode(), OutputMode::Structured);
        assert_eq!(normalizer_for(false).output_mode(), OutputMode::LabeledText);
    }
}
