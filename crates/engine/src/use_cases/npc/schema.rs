//! JSON schema for structured NPC output and the payload it deserializes into.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::infrastructure::ports::JsonSchemaFormat;

pub const SCHEMA_NAME: &str = "generated_npc";

fn nullable(kind: &str) -> Value {
    json!({ "type": [kind, "null"] })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn bonus_list() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "bonus": { "type": "integer" }
            },
            "required": ["name", "bonus"],
            "additionalProperties": false
        }
    })
}

fn stats_schema() -> Value {
    let abilities = ["strength", "dexterity", "constitution", "intelligence", "wisdom", "charisma"];
    let ability_props: serde_json::Map<String, Value> = abilities
        .iter()
        .map(|a| {
            (
                a.to_string(),
                json!({ "type": ["integer", "null"], "minimum": 1, "maximum": 30 }),
            )
        })
        .collect();

    json!({
        "type": ["object", "null"],
        "properties": {
            "abilityScores": {
                "type": "object",
                "properties": ability_props,
                "required": abilities,
                "additionalProperties": false
            },
            "armorClass": nullable("integer"),
            "hitPoints": nullable("integer"),
            "speed": nullable("string"),
            "proficiencyBonus": nullable("integer"),
            "challengeRating": nullable("string"),
            "savingThrows": bonus_list(),
            "skills": bonus_list(),
            "languages": string_list(),
            "equipment": string_list()
        },
        "required": [
            "abilityScores", "armorClass", "hitPoints", "speed", "proficiencyBonus",
            "challengeRating", "savingThrows", "skills", "languages", "equipment"
        ],
        "additionalProperties": false
    })
}

/// Response schema; `stats` is forced to `null` when stats were not requested.
pub fn npc_schema(include_stats: bool) -> JsonSchemaFormat {
    let stats = if include_stats {
        stats_schema()
    } else {
        json!({ "type": "null" })
    };

    let schema = json!({
        "type": "object",
        "properties": {
            "name": nullable("string"),
            "alternativeNames": string_list(),
            "race": nullable("string"),
            "class": nullable("string"),
            "background": nullable("string"),
            "occupation": nullable("string"),
            "location": nullable("string"),
            "roleInStory": nullable("string"),
            "personalityTraits": string_list(),
            "ideals": nullable("string"),
            "bonds": nullable("string"),
            "flaws": nullable("string"),
            "appearance": nullable("string"),
            "mannerisms": nullable("string"),
            "stats": stats
        },
        "required": [
            "name", "alternativeNames", "race", "class", "background", "occupation",
            "location", "roleInStory", "personalityTraits", "ideals", "bonds", "flaws",
            "appearance", "mannerisms", "stats"
        ],
        "additionalProperties": false
    });

    JsonSchemaFormat {
        name: SCHEMA_NAME.to_string(),
        schema,
    }
}

/// Schema-shaped provider answer. Numbers stay wide so range checks can drop
/// single fields instead of rejecting the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredNpcPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub background: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub role_in_story: Option<String>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    pub ideals: Option<String>,
    pub bonds: Option<String>,
    pub flaws: Option<String>,
    pub appearance: Option<String>,
    pub mannerisms: Option<String>,
    pub stats: Option<StructuredStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredStats {
    #[serde(default)]
    pub ability_scores: StructuredAbilityScores,
    pub armor_class: Option<i64>,
    pub hit_points: Option<i64>,
    pub speed: Option<String>,
    pub proficiency_bonus: Option<i64>,
    pub challenge_rating: Option<String>,
    #[serde(default)]
    pub saving_throws: Vec<StructuredBonus>,
    #[serde(default)]
    pub skills: Vec<StructuredBonus>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredAbilityScores {
    pub strength: Option<i64>,
    pub dexterity: Option<i64>,
    pub constitution: Option<i64>,
    pub intelligence: Option<i64>,
    pub wisdom: Option<i64>,
    pub charisma: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredBonus {
    pub name: String,
    pub bonus: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_nulled_when_not_requested() {
        let format = npc_schema(false);
        assert_eq!(format.name, SCHEMA_NAME);
        assert_eq!(format.schema["properties"]["stats"], json!({ "type": "null" }));

        let with_stats = npc_schema(true);
        assert_eq!(
            with_stats.schema["properties"]["stats"]["properties"]["abilityScores"]["properties"]
                ["wisdom"]["maximum"],
            30
        );
    }

    #[test]
    fn every_property_is_required() {
        let schema = npc_schema(true).schema;
        let properties = schema["properties"].as_object().unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(properties.len(), required.len());
        for key in properties.keys() {
            assert!(required.contains(&json!(key)), "{key} missing from required");
        }
    }

    #[test]
    fn payload_tolerates_nulls_and_missing_lists() {
        let payload: StructuredNpcPayload = serde_json::from_value(json!({
            "name": "Elda",
            "race": "Human",
            "class": null,
            "stats": null
        }))
        .unwrap();
        assert_eq!(payload.name.as_deref(), Some("Elda"));
        assert!(payload.alternative_names.is_empty());
        assert!(payload.stats.is_none());
    }
}
