//! Prompt construction for NPC generation.

use std::fmt::Write;

use npcforge_domain::{GenerationRequest, GenerationSettings};

/// Persona sent as the system message on every generation.
pub const SYSTEM_PROMPT: &str = "You are an expert D&D Dungeon Master and character creator. \
Generate detailed, creative NPCs that fit seamlessly into D&D campaigns. \
Always provide structured responses that can be easily parsed.";

/// How the provider is expected to shape its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A JSON document constrained by a response schema
    Structured,
    /// `Label: value` lines
    LabeledText,
}

const CORE_LABELS: &[&str] = &[
    "Name",
    "Alternative Names",
    "Race",
    "Class",
    "Background",
    "Occupation",
    "Location",
    "Role in Story",
    "Personality Traits",
    "Ideals",
    "Bonds",
    "Flaws",
    "Appearance",
    "Mannerisms",
];

const STAT_LABELS: &[&str] = &[
    "Strength",
    "Dexterity",
    "Constitution",
    "Intelligence",
    "Wisdom",
    "Charisma",
    "Armor Class",
    "Hit Points",
    "Speed",
    "Proficiency Bonus",
    "Challenge Rating",
    "Saving Throws",
    "Skills",
    "Languages",
    "Equipment",
];

/// Build the user prompt for a generation request.
///
/// Pure: the same inputs always produce the same text.
pub fn build_npc_prompt(
    request: &GenerationRequest,
    settings: &GenerationSettings,
    mode: OutputMode,
) -> String {
    let mut prompt = String::from("Generate a D&D NPC with the following requirements:\n\n");
    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "Role: {}", request.role);
    let _ = writeln!(prompt, "Story Integration: {}", request.story_fit);

    if let Some(context) = &request.campaign_context {
        let _ = writeln!(prompt, "Campaign Context: {context}");
    }

    let traits = &request.desired_traits;
    if !traits.is_empty() {
        prompt.push_str("\nDesired Traits:\n");
        let hints = [
            ("Race", &traits.race),
            ("Name", &traits.name),
            ("Class", &traits.class),
            ("Personality", &traits.personality_traits),
            ("Appearance", &traits.appearance),
            ("Other", &traits.other),
        ];
        for (label, value) in hints {
            if let Some(value) = value {
                let _ = writeln!(prompt, "- {label}: {value}");
            }
        }
    }

    let _ = writeln!(
        prompt,
        "\nGeneration Style: {} creativity, {} setting, {} tone",
        settings.creativity_level, settings.setting_style, settings.tone
    );

    prompt.push_str("\nPlease provide:\n");
    prompt.push_str("1. Primary name and 3-5 alternative name options\n");
    prompt.push_str("2. Race, class, and background\n");
    prompt.push_str("3. Personality traits, ideals, bonds, and flaws\n");
    prompt.push_str("4. Physical appearance and mannerisms\n");
    prompt.push_str("5. Occupation and typical location\n");
    prompt.push_str("6. How they integrate into the story/campaign\n");

    if request.include_stats {
        prompt.push_str(
            "7. Full D&D 5e stats including ability scores, AC, HP, speed, proficiency bonus, \
             challenge rating, saving throws, skills, languages, and equipment\n",
        );
    } else {
        prompt.push_str("\nDo not include game statistics.\n");
    }

    match mode {
        OutputMode::Structured => {
            prompt.push_str("\nRespond with a JSON object matching the provided schema.");
        }
        OutputMode::LabeledText => {
            prompt.push_str(
                "\nFormat the response as a character sheet with exactly one `Label: value` \
                 pair per line. Separate multiple values with commas. Use these labels:\n",
            );
            let mut labels = CORE_LABELS.to_vec();
            if request.include_stats {
                labels.extend_from_slice(STAT_LABELS);
            }
            let _ = writeln!(prompt, "{}", labels.join(", "));
        }
    }

    prompt
}
