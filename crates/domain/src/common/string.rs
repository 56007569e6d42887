//! Text normalization helpers for user input and generated content.

/// Trims an optional string, collapsing blank values to `None`.
///
/// # Examples
///
/// ```
/// use npcforge_domain::common::clean_text;
///
/// assert_eq!(clean_text(Some("  Elf ".to_string())), Some("Elf".to_string()));
/// assert_eq!(clean_text(Some("   ".to_string())), None);
/// assert_eq!(clean_text(None), None);
/// ```
pub fn clean_text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims every item of a list and drops the ones that end up empty.
///
/// # Examples
///
/// ```
/// use npcforge_domain::common::clean_list;
///
/// let tags = vec![" favorite ".to_string(), "".to_string(), "villain".to_string()];
/// assert_eq!(clean_list(tags), vec!["favorite", "villain"]);
/// ```
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| clean_text(Some(v)))
        .collect()
}

/// Removes markdown bold/underline markers (`**`, `__`) and trims the result.
///
/// LLMs like to emphasize labels and values even when asked for plain text.
///
/// # Examples
///
/// ```
/// use npcforge_domain::common::strip_emphasis;
///
/// assert_eq!(strip_emphasis("**Elda Brightwater**"), "Elda Brightwater");
/// assert_eq!(strip_emphasis(" __quiet__ and **shy** "), "quiet and shy");
/// ```
pub fn strip_emphasis(value: &str) -> String {
    value.replace("**", "").replace("__", "").trim().to_string()
}
