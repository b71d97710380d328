const CLASSIFICATION_PROMPT: &str = "\
You identify waste items and describe them precisely enough to look up local \
disposal rules.

For every distinct item in the input:
1. Name the object as specifically as you can (\"yogurt cup\", \"LED bulb\", \"pizza box\").
2. Describe its primary material (\"PET #1 plastic\", \"corrugated cardboard\", \"lithium-ion battery\").
3. Flag contamination such as grease, food residue or leftover liquid (is_soiled) and anything hazardous (is_hazardous).
4. Record any city, state or postal code visible in the input itself as location, otherwise null.
5. Write a search query that would find the local recycling or disposal rule for it.

Do not give disposal advice.

Answer with a JSON array only, no markdown fences and no commentary. Each element:
{
  \"item_name\": \"string\",
  \"material_type\": \"string\",
  \"is_hazardous\": boolean,
  \"is_soiled\": boolean,
  \"search_query\": \"string\",
  \"location\": \"string or null\",
  \"confidence_score\": number between 0.0 and 1.0
}";

pub(super) fn classification_prompt(location_hint: Option<&str>) -> String {
    match location_hint.map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => format!("{CLASSIFICATION_PROMPT}\n\nThe user says they are in: {location}"),
        None => CLASSIFICATION_PROMPT.to_string(),
    }
}

pub(super) fn describe_text(message: &str) -> String {
    format!("Items described by the user:\n{message}")
}
