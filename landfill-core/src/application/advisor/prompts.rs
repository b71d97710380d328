use serde::Serialize;

use crate::domain::ClassifiedItem;

/// Used when the caller gave no location
const UNKNOWN_LOCATION: &str = "Unknown";

const INSTRUCTION_SCHEMA: &str = "\
{
  \"item_name\": \"string, exactly as given below\",
  \"material_type\": \"string, exactly as given below\",
  \"instruction\": \"1-3 sentences of specific disposal advice\"
}";

#[derive(Serialize)]
struct ItemBrief<'a> {
    item_name: &'a str,
    material_type: &'a str,
    is_hazardous: bool,
    is_soiled: bool,
    search_query: &'a str,
}

fn items_json(items: &[ClassifiedItem]) -> String {
    let briefs: Vec<ItemBrief<'_>> = items
        .iter()
        .map(|item| ItemBrief {
            item_name: &item.item_name,
            material_type: &item.material_type,
            is_hazardous: item.is_hazardous,
            is_soiled: item.is_soiled,
            search_query: &item.search_query,
        })
        .collect();
    serde_json::to_string_pretty(&briefs).unwrap_or_else(|_| "[]".to_string())
}

fn location_or_unknown(location: Option<&str>) -> &str {
    location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(UNKNOWN_LOCATION)
}

pub(super) fn agentic_prompt(items: &[ClassifiedItem], location: Option<&str>) -> String {
    let location = location_or_unknown(location);
    format!(
        "You advise people on how to dispose of waste and you can search the web.\n\
         \n\
         User location: {location}\n\
         \n\
         1. For every item below, look up the CURRENT disposal rules that apply in the user's \
         location. Start from the item's search_query combined with the location.\n\
         2. If a search only returns generic advice, search again more specifically, for example \
         \"{location} curbside recycling\" or \"{location} household hazardous waste drop-off\".\n\
         3. Stop searching once you have specific local policy for each item.\n\
         4. Answer with a JSON array only, without markdown fences, one element per item:\n\
         {INSTRUCTION_SCHEMA}\n\
         \n\
         Say whether to recycle, compost, drop off or landfill, and cover any cleaning or special \
         handling required for soiled or hazardous items.\n\
         \n\
         Items:\n{items}",
        items = items_json(items),
    )
}

pub(super) fn direct_prompt(items: &[ClassifiedItem], location: Option<&str>) -> String {
    let location = location_or_unknown(location);
    format!(
        "You advise people on how to dispose of waste.\n\
         \n\
         User location: {location}\n\
         \n\
         For every item below give clear, practical disposal instructions. Say whether to \
         recycle, compost, drop off or landfill, and cover any special handling required for \
         soiled or hazardous items.\n\
         \n\
         Answer with a JSON array only, without markdown fences, one element per item:\n\
         {INSTRUCTION_SCHEMA}\n\
         \n\
         Items:\n{items}",
        items = items_json(items),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> ClassifiedItem {
        ClassifiedItem {
            item_name: "AA battery".into(),
            material_type: "alkaline".into(),
            is_hazardous: true,
            is_soiled: false,
            search_query: "alkaline battery disposal".into(),
            location: Some("Atlanta".into()),
            confidence_score: 0.8,
        }
    }

    #[test]
    fn agentic_prompt_lists_items_without_location_field() {
        let prompt = agentic_prompt(&[battery()], Some("Marietta, GA"));
        assert!(prompt.contains("User location: Marietta, GA"));
        assert!(prompt.contains("\"search_query\": \"alkaline battery disposal\""));
        assert!(prompt.contains("\"is_hazardous\": true"));
        assert!(!prompt.contains("confidence_score"));
        assert!(!prompt.contains("Atlanta"));
    }

    #[test]
    fn missing_location_reads_unknown() {
        let prompt = direct_prompt(&[battery()], None);
        assert!(prompt.contains("User location: Unknown"));
    }
}
