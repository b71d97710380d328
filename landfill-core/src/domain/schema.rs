//! Record schemas enforced on model output.
//!
//! Serde takes care of field presence and JSON types; [`StructuredRecord::validate`]
//! adds the value constraints serde cannot express (non-empty strings, score range).

use serde::de::DeserializeOwned;

use super::types::{ClassifiedItem, DisposalInstruction};

pub trait StructuredRecord: DeserializeOwned {
    /// Schema name used in error messages.
    const NAME: &'static str;

    fn validate(&self) -> Result<(), String>;
}

impl StructuredRecord for ClassifiedItem {
    const NAME: &'static str = "ClassifiedItem";

    fn validate(&self) -> Result<(), String> {
        require_text("item_name", &self.item_name)?;
        require_text("material_type", &self.material_type)?;
        require_text("search_query", &self.search_query)?;
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(format!(
                "confidence_score {} is outside [0.0, 1.0]",
                self.confidence_score
            ));
        }
        Ok(())
    }
}

impl StructuredRecord for DisposalInstruction {
    const NAME: &'static str = "DisposalInstruction";

    fn validate(&self) -> Result<(), String> {
        require_text("item_name", &self.item_name)?;
        require_text("material_type", &self.material_type)?;
        require_text("instruction", &self.instruction)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}
