use serde::{Deserialize, Serialize};

/// One physical object identified in a photo or description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub item_name: String,
    pub material_type: String,
    #[serde(default)]
    pub is_hazardous: bool,
    #[serde(default)]
    pub is_soiled: bool,
    /// Seed query for the regulation lookup.
    pub search_query: String,
    /// Location evidence found in the input itself (labels, packaging, text).
    /// Informational only; the caller's location hint stays authoritative.
    #[serde(default)]
    pub location: Option<String>,
    pub confidence_score: f64,
}

/// Localized disposal advice for exactly one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalInstruction {
    pub item_name: String,
    pub material_type: String,
    pub instruction: String,
}

impl DisposalInstruction {
    /// True when this instruction refers to `item` (trimmed, case-insensitive).
    pub fn describes(&self, item: &ClassifiedItem) -> bool {
        same_label(&self.item_name, &item.item_name)
            && same_label(&self.material_type, &item.material_type)
    }
}

fn same_label(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

/// Image payload as handed over by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Already-decoded image bytes.
    Bytes(Vec<u8>),
    /// Base64 text, optionally with a `data:<mime>;base64,` prefix and
    /// missing padding.
    Encoded(String),
}

impl ImageInput {
    pub fn is_empty(&self) -> bool {
        match self {
            ImageInput::Bytes(bytes) => bytes.is_empty(),
            ImageInput::Encoded(text) => text.trim().is_empty(),
        }
    }
}

/// Result of one `classify` invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    pub items: Vec<ClassifiedItem>,
    pub disposal_instructions: Vec<DisposalInstruction>,
    pub total_items: usize,
    pub processing_time_ms: f64,
    /// Number of search round trips the advisory loop performed.
    pub search_rounds: usize,
}
