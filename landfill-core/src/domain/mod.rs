pub mod conversation;
pub mod schema;
pub mod types;

pub use conversation::{ContentPart, ConversationLog, ModelTurn, ToolCall, Turn};
pub use schema::StructuredRecord;
pub use types::{ClassificationOutcome, ClassifiedItem, DisposalInstruction, ImageInput};
