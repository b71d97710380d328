//! Orchestration Graph and Router
//!
//! `Router -> Classification -> Disposal Advisory Loop -> outcome`. Every
//! call to [`Orchestrator::classify`] gets its own [`OrchestrationState`];
//! nothing is shared between requests except the stateless clients.

use std::time::Instant;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use super::advisor::DisposalAdvisor;
use super::classifier::Classifier;
use super::errors::ClassifyError;
use super::search_tool::SearchTool;
use crate::config::AppConfig;
use crate::domain::{
    ClassificationOutcome, ClassifiedItem, ConversationLog, DisposalInstruction, ImageInput,
};
use crate::infrastructure::model::ProviderFactory;
use crate::infrastructure::search::create_search_provider;

/// What a caller hands to `classify`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationInput {
    pub image: Option<ImageInput>,
    pub text: Option<String>,
    pub location: Option<String>,
}

impl ClassificationInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn from_image(image: ImageInput) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Image,
    Text,
}

/// Picks the classification path. An image wins over text; empty images
/// and blank text count as absent.
pub fn route(input: &ClassificationInput) -> Result<Route, ClassifyError> {
    let has_image = input.image.as_ref().is_some_and(|image| !image.is_empty());
    let has_text = input
        .text
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty());

    match (has_image, has_text) {
        (true, _) => Ok(Route::Image),
        (false, true) => Ok(Route::Text),
        (false, false) => Err(ClassifyError::invalid_input(
            "either an image or a message is required",
        )),
    }
}

/// Per-request working state.
#[derive(Debug, Clone, Default)]
pub struct OrchestrationState {
    pub image: Option<ImageInput>,
    pub text_message: Option<String>,
    pub location_hint: Option<String>,
    pub items: Option<Vec<ClassifiedItem>>,
    pub conversation_history: ConversationLog,
    pub disposal_instructions: Option<Vec<DisposalInstruction>>,
}

impl From<ClassificationInput> for OrchestrationState {
    fn from(input: ClassificationInput) -> Self {
        Self {
            image: input.image,
            text_message: input.text,
            location_hint: input
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    classifier: Classifier,
    advisor: DisposalAdvisor,
}

impl Orchestrator {
    pub fn new(classifier: Classifier, advisor: DisposalAdvisor) -> Self {
        Self {
            classifier,
            advisor,
        }
    }

    /// Wires the configured model and search clients together.
    pub fn from_config(config: &AppConfig) -> Self {
        let model = ProviderFactory::create(&config.model);
        let search = create_search_provider(&config.search);
        let model_policy = config.model_policy();

        let tool = SearchTool::new(search, config.search_policy())
            .with_max_results(config.search.max_results);
        let classifier = Classifier::new(model.clone(), model_policy);
        let advisor = DisposalAdvisor::new(model, tool, model_policy)
            .with_strategy(config.advisor.strategy)
            .with_max_rounds(config.advisor.max_rounds);

        Self::new(classifier, advisor)
    }

    /// Classifies the input and produces disposal instructions for it.
    pub async fn classify(
        &self,
        input: ClassificationInput,
    ) -> Result<ClassificationOutcome, ClassifyError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("classify", request_id = %request_id);
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: ClassificationInput) -> Result<ClassificationOutcome, ClassifyError> {
        let started = Instant::now();
        let route = route(&input)?;
        let mut state = OrchestrationState::from(input);
        debug!(?route, has_location = state.location_hint.is_some(), "Routed request");

        let location = state.location_hint.as_deref();
        let items = match (route, state.image.as_ref(), state.text_message.as_deref()) {
            (Route::Image, Some(image), _) => {
                self.classifier.classify_from_image(image, location).await?
            }
            (Route::Text, _, Some(text)) => self.classifier.classify_from_text(text, location).await?,
            _ => {
                return Err(ClassifyError::invalid_input(
                    "either an image or a message is required",
                ));
            }
        };

        let advice = self
            .advisor
            .advise(&items, location, &mut state.conversation_history)
            .await?;
        state.items = Some(items);
        state.disposal_instructions = Some(advice.instructions);

        let items = state.items.unwrap_or_default();
        let disposal_instructions = state.disposal_instructions.unwrap_or_default();
        let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            items = items.len(),
            instructions = disposal_instructions.len(),
            search_rounds = advice.search_rounds,
            turns = state.conversation_history.len(),
            processing_time_ms,
            "Classification request completed"
        );

        Ok(ClassificationOutcome {
            total_items: items.len(),
            items,
            disposal_instructions,
            processing_time_ms,
            search_rounds: advice.search_rounds,
        })
    }
}
