//! Classification Client
//!
//! One model call per request turns a photo or a description into
//! [`ClassifiedItem`]s. The location hint, when present, is appended to the
//! prompt as context only.

mod image;
mod prompts;

use std::sync::Arc;
use tracing::{debug, info};

use super::errors::{ClassifyError, Stage};
use super::parser::{ParseError, parse_records};
use super::policy::CallPolicy;
use super::summarise;
use crate::domain::{ClassifiedItem, ContentPart, ImageInput, ModelTurn, Turn};
use crate::infrastructure::model::{ModelProvider, ModelRequest};

use image::{decode_image, sniff_mime};

#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn ModelProvider>,
    policy: CallPolicy,
}

impl Classifier {
    pub fn new(model: Arc<dyn ModelProvider>, policy: CallPolicy) -> Self {
        Self { model, policy }
    }

    pub async fn classify_from_image(
        &self,
        image: &ImageInput,
        location_hint: Option<&str>,
    ) -> Result<Vec<ClassifiedItem>, ClassifyError> {
        let data = match image {
            ImageInput::Bytes(bytes) if bytes.is_empty() => {
                return Err(ClassifyError::invalid_input("image is empty"));
            }
            ImageInput::Bytes(bytes) => bytes.clone(),
            ImageInput::Encoded(text) => decode_image(text)?,
        };
        let mime_type = sniff_mime(&data);
        debug!(bytes = data.len(), mime_type, "Classifying image");

        let turn = Turn::Caller(vec![
            ContentPart::Text(prompts::classification_prompt(location_hint)),
            ContentPart::Image {
                mime_type: mime_type.to_string(),
                data,
            },
        ]);
        self.classify_turn(turn).await
    }

    pub async fn classify_from_text(
        &self,
        message: &str,
        location_hint: Option<&str>,
    ) -> Result<Vec<ClassifiedItem>, ClassifyError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClassifyError::invalid_input("message is empty"));
        }
        debug!(message = %summarise(message), "Classifying text");

        let turn = Turn::Caller(vec![
            ContentPart::Text(prompts::classification_prompt(location_hint)),
            ContentPart::Text(prompts::describe_text(message)),
        ]);
        self.classify_turn(turn).await
    }

    async fn classify_turn(&self, turn: Turn) -> Result<Vec<ClassifiedItem>, ClassifyError> {
        let request = ModelRequest::new(vec![turn]).expecting_json();
        let model = self.model.clone();

        let reply = self
            .policy
            .run(self.model.id(), || {
                let model = model.clone();
                let request = request.clone();
                async move { model.generate(request).await }
            })
            .await?;

        let text = match reply {
            ModelTurn::Answer(text) => text,
            ModelTurn::ToolRequests(calls) => {
                let tool = calls.first().map(|c| c.name.clone()).unwrap_or_default();
                return Err(ClassifyError::malformed(
                    Stage::Classification,
                    ParseError::InvalidToolCall {
                        tool,
                        reason: "no tools are offered during classification".to_string(),
                    },
                ));
            }
        };

        let items: Vec<ClassifiedItem> = parse_records(&text)
            .map_err(|e| ClassifyError::malformed(Stage::Classification, e))?;
        info!(
            provider = self.model.id(),
            items = items.len(),
            "Classification completed"
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::ModelError;
    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use tokio::sync::Mutex;

    struct CannedModel {
        reply: String,
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl CannedModel {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for CannedModel {
        fn id(&self) -> &str {
            "canned"
        }

        async fn generate(&self, request: ModelRequest) -> Result<ModelTurn, ModelError> {
            self.requests.lock().await.push(request);
            Ok(ModelTurn::Answer(self.reply.clone()))
        }
    }

    const PIZZA_BOX: &str = r#"```json
[{"item_name": "pizza box", "material_type": "corrugated cardboard", "is_hazardous": false,
  "is_soiled": true, "search_query": "Marietta GA greasy pizza box recycling",
  "location": null, "confidence_score": 0.9}]
```"#;

    #[tokio::test]
    async fn text_request_carries_prompt_message_and_hint() {
        let model = CannedModel::new(PIZZA_BOX);
        let classifier = Classifier::new(model.clone(), CallPolicy::default());

        let items = classifier
            .classify_from_text("greasy pizza box", Some("Marietta, GA"))
            .await
            .expect("classifies");

        assert_eq!(items.len(), 1);
        assert!(items[0].is_soiled);

        let requests = model.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_response);
        assert!(requests[0].tools.is_empty());
        let Turn::Caller(parts) = &requests[0].turns[0] else {
            panic!("expected a caller turn");
        };
        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect();
        assert!(texts[0].contains("Marietta, GA"));
        assert!(texts[1].contains("greasy pizza box"));
    }

    #[tokio::test]
    async fn encoded_image_is_sent_as_bytes_with_sniffed_mime() {
        let model = CannedModel::new("[]");
        let classifier = Classifier::new(model.clone(), CallPolicy::default());
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
        let input = ImageInput::Encoded(format!("data:image/png;base64,{}", STANDARD.encode(png)));

        let items = classifier
            .classify_from_image(&input, None)
            .await
            .expect("classifies");
        assert!(items.is_empty());

        let requests = model.requests.lock().await;
        let Turn::Caller(parts) = &requests[0].turns[0] else {
            panic!("expected a caller turn");
        };
        assert!(parts.contains(&ContentPart::Image {
            mime_type: "image/png".into(),
            data: png.to_vec(),
        }));
    }

    #[tokio::test]
    async fn prose_reply_is_malformed_classification() {
        let model = CannedModel::new("Sorry, I can't tell what that is.");
        let classifier = Classifier::new(model, CallPolicy::default());

        let err = classifier
            .classify_from_text("mystery object", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClassifyError::MalformedOutput {
                stage: Stage::Classification,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn empty_image_never_reaches_the_model() {
        let model = CannedModel::new("[]");
        let classifier = Classifier::new(model.clone(), CallPolicy::default());

        let err = classifier
            .classify_from_image(&ImageInput::Bytes(Vec::new()), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_input");
        assert!(model.requests.lock().await.is_empty());
    }
}
