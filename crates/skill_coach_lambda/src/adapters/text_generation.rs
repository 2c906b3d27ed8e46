use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use skill_coach_core::error::UpstreamError;
use skill_coach_core::generation::{
    decode_messages_response, encode_messages_request, GenerationRequest,
};

pub trait TextGenerator {
    /// One blocking round trip to the model. Returns the generated text.
    fn generate(&self, request: GenerationRequest<'_>) -> Result<String, UpstreamError>;
}

pub struct BedrockTextGenerator {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockTextGenerator {
    pub fn new(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }
}

impl TextGenerator for BedrockTextGenerator {
    fn generate(&self, request: GenerationRequest<'_>) -> Result<String, UpstreamError> {
        let body = encode_messages_request(request).map_err(UpstreamError::Model)?;
        let client = self.client.clone();
        let model_id = request.settings.model_id.clone();

        let response_body = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .invoke_model()
                    .model_id(model_id.clone())
                    .content_type("application/json")
                    .accept("application/json")
                    .body(Blob::new(body))
                    .send()
                    .await
                    .map(|output| output.body.into_inner())
                    .map_err(|error| {
                        UpstreamError::Model(format!(
                            "invoke_model for '{model_id}' failed: {}",
                            DisplayErrorContext(&error)
                        ))
                    })
            })
        })?;

        decode_messages_response(&response_body).map_err(UpstreamError::Model)
    }
}
