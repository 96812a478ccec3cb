use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::models::AnalysisTask;
use crate::prompts;
use crate::schema;
use crate::services::ai_service::NutritionAnalyzer;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    tool_type: String,
    function: ToolFunction,
}

#[derive(Debug, Serialize)]
struct ToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    function: ForcedFunction,
}

#[derive(Debug, Serialize)]
struct ForcedFunction {
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: CalledFunction,
}

#[derive(Debug, Deserialize)]
struct CalledFunction {
    arguments: String,
}

pub struct OpenRouterService {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterService {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Assemble the single chat-completions call for a task: the mode's
    /// instruction text (plus the image part for image analysis) and the
    /// mode's tool, forced via tool_choice.
    fn build_request(&self, task: &AnalysisTask) -> ChatRequest {
        let tool = schema::tool_for(task);

        let mut content = vec![ContentPart::Text {
            content_type: "text".to_string(),
            text: prompts::instruction_for(task),
        }];
        if let AnalysisTask::ImageAnalysis { image } = task {
            content.push(ContentPart::ImageUrl {
                content_type: "image_url".to_string(),
                image_url: ImageData {
                    url: ensure_data_uri(image),
                },
            });
        }

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            tools: vec![Tool {
                tool_type: "function".to_string(),
                function: ToolFunction {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    parameters: tool.parameters,
                },
            }],
            tool_choice: ToolChoice {
                choice_type: "function".to_string(),
                function: ForcedFunction {
                    name: tool.name.to_string(),
                },
            },
        }
    }
}

#[async_trait::async_trait]
impl NutritionAnalyzer for OpenRouterService {
    async fn analyze(&self, task: &AnalysisTask) -> Result<Value> {
        let request = self.build_request(task);

        log::info!(
            "🤖 Sending {} analysis to OpenRouter with model: {}",
            task.mode_name(),
            self.model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://github.com/nutrilens")
            .header("X-Title", "NutriLens")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ OpenRouter request failed to send: {}", e);
                GatewayError::Internal(e.to_string())
            })?;

        let status = response.status();
        log::debug!("📥 OpenRouter response status: {}", status);

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            log::error!("❌ OpenRouter rate limit hit");
            return Err(GatewayError::UpstreamRateLimited);
        }
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            log::error!("❌ OpenRouter credits depleted");
            return Err(GatewayError::UpstreamBillingExhausted);
        }
        if !status.is_success() {
            let error_text = response.text().await.map_err(|e| {
                log::error!("❌ Failed to read OpenRouter error body: {}", e);
                GatewayError::Internal(e.to_string())
            })?;
            log::error!("❌ OpenRouter API error ({}): {}", status, error_text);
            return Err(GatewayError::UpstreamFailure);
        }

        let response_text = response.text().await.map_err(|e| {
            log::error!("❌ Failed to read OpenRouter response body: {}", e);
            GatewayError::Internal(e.to_string())
        })?;

        extract_tool_arguments(&response_text)
    }
}

/// Wrap a bare base64 payload into the data URI the chat API expects.
/// Payloads that already carry a data: prefix pass through verbatim.
fn ensure_data_uri(image: &str) -> String {
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:image/jpeg;base64,{}", image)
    }
}

/// Pull the forced tool call's arguments out of a chat-completions response.
fn extract_tool_arguments(response_text: &str) -> Result<Value> {
    let chat_response: ChatResponse = serde_json::from_str(response_text).map_err(|e| {
        log::error!(
            "❌ Unexpected OpenRouter response shape ({}): {}",
            e,
            response_text
        );
        GatewayError::MalformedUpstreamResponse
    })?;

    let arguments = chat_response
        .choices
        .first()
        .and_then(|choice| choice.message.tool_calls.as_ref())
        .and_then(|calls| calls.first())
        .map(|call| call.function.arguments.as_str())
        .ok_or_else(|| {
            log::error!("❌ No tool call in OpenRouter response: {}", response_text);
            GatewayError::MalformedUpstreamResponse
        })?;

    serde_json::from_str(arguments).map_err(|_| {
        log::error!("❌ Tool-call arguments are not valid JSON: {}", arguments);
        GatewayError::MalformedUpstreamResponse
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_call_response(arguments: &Value) -> Value {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "provide_food_data",
                            "arguments": arguments.to_string()
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })
    }

    fn service(server: &MockServer) -> OpenRouterService {
        OpenRouterService::new(
            "test-key".to_string(),
            "google/gemini-2.5-flash".to_string(),
        )
        .with_base_url(server.uri())
    }

    fn search_task() -> AnalysisTask {
        AnalysisTask::Search {
            query: "Idli".to_string(),
        }
    }

    #[test]
    fn test_ensure_data_uri_wraps_bare_payload() {
        assert_eq!(
            ensure_data_uri("AAAA"),
            "data:image/jpeg;base64,AAAA".to_string()
        );
        assert_eq!(
            ensure_data_uri("data:image/png;base64,BBBB"),
            "data:image/png;base64,BBBB".to_string()
        );
    }

    #[tokio::test]
    async fn test_analyze_extracts_tool_arguments() {
        let server = MockServer::start().await;
        let payload = json!({
            "name": "Idli",
            "description": "Steamed rice cake",
            "calories": 58,
            "protein": 2,
            "carbs": 12,
            "fat": 0.4,
            "defaultPortion": "1 piece",
            "nutritionScore": "A"
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&payload)))
            .mount(&server)
            .await;

        let result = service(&server).analyze(&search_task()).await.unwrap();
        assert_eq!(result, payload);
    }

    #[tokio::test]
    async fn test_analyze_forces_the_mode_tool() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains(
                r#""tool_choice":{"type":"function","function":{"name":"provide_food_data"}}"#,
            ))
            .and(body_string_contains(r#""model":"google/gemini-2.5-flash""#))
            .and(body_string_contains("the food: Idli"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&json!({}))))
            .expect(1)
            .mount(&server)
            .await;

        service(&server).analyze(&search_task()).await.unwrap();
    }

    #[tokio::test]
    async fn test_image_task_wraps_bare_base64() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("data:image/jpeg;base64,AAAA"))
            .and(body_string_contains(r#""image_url""#))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&json!({}))))
            .expect(1)
            .mount(&server)
            .await;

        let task = AnalysisTask::ImageAnalysis {
            image: "AAAA".to_string(),
        };
        service(&server).analyze(&task).await.unwrap();
    }

    #[tokio::test]
    async fn test_image_task_keeps_existing_data_uri() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("data:image/png;base64,BBBB"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&json!({}))))
            .expect(1)
            .mount(&server)
            .await;

        let task = AnalysisTask::ImageAnalysis {
            image: "data:image/png;base64,BBBB".to_string(),
        };
        service(&server).analyze(&task).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limited_upstream_maps_to_rate_limit_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = service(&server).analyze(&search_task()).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamRateLimited));
    }

    #[tokio::test]
    async fn test_depleted_credits_map_to_billing_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
            .mount(&server)
            .await;

        let err = service(&server).analyze(&search_task()).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamBillingExhausted));
    }

    #[tokio::test]
    async fn test_other_upstream_error_maps_to_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = service(&server).analyze(&search_task()).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamFailure));
    }

    #[tokio::test]
    async fn test_response_without_tool_call_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "I cannot help with that." },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let err = service(&server).analyze(&search_task()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedUpstreamResponse));
    }

    #[tokio::test]
    async fn test_unparseable_arguments_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": { "name": "provide_food_data", "arguments": "not json" }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .mount(&server)
            .await;

        let err = service(&server).analyze(&search_task()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedUpstreamResponse));
    }
}
