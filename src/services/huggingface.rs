use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Summarizer, Transcriber};
use crate::config::{HuggingFaceConfig, SummaryParameters};
use crate::error::{status_detail, transport_detail, SummarizationError, TranscriptionError};
use crate::resolver::FileHandle;

/// Hugging Face inference API client serving both speech-to-text and summarization
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    summarization_model: String,
    transcription_model: String,
    parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
    parameters: &'a SummaryParameters,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(client: Client, config: &HuggingFaceConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            summarization_model: config.summarization_model.clone(),
            transcription_model: config.transcription_model.clone(),
            parameters: config.summary.clone(),
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.api_base, model)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl Transcriber for HuggingFaceClient {
    async fn transcribe(&self, file: &FileHandle) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;

        tracing::info!(
            "Uploading {} ({} bytes) to {}",
            file.name(),
            bytes.len(),
            self.transcription_model
        );

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| TranscriptionError::Api(e.to_string()))?;
        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .authorize(self.client.post(self.model_url(&self.transcription_model)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Api(transport_detail(&e)))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(TranscriptionError::InvalidCredentials),
            StatusCode::PAYLOAD_TOO_LARGE => return Err(TranscriptionError::PayloadTooLarge),
            s if !s.is_success() => return Err(TranscriptionError::Api(status_detail(s))),
            _ => {}
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|_| TranscriptionError::InvalidResponse)?;

        body.text
            .filter(|text| !text.is_empty())
            .ok_or(TranscriptionError::InvalidResponse)
    }
}

#[async_trait]
impl Summarizer for HuggingFaceClient {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        tracing::info!(
            "Requesting summary of {} characters from {}",
            text.chars().count(),
            self.summarization_model
        );

        let request = SummaryRequest {
            inputs: text,
            parameters: &self.parameters,
        };

        let response = self
            .authorize(self.client.post(self.model_url(&self.summarization_model)))
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizationError::Api(transport_detail(&e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SummarizationError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(SummarizationError::Api(status_detail(status)));
        }

        extract_summary(response).await
    }
}

/// Pull `[0].summary_text` out of a summarization response
async fn extract_summary(response: Response) -> Result<String, SummarizationError> {
    let body: Value = response
        .json()
        .await
        .map_err(|_| SummarizationError::InvalidResponse)?;

    body.get(0)
        .and_then(|first| first.get("summary_text"))
        .and_then(Value::as_str)
        .filter(|summary| !summary.is_empty())
        .map(str::to_string)
        .ok_or(SummarizationError::InvalidResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resolver::{accept_file, FileCandidate, MAX_UPLOAD_BYTES};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> HuggingFaceClient {
        let mut config = Config::default().huggingface;
        config.api_base = server.url();
        config.api_key = Some("hf_test".to_string());
        HuggingFaceClient::new(Client::new(), &config)
    }

    fn handle_on_disk(dir: &tempfile::TempDir) -> FileHandle {
        let path = dir.path().join("memo.mp3");
        std::fs::write(&path, b"ID3 fake audio").unwrap();
        accept_file(
            FileCandidate {
                name: "memo.mp3".into(),
                path,
                mime_type: "audio/mpeg".into(),
                size: 14,
            },
            MAX_UPLOAD_BYTES,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn summarize_sends_fixed_parameters() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "long text",
                "parameters": {
                    "max_length": 300,
                    "min_length": 100,
                    "do_sample": true,
                    "temperature": 0.8,
                    "num_beams": 5,
                    "no_repeat_ngram_size": 3,
                    "length_penalty": 1.5
                }
            })))
            .with_status(200)
            .with_body(r#"[{"summary_text":"short text"}]"#)
            .create_async()
            .await;

        let summary = client_for(&server).summarize("long text").await.unwrap();
        assert_eq!(summary, "short text");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn summarize_maps_unauthorized() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .with_status(401)
            .create_async()
            .await;

        assert_eq!(
            client_for(&server).summarize("x").await,
            Err(SummarizationError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn summarize_rejects_missing_summary_field() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .with_status(200)
            .with_body(r#"{"error":"Model is loading"}"#)
            .create_async()
            .await;

        assert_eq!(
            client_for(&server).summarize("x").await,
            Err(SummarizationError::InvalidResponse)
        );
    }

    #[tokio::test]
    async fn summarize_maps_server_errors() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).summarize("x").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Summarization API error: Request failed with status code 503"
        );
    }

    #[tokio::test]
    async fn transcribe_uploads_multipart_file() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle_on_disk(&dir);
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/models/openai/whisper-large-v3")
            .match_header("authorization", "Bearer hf_test")
            .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
            .match_body(Matcher::Regex("ID3 fake audio".into()))
            .with_status(200)
            .with_body(r#"{"text":"hello world"}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).transcribe(&handle).await.unwrap(), "hello world");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn transcribe_maps_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle_on_disk(&dir);

        for (status, expected) in [
            (401, TranscriptionError::InvalidCredentials),
            (413, TranscriptionError::PayloadTooLarge),
            (
                500,
                TranscriptionError::Api("Request failed with status code 500".into()),
            ),
        ] {
            let mut server = Server::new_async().await;
            let _m = server
                .mock("POST", "/models/openai/whisper-large-v3")
                .with_status(status)
                .create_async()
                .await;

            assert_eq!(client_for(&server).transcribe(&handle).await, Err(expected));
        }
    }

    #[tokio::test]
    async fn transcribe_rejects_missing_text() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle_on_disk(&dir);
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/models/openai/whisper-large-v3")
            .with_status(200)
            .with_body(r#"{"chunks":[]}"#)
            .create_async()
            .await;

        assert_eq!(
            client_for(&server).transcribe(&handle).await,
            Err(TranscriptionError::InvalidResponse)
        );
    }
}
