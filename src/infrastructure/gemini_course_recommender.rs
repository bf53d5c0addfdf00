use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{
    error::RecommendationError,
    models::registration::Course,
    services::course_recommender::{CourseRecommender, Recommendation},
};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

const PROMPT_TEMPLATE: &str = "\
You are an assistant that recommends the most suitable tech course from the \
TECHNEXus program to students. TECHNEXus is an upskilling and learning program \
hosted by the Department of Information Technology, University of Ilorin.

Consider the student's interests and the focus of the current TECHNEXus edition. \
The available courses are {courses}.

Student interests: {interests}

Which one of the available courses do you recommend, and why? Answer with \
courseRecommendation set to exactly one course name from the list and reasoning \
explaining the choice in two or three sentences.";

/// Course recommendations from the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiCourseRecommender {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiCourseRecommender {
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    fn request_body(interests: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(interests) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "courseRecommendation": { "type": "STRING" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["courseRecommendation", "reasoning"]
                }
            }
        })
    }
}

pub fn build_prompt(interests: &str) -> String {
    let courses = Course::ALL
        .iter()
        .map(Course::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    PROMPT_TEMPLATE
        .replace("{courses}", &courses)
        .replace("{interests}", interests)
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

fn parse_response(response: GenerateContentResponse) -> Result<Recommendation, RecommendationError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| RecommendationError::MalformedResponse("no candidates returned".to_string()))?;

    serde_json::from_str(&text).map_err(|e| RecommendationError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl CourseRecommender for GeminiCourseRecommender {
    async fn recommend(&self, interests: &str) -> Result<Recommendation, RecommendationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RecommendationError::Request("no API key configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(interests))
            .send()
            .await
            .map_err(|e| RecommendationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendationError::Request(format!("{} - {}", status, body)));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RecommendationError::MalformedResponse(e.to_string()))?;
        parse_response(body)
    }
}
