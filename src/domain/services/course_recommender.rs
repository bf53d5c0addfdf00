use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::RecommendationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub course_recommendation: String,
    pub reasoning: String,
}

/// Text-generation collaborator that suggests a course from free-text interests
#[async_trait]
pub trait CourseRecommender: Send + Sync {
    async fn recommend(&self, interests: &str) -> Result<Recommendation, RecommendationError>;
}
