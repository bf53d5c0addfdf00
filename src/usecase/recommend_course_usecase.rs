use thiserror::Error;
use tracing::error;

use crate::domain::services::course_recommender::{CourseRecommender, Recommendation};

/// Shorter descriptions are rejected without calling the recommender
pub const MIN_INTERESTS_CHARS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendCourseError {
    #[error("Please describe your interests in a bit more detail.")]
    InsufficientDetail,

    #[error("Failed to get a recommendation. Please try again later.")]
    Unavailable,
}

pub struct RecommendCourseUsecase<M: CourseRecommender> {
    recommender: M,
}

impl<M: CourseRecommender> RecommendCourseUsecase<M> {
    pub fn new(recommender: M) -> Self {
        Self { recommender }
    }

    pub async fn recommend(&self, interests: &str) -> Result<Recommendation, RecommendCourseError> {
        let interests = interests.trim();
        if interests.chars().count() < MIN_INTERESTS_CHARS {
            return Err(RecommendCourseError::InsufficientDetail);
        }

        self.recommender.recommend(interests).await.map_err(|e| {
            error!(error = %e, "course recommendation failed");
            RecommendCourseError::Unavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::testing::StubRecommender;

    #[rstest]
    #[case("")]
    #[case("web")]
    #[case("  coding   ")]
    #[case("123456789")]
    #[tokio::test]
    async fn short_interests_never_reach_recommender(#[case] interests: &str) {
        let recommender = StubRecommender::new();
        let usecase = RecommendCourseUsecase::new(recommender.clone());

        let result = usecase.recommend(interests).await;

        assert_eq!(result, Err(RecommendCourseError::InsufficientDetail));
        assert_eq!(recommender.calls(), 0);
    }

    #[tokio::test]
    async fn detailed_interests_are_forwarded() {
        let recommender = StubRecommender::new();
        let usecase = RecommendCourseUsecase::new(recommender.clone());

        let result = usecase.recommend("I love building websites").await.unwrap();

        assert_eq!(result.course_recommendation, "Web Development");
        assert_eq!(recommender.calls(), 1);
    }

    #[tokio::test]
    async fn collaborator_failure_becomes_generic_message() {
        let recommender = StubRecommender::failing();
        let usecase = RecommendCourseUsecase::new(recommender.clone());

        let error = usecase.recommend("machine learning and statistics").await.unwrap_err();

        assert_eq!(error, RecommendCourseError::Unavailable);
        assert_eq!(
            error.to_string(),
            "Failed to get a recommendation. Please try again later."
        );
        assert_eq!(recommender.calls(), 1);
    }
}
