//! REST client for the quiz API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::errors::{QuizError, QuizResult};
use crate::models::{Quiz, QuizSummary};
use crate::protocol::{
    AnswerFeedback, AnswerSubmission, AuthResponse, BatchFeedback, BatchSubmission, Credentials,
    ErrorBody, RatingSubmission, Registration, ResultSubmission, validate_rating,
    validate_registration,
};

use super::ScoringGateway;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> QuizResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> QuizResult<Self> {
        Self::new(&config.api_url, config.request_timeout)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        log::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> QuizResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_no_content<B>(&self, method: Method, path: &str, body: Option<&B>) -> QuizResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        check_status(builder.send().await?).await?;
        Ok(())
    }

    pub async fn list_quizzes(&self) -> QuizResult<Vec<QuizSummary>> {
        self.send_json::<(), _>(Method::GET, "quizzes", None).await
    }

    pub async fn get_quiz(&self, quiz_id: &str) -> QuizResult<Quiz> {
        self.send_json::<(), _>(Method::GET, &format!("quizzes/{}", quiz_id), None)
            .await
    }

    pub async fn daily_quiz(&self) -> QuizResult<Quiz> {
        self.send_json::<(), _>(Method::GET, "quizzes/daily", None).await
    }

    pub async fn login(&self, credentials: &Credentials) -> QuizResult<AuthResponse> {
        self.send_json(Method::POST, "auth/login", Some(credentials))
            .await
    }

    pub async fn register(&self, registration: &Registration) -> QuizResult<AuthResponse> {
        validate_registration(registration).map_err(|e| QuizError::Validation(e.to_string()))?;
        self.send_json(Method::POST, "auth/register", Some(registration))
            .await
    }

    pub async fn favorites(&self) -> QuizResult<Vec<QuizSummary>> {
        self.send_json::<(), _>(Method::GET, "favorites", None).await
    }

    pub async fn add_favorite(&self, quiz_id: &str) -> QuizResult<()> {
        self.send_no_content::<()>(Method::POST, &format!("favorites/{}", quiz_id), None)
            .await
    }

    pub async fn remove_favorite(&self, quiz_id: &str) -> QuizResult<()> {
        self.send_no_content::<()>(Method::DELETE, &format!("favorites/{}", quiz_id), None)
            .await
    }
}

async fn check_status(response: Response) -> QuizResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = status_error(status, &body);
    log::warn!("Request failed: {}", err);
    Err(err)
}

/// Maps a non-2xx status and its body onto an error.
fn status_error(status: StatusCode, body: &str) -> QuizError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QuizError::Unauthorized(message),
        StatusCode::NOT_FOUND => QuizError::NotFound(message),
        _ => QuizError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ScoringGateway for ApiClient {
    async fn submit_answer(
        &self,
        quiz_id: &str,
        submission: &AnswerSubmission,
    ) -> QuizResult<AnswerFeedback> {
        self.send_json(
            Method::POST,
            &format!("quizzes/{}/submit", quiz_id),
            Some(submission),
        )
        .await
    }

    async fn submit_all(
        &self,
        quiz_id: &str,
        batch: &BatchSubmission,
    ) -> QuizResult<BatchFeedback> {
        self.send_json(
            Method::POST,
            &format!("quizzes/{}/submit-all", quiz_id),
            Some(batch),
        )
        .await
    }

    async fn post_result(&self, result: &ResultSubmission) -> QuizResult<()> {
        self.send_no_content(Method::POST, "quiz-results", Some(result))
            .await
    }

    async fn rate_quiz(&self, quiz_id: &str, rating: u8) -> QuizResult<()> {
        validate_rating(rating).map_err(|e| QuizError::Validation(e.to_string()))?;
        self.send_no_content(
            Method::POST,
            &format!("quizzes/{}/rating", quiz_id),
            Some(&RatingSubmission { rating }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let api = client("http://localhost:8080/api/");
        assert_eq!(
            api.endpoint("/quizzes/7/submit"),
            "http://localhost:8080/api/quizzes/7/submit"
        );
        assert_eq!(api.endpoint("quiz-results"), "http://localhost:8080/api/quiz-results");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            QuizError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            QuizError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, r#"{"message":"no quiz"}"#),
            QuizError::NotFound(m) if m == "no quiz"
        ));

        match status_error(StatusCode::BAD_GATEWAY, "") {
            QuizError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_text_body_becomes_message() {
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "database down\n") {
            QuizError::Api { message, .. } => assert_eq!(message, "database down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rating_is_validated_before_sending() {
        // Nothing listens on the test config's port; the request must never be attempted.
        let api = ApiClient::from_config(&Config::test_config()).unwrap();
        assert!(matches!(
            api.rate_quiz("7", 9).await,
            Err(QuizError::Validation(_))
        ));
    }
}
