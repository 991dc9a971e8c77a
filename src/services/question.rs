// src/services/question.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, NewQuestion, QuestionResponse},
    repositories::QuestionRepository,
    utils::html::clean_html,
};

#[derive(Clone)]
pub struct QuestionService {
    repo: Arc<dyn QuestionRepository>,
}

/// Validates a create/replace payload and turns it into a writable question.
///
/// * At least two non-empty options, difficulty in {easy, medium, hard}.
/// * `correct_option` must index into `options`.
/// * Free text is sanitized before it reaches storage.
pub fn prepare_question(req: CreateQuestionRequest) -> Result<NewQuestion, AppError> {
    req.validate()?;

    let correct_index = usize::try_from(req.correct_option)
        .ok()
        .filter(|i| *i < req.options.len())
        .ok_or_else(|| AppError::BadRequest("invalid correct option index".to_string()))?;

    let options: Vec<String> = req.options.iter().map(|o| clean_html(o)).collect();
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(AppError::BadRequest("all options must have text".to_string()));
    }

    Ok(NewQuestion {
        question: clean_html(&req.question),
        difficulty: req.difficulty,
        points: req.points,
        options,
        correct_index,
    })
}

impl QuestionService {
    pub fn new(repo: Arc<dyn QuestionRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> Result<Vec<QuestionResponse>, AppError> {
        let questions = self.repo.find_all().await?;
        tracing::info!("Found {} questions", questions.len());
        Ok(questions.iter().map(QuestionResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<QuestionResponse, AppError> {
        let question = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        Ok(QuestionResponse::from(&question))
    }

    /// Blank queries fall back to the full listing.
    pub async fn search(&self, query: &str) -> Result<Vec<QuestionResponse>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return self.find_all().await;
        }

        let questions = self.repo.search(query).await?;
        Ok(questions.iter().map(QuestionResponse::from).collect())
    }

    pub async fn create(&self, req: CreateQuestionRequest) -> Result<i64, AppError> {
        let new_question = prepare_question(req).map_err(|e| {
            tracing::warn!("Rejected question: {}", e);
            e
        })?;

        let created = self.repo.create(&new_question).await?;
        tracing::info!(
            "Question {} created with correct option {}",
            created.id,
            created.correct_option
        );
        Ok(created.id)
    }

    pub async fn update(&self, id: i64, req: CreateQuestionRequest) -> Result<(), AppError> {
        let new_question = prepare_question(req)?;

        self.repo
            .update(id, &new_question)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        tracing::info!("Question {} updated", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Question not found".to_string()));
        }

        tracing::info!("Question {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            participation::{NewAnswer, NewParticipation},
            trivia::NewTrivia,
            user::CreateUserRequest,
        },
        repositories::{MemoryStore, TriviaRepository, UserRepository},
    };

    fn request(options: &[&str], correct_option: i64) -> CreateQuestionRequest {
        CreateQuestionRequest {
            question: "Which is a <b>primary</b> color?".to_string(),
            difficulty: "easy".to_string(),
            points: 1,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option,
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let err = prepare_question(request(&["A", "B"], 2)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "invalid correct option index"));

        let err = prepare_question(request(&["A", "B"], -1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_too_few_options() {
        let err = prepare_question(request(&["A"], 0)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_script_only_option_rejected() {
        let err = prepare_question(request(&["Red", "<script>alert(1)</script>"], 0)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "all options must have text"));
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let service = QuestionService::new(Arc::new(MemoryStore::new()));

        let id = service.create(request(&["Red", "Green", "Purple"], 0)).await.unwrap();
        let fetched = service.find_by_id(id).await.unwrap();

        assert_eq!(fetched.options.len(), 3);
        assert_eq!(fetched.correct_option, fetched.options[0].id);
        assert_eq!(fetched.question, "Which is a <b>primary</b> color?");
    }

    #[tokio::test]
    async fn test_search_matches_option_text() {
        let service = QuestionService::new(Arc::new(MemoryStore::new()));
        service.create(request(&["Red", "Green"], 0)).await.unwrap();
        let mut other = request(&["Cat", "Dog"], 1);
        other.question = "Which animal barks?".to_string();
        service.create(other).await.unwrap();

        let hits = service.search("dog").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question, "Which animal barks?");

        assert_eq!(service.search("   ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_answered_question_cannot_be_deleted() {
        let store = Arc::new(MemoryStore::new());
        let service = QuestionService::new(store.clone());
        let id = service.create(request(&["Red", "Green"], 0)).await.unwrap();
        let question = service.find_by_id(id).await.unwrap();
        let trivia = TriviaRepository::create(
            store.as_ref(),
            &NewTrivia {
                name: "Colors".to_string(),
                description: String::new(),
                question_ids: vec![id],
                user_ids: vec![],
            },
        )
        .await
        .unwrap();
        let user = UserRepository::create(
            store.as_ref(),
            &CreateUserRequest {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        store
            .save_participation(&NewParticipation {
                user_id: user.id,
                trivia_id: trivia.id,
                score: 1,
                answers: vec![NewAnswer {
                    question_id: id,
                    selected_option: question.correct_option,
                    is_correct: true,
                }],
            })
            .await
            .unwrap();

        assert!(matches!(service.delete(id).await, Err(AppError::Conflict(_))));

        let stored = store.latest_participation(trivia.id, user.id).await.unwrap().unwrap();
        assert_eq!(stored.answers.len(), 1);
        assert_eq!(stored.correct_answers(), 1);
        assert!(service.find_by_id(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_with_same_option_count_keeps_ids() {
        let service = QuestionService::new(Arc::new(MemoryStore::new()));
        let id = service.create(request(&["Red", "Green"], 0)).await.unwrap();
        let before: Vec<i64> = service
            .find_by_id(id)
            .await
            .unwrap()
            .options
            .iter()
            .map(|o| o.id)
            .collect();

        service.update(id, request(&["Blue", "Yellow"], 1)).await.unwrap();
        let after = service.find_by_id(id).await.unwrap();

        let after_ids: Vec<i64> = after.options.iter().map(|o| o.id).collect();
        assert_eq!(after_ids, before);
        assert_eq!(after.options[1].option, "Yellow");
        assert_eq!(after.correct_option, before[1]);
    }

    #[tokio::test]
    async fn test_missing_question() {
        let service = QuestionService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(service.find_by_id(42).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(42).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(42, request(&["A", "B"], 0)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
