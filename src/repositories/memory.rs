// src/repositories/memory.rs

//! In-process implementation of every repository trait.
//! Backs the test suites and local runs without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        participation::{Answer, NewParticipation, Participation, RankingEntry},
        question::{AnswerKey, NewQuestion, Question, QuestionOption},
        trivia::{NewTrivia, Trivia},
        user::{CreateUserRequest, User},
    },
    repositories::{QuestionRepository, TriviaRepository, UserRepository},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    questions: BTreeMap<i64, Question>,
    trivias: BTreeMap<i64, Trivia>,
    trivia_questions: BTreeSet<(i64, i64)>,
    trivia_users: BTreeSet<(i64, i64)>,
    participations: BTreeMap<i64, Participation>,
}

impl Tables {
    /// One sequence for every table, so ids never collide across entities.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    /// Builds the stored form of `question`. Option ids are taken from
    /// `reuse` when it has one id per option, otherwise freshly allocated.
    fn build_question(
        &mut self,
        id: i64,
        question: &NewQuestion,
        reuse: &[i64],
    ) -> Result<Question, AppError> {
        let keep_ids = reuse.len() == question.options.len();
        let options: Vec<QuestionOption> = question
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionOption {
                id: if keep_ids { reuse[i] } else { self.next_id() },
                question_id: id,
                text: text.clone(),
            })
            .collect();

        let correct_option = options
            .get(question.correct_index)
            .map(|o| o.id)
            .ok_or_else(|| AppError::BadRequest("invalid correct option index".to_string()))?;

        Ok(Question {
            id,
            question: question.question.clone(),
            correct_option,
            difficulty: question.difficulty.clone(),
            points: question.points,
            options,
            created_at: Some(Utc::now()),
        })
    }

    fn relink(&mut self, trivia_id: i64, trivia: &NewTrivia) {
        self.trivia_questions.retain(|(t, _)| *t != trivia_id);
        self.trivia_users.retain(|(t, _)| *t != trivia_id);
        self.trivia_questions
            .extend(trivia.question_ids.iter().map(|q| (trivia_id, *q)));
        self.trivia_users
            .extend(trivia.user_ids.iter().map(|u| (trivia_id, *u)));
    }
}

/// Thread-safe in-memory database. Cascades mirror the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored participations, across all trivias.
    pub async fn participation_count(&self) -> usize {
        self.tables.read().await.participations.len()
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Question>, AppError> {
        Ok(self.tables.read().await.questions.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn find_answer_keys(&self, ids: &[i64]) -> Result<Vec<AnswerKey>, AppError> {
        let tables = self.tables.read().await;
        let unique: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| tables.questions.get(&id))
            .map(|q| AnswerKey {
                id: q.id,
                correct_option: q.correct_option,
                difficulty: q.difficulty.clone(),
            })
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Question>, AppError> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| {
                q.question.to_lowercase().contains(&needle)
                    || q.options.iter().any(|o| o.text.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn create(&self, question: &NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let created = tables.build_question(id, question, &[])?;
        tables.questions.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, question: &NewQuestion) -> Result<Option<Question>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.questions.get(&id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        let option_ids: Vec<i64> = existing.options.iter().map(|o| o.id).collect();

        let mut updated = tables.build_question(id, question, &option_ids)?;
        updated.created_at = created_at;
        tables.questions.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.questions.contains_key(&id) {
            return Ok(false);
        }
        let answered = tables
            .participations
            .values()
            .any(|p| p.answers.iter().any(|a| a.question_id == id));
        if answered {
            return Err(AppError::Conflict(format!(
                "Question {} has recorded answers",
                id
            )));
        }

        tables.questions.remove(&id);
        tables.trivia_questions.retain(|(_, q)| *q != id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: &CreateUserRequest) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let created = User {
            id: tables.next_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: Some(Utc::now()),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, user: &CreateUserRequest) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if tables.email_taken(&user.email, Some(id)) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let Some(existing) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = user.name.clone();
        existing.email = user.email.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.trivia_users.retain(|(_, u)| *u != id);
        tables.participations.retain(|_, p| p.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TriviaRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Trivia>, AppError> {
        Ok(self.tables.read().await.trivias.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Trivia>, AppError> {
        Ok(self.tables.read().await.trivias.get(&id).cloned())
    }

    async fn find_questions_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Question>>, AppError> {
        let tables = self.tables.read().await;
        let mut by_trivia: HashMap<i64, Vec<Question>> = HashMap::new();
        for (t, q) in tables.trivia_questions.iter().filter(|(t, _)| trivia_ids.contains(t)) {
            if let Some(question) = tables.questions.get(q) {
                by_trivia.entry(*t).or_default().push(question.clone());
            }
        }
        Ok(by_trivia)
    }

    async fn find_users_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<User>>, AppError> {
        let tables = self.tables.read().await;
        let mut by_trivia: HashMap<i64, Vec<User>> = HashMap::new();
        for (t, u) in tables.trivia_users.iter().filter(|(t, _)| trivia_ids.contains(t)) {
            if let Some(user) = tables.users.get(u) {
                by_trivia.entry(*t).or_default().push(user.clone());
            }
        }
        Ok(by_trivia)
    }

    async fn create(&self, trivia: &NewTrivia) -> Result<Trivia, AppError> {
        let mut tables = self.tables.write().await;
        let created = Trivia {
            id: tables.next_id(),
            name: trivia.name.clone(),
            description: trivia.description.clone(),
            created_at: Some(Utc::now()),
        };
        tables.trivias.insert(created.id, created.clone());
        tables.relink(created.id, trivia);
        Ok(created)
    }

    async fn update(&self, id: i64, trivia: &NewTrivia) -> Result<Option<Trivia>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.trivias.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = trivia.name.clone();
        existing.description = trivia.description.clone();
        let updated = existing.clone();

        tables.relink(id, trivia);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.trivias.remove(&id).is_none() {
            return Ok(false);
        }

        tables.trivia_questions.retain(|(t, _)| *t != id);
        tables.trivia_users.retain(|(t, _)| *t != id);
        tables.participations.retain(|_, p| p.trivia_id != id);
        Ok(true)
    }

    async fn assign_user(&self, trivia_id: i64, user_id: i64) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .trivia_users
            .insert((trivia_id, user_id));
        Ok(())
    }

    async fn save_participation(
        &self,
        participation: &NewParticipation,
    ) -> Result<Participation, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();

        let mut answers = Vec::with_capacity(participation.answers.len());
        for answer in &participation.answers {
            answers.push(Answer {
                id: tables.next_id(),
                participation_id: id,
                question_id: answer.question_id,
                selected_option: answer.selected_option,
                is_correct: answer.is_correct,
            });
        }

        let saved = Participation {
            id,
            user_id: participation.user_id,
            trivia_id: participation.trivia_id,
            score: participation.score,
            answers,
            created_at: Some(Utc::now()),
        };
        tables.participations.insert(id, saved.clone());
        Ok(saved)
    }

    async fn latest_participation(
        &self,
        trivia_id: i64,
        user_id: i64,
    ) -> Result<Option<Participation>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .participations
            .values()
            .rev()
            .find(|p| p.trivia_id == trivia_id && p.user_id == user_id)
            .cloned())
    }

    async fn ranking(&self, trivia_id: i64) -> Result<Vec<RankingEntry>, AppError> {
        let tables = self.tables.read().await;
        let mut totals: HashMap<i64, i64> = HashMap::new();
        for p in tables.participations.values().filter(|p| p.trivia_id == trivia_id) {
            *totals.entry(p.user_id).or_default() += p.score;
        }

        let mut ranking: Vec<RankingEntry> = totals
            .into_iter()
            .map(|(user_id, total_score)| RankingEntry { user_id, total_score })
            .collect();
        ranking.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(a.user_id.cmp(&b.user_id))
        });
        Ok(ranking)
    }
}
