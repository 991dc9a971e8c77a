// src/services/scoring.rs

//! Grading of submitted answers. Pure: no I/O, no logging.

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::{participation::AnswerRequest, question::AnswerKey},
};

/// Points awarded for a correct answer at the given difficulty.
/// Unknown tiers are worth nothing.
pub fn difficulty_weight(difficulty: &str) -> i64 {
    match difficulty {
        "easy" => 1,
        "medium" => 2,
        "hard" => 3,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub question_id: i64,
    pub selected_option: i64,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard {
    pub score: i64,
    pub correct_count: usize,
    /// Same order as the submitted answers.
    pub answers: Vec<ScoredAnswer>,
}

/// Grades `answers` against `keys` (question id -> answer key).
///
/// Fails when there is nothing to grade or when an answer names a question
/// that has no key. Either failure means nothing should be persisted.
pub fn score(
    answers: &[AnswerRequest],
    keys: &HashMap<i64, AnswerKey>,
) -> Result<Scorecard, AppError> {
    if answers.is_empty() {
        return Err(AppError::BadRequest("no answers provided".to_string()));
    }

    let mut total = 0;
    let mut correct_count = 0;
    let mut scored = Vec::with_capacity(answers.len());

    for answer in answers {
        let key = keys
            .get(&answer.question_id)
            .ok_or_else(|| AppError::BadRequest("invalid question in responses".to_string()))?;

        let is_correct = answer.selected_option == key.correct_option;
        if is_correct {
            correct_count += 1;
            total += difficulty_weight(&key.difficulty);
        }

        scored.push(ScoredAnswer {
            question_id: answer.question_id,
            selected_option: answer.selected_option,
            is_correct,
        });
    }

    Ok(Scorecard {
        score: total,
        correct_count,
        answers: scored,
    })
}
