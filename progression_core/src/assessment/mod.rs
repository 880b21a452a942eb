//! Quiz attempts and scoring.
//!
//! An attempt is created fresh per quiz session and discarded after scoring;
//! failed attempts are never persisted.

use std::collections::HashMap;

use quest_rules::{PassThreshold, Question, QuestionId};

use crate::error::{ProgressionError, Result};

/// Per-question verdict in a score report, for review display. Does not
/// reveal which option was correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub selected: usize,
    pub correct: bool,
}

/// The result of scoring a complete attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub correct_count: usize,
    pub total: usize,
    pub passed: bool,
    pub breakdown: Vec<QuestionResult>,
}

/// One in-flight quiz attempt: a fixed ordered question list plus the answers
/// recorded so far.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    questions: Vec<Question>,
    answers: HashMap<QuestionId, usize>,
}

impl QuizAttempt {
    /// Start an attempt over the given questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: HashMap::new(),
        }
    }

    /// The questions under assessment, in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Record an answer, overwriting any prior answer for that question.
    ///
    /// Unknown question ids and out-of-range option indexes are rejected.
    pub fn record_answer(&mut self, question_id: QuestionId, selected: usize) -> Result<()> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| ProgressionError::NotFound(format!("question {question_id}")))?;

        if selected >= question.option_count() {
            return Err(ProgressionError::NotFound(format!(
                "option {selected} for question {question_id}"
            )));
        }

        self.answers.insert(question_id, selected);
        Ok(())
    }

    /// Whether every question has a recorded answer.
    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| self.answers.contains_key(&q.id))
    }

    /// How many questions are answered, out of how many total.
    pub fn progress(&self) -> (usize, usize) {
        let answered = self
            .questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count();
        (answered, self.questions.len())
    }

    /// Score the attempt against a pass threshold.
    ///
    /// Fails with `Incomplete` while questions remain unanswered. The pass
    /// verdict uses real-number division against the threshold, never a
    /// rounded question count.
    pub fn score(&self, threshold: PassThreshold) -> Result<ScoreReport> {
        let (answered, total) = self.progress();
        if answered < total {
            return Err(ProgressionError::Incomplete { answered, total });
        }

        let breakdown: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|q| {
                let selected = self.answers[&q.id];
                QuestionResult {
                    question_id: q.id,
                    selected,
                    correct: q.is_correct(selected),
                }
            })
            .collect();

        let correct_count = breakdown.iter().filter(|r| r.correct).count();

        Ok(ScoreReport {
            correct_count,
            total,
            passed: threshold.is_passing(correct_count, total),
            breakdown,
        })
    }
}
