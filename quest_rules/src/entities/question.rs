//! Assessment question definitions.

use serde::{Deserialize, Serialize};

use super::QuestionId;

/// A single multiple-choice question with one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
}

impl Question {
    /// Create a new question with a fresh id.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            prompt: prompt.into(),
            options,
            correct_option,
        }
    }

    /// Number of selectable options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Whether the given option index is the correct answer.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_question_correctness() {
        let question = Question::new("2 + 2 = ?", options(&["3", "4", "5"]), 1);
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
        assert_eq!(question.option_count(), 3);
    }
}
