//! Quiz questions and the wire record they are parsed from

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// Every question offers exactly this many answers
pub const ANSWER_OPTIONS: usize = 3;

/// A question as delivered by a content provider, before validation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionRecord {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer_index: i64,
}

/// A validated multiple-choice question (immutable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    answers: Vec<String>,
    correct_index: usize,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        answers: [&str; ANSWER_OPTIONS],
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        QuestionRecord {
            question: text.into(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct_answer_index: correct_index as i64,
        }
        .try_into()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }

    /// Distractors, in option order
    pub fn incorrect_answers(&self) -> impl Iterator<Item = &str> {
        self.answers
            .iter()
            .enumerate()
            .filter(move |&(i, _)| i != self.correct_index)
            .map(|(_, a)| a.as_str())
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let text = record.question.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if record.answers.len() != ANSWER_OPTIONS {
            return Err(QuestionError::WrongOptionCount {
                expected: ANSWER_OPTIONS,
                actual: record.answers.len(),
            });
        }
        if let Some(i) = record.answers.iter().position(|a| a.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(i));
        }
        let index = record.correct_answer_index;
        if index < 0 || index as usize >= record.answers.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index,
                options: record.answers.len(),
            });
        }

        Ok(Self {
            text,
            answers: record.answers,
            correct_index: index as usize,
        })
    }
}
