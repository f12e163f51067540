//! Quiz content
//!
//! Questions come from an external provider that may fail or return junk.
//! [`QuestionBank::load`] validates what it gets and falls back to a
//! built-in list so a game can always start.

pub mod provider;
pub mod question;

pub use provider::{JsonFileProvider, QuestionProvider, StaticProvider, parse_questions};
pub use question::{ANSWER_OPTIONS, Question, QuestionRecord};

use serde::Serialize;

/// Non-empty, ordered list of valid questions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build from validated questions. `None` if empty.
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            None
        } else {
            Some(Self { questions })
        }
    }

    /// Fetch from a provider, dropping malformed questions. Falls back to
    /// the built-in bank on any provider error or if nothing survives.
    pub fn load(provider: &mut dyn QuestionProvider) -> Self {
        let records = match provider.fetch_questions() {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Question provider failed, using fallback: {err}");
                return Self::fallback();
            }
        };

        let total = records.len();
        let questions: Vec<Question> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match Question::try_from(record) {
                Ok(q) => Some(q),
                Err(err) => {
                    log::warn!("Discarding malformed question {i}: {err}");
                    None
                }
            })
            .collect();

        match Self::new(questions) {
            Some(bank) => {
                log::info!("Loaded {} of {} questions", bank.len(), total);
                bank
            }
            None => {
                log::warn!("No valid questions from provider, using fallback");
                Self::fallback()
            }
        }
    }

    /// Built-in questions used when the provider cannot deliver
    pub fn fallback() -> Self {
        let questions = fallback_records()
            .into_iter()
            .filter_map(|r| Question::try_from(r).ok())
            .collect();
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at `index`, wrapping around the bank
    pub fn get(&self, index: usize) -> &Question {
        &self.questions[index % self.questions.len()]
    }

    /// Index that follows `index`, cycling
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

fn fallback_records() -> Vec<QuestionRecord> {
    let record = |question: &str, answers: [&str; 3], correct: i64| QuestionRecord {
        question: question.to_string(),
        answers: answers.iter().map(|a| a.to_string()).collect(),
        correct_answer_index: correct,
    };
    vec![
        record(
            "How many rings make up the Sufficiency Economy Philosophy?",
            ["2 rings", "3 rings", "4 rings"],
            1,
        ),
        record(
            "What is growing many crops on the same plot called?",
            ["Mixed farming", "Monoculture", "Shifting farming"],
            0,
        ),
        record(
            "Which one shows moderation?",
            ["Overspending", "Not being greedy", "Borrowing for trips"],
            1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    struct Failing;

    impl QuestionProvider for Failing {
        fn fetch_questions(&mut self) -> Result<Vec<QuestionRecord>, ProviderError> {
            Err(ProviderError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_fallback_has_three_valid_questions() {
        let bank = QuestionBank::fallback();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.get(0).correct_answer(), "3 rings");
    }

    #[test]
    fn test_provider_failure_uses_fallback() {
        let bank = QuestionBank::load(&mut Failing);
        assert_eq!(bank, QuestionBank::fallback());
    }

    #[test]
    fn test_malformed_questions_are_discarded() {
        let json = r#"[
            {"question":"Good?","answers":["a","b","c"],"correctAnswerIndex":0},
            {"question":"Two options","answers":["a","b"],"correctAnswerIndex":0},
            {"question":"Bad index","answers":["a","b","c"],"correctAnswerIndex":7}
        ]"#;
        let mut provider = StaticProvider::new(parse_questions(json).unwrap());
        let bank = QuestionBank::load(&mut provider);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).text(), "Good?");
    }

    #[test]
    fn test_all_malformed_uses_fallback() {
        let mut provider = StaticProvider::new(vec![QuestionRecord::default()]);
        assert_eq!(QuestionBank::load(&mut provider), QuestionBank::fallback());
    }

    #[test]
    fn test_index_wraps() {
        let bank = QuestionBank::fallback();
        assert_eq!(bank.next_index(2), 0);
        assert_eq!(bank.get(4), bank.get(1));
        assert!(QuestionBank::new(Vec::new()).is_none());
    }
}
