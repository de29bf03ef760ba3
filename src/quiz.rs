//! Quiz play: which questions are still eligible and which one comes next.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::db::Question;

/// Category restriction of a quiz round. On the wire this is `quiz_category.id`,
/// with `0` standing for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    All,
    Specific(i64),
}

impl From<i64> for QuizCategory {
    fn from(id: i64) -> Self {
        match id {
            0 => QuizCategory::All,
            id => QuizCategory::Specific(id),
        }
    }
}

impl QuizCategory {
    pub fn label(&self) -> String {
        match self {
            QuizCategory::All => "all".to_owned(),
            QuizCategory::Specific(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuizCategoryPayload {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub previous_questions: Vec<i64>,
    pub quiz_category: QuizCategoryPayload,
}

impl QuizRequest {
    pub fn category(&self) -> QuizCategory {
        QuizCategory::from(self.quiz_category.id)
    }
}

/// Outcome of one quiz draw. `question` is `None` once every candidate has been seen.
#[derive(Debug, Serialize, PartialEq)]
pub struct QuizPick {
    pub question: Option<Question>,
    pub total_questions: usize,
}

/// Draws one candidate uniformly at random. An empty candidate set never reaches the rng.
pub fn select_question<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> QuizPick {
    if candidates.is_empty() {
        return QuizPick {
            question: None,
            total_questions: 0,
        };
    }
    QuizPick {
        question: candidates.choose(rng).cloned(),
        total_questions: candidates.len(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn question(id: i64, category: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category,
            difficulty: 1,
        }
    }

    #[test]
    fn zero_means_every_category() {
        assert_eq!(QuizCategory::from(0), QuizCategory::All);
        assert_eq!(QuizCategory::from(4), QuizCategory::Specific(4));
        assert_eq!(QuizCategory::All.label(), "all");
        assert_eq!(QuizCategory::Specific(4).label(), "4");
    }

    #[test]
    fn request_accepts_numeric_strings_for_category() {
        let req: QuizRequest = serde_json::from_str(
            r#"{"previous_questions": [1, 2], "quiz_category": {"id": "3", "type": "Art"}}"#,
        )
        .unwrap();
        assert_eq!(req.previous_questions, vec![1, 2]);
        assert_eq!(req.category(), QuizCategory::Specific(3));

        let req: QuizRequest =
            serde_json::from_str(r#"{"previous_questions": [], "quiz_category": {"id": 0}}"#)
                .unwrap();
        assert_eq!(req.category(), QuizCategory::All);
    }

    #[test]
    fn request_without_previous_questions_is_rejected() {
        let res = serde_json::from_str::<QuizRequest>(r#"{"quiz_category": {"id": 0}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn empty_candidate_set_yields_no_question() {
        let mut rng = StdRng::seed_from_u64(7);
        let pick = select_question(&[], &mut rng);
        assert_eq!(
            pick,
            QuizPick {
                question: None,
                total_questions: 0
            }
        );
    }

    #[test]
    fn single_candidate_is_always_picked() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = vec![question(5, 2)];
        let pick = select_question(&candidates, &mut rng);
        assert_eq!(pick.question, Some(question(5, 2)));
        assert_eq!(pick.total_questions, 1);
    }

    #[test]
    fn every_candidate_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(42);
        let candidates: Vec<Question> = (1..=4).map(|id| question(id, 1)).collect();
        let mut hits: HashMap<i64, usize> = HashMap::new();
        for _ in 0..4000 {
            let pick = select_question(&candidates, &mut rng);
            assert_eq!(pick.total_questions, 4);
            *hits.entry(pick.question.unwrap().id).or_default() += 1;
        }
        assert_eq!(hits.len(), 4);
        // roughly uniform: each of the four should land near 1000 draws
        assert!(hits.values().all(|&n| (800..1200).contains(&n)), "{hits:?}");
    }
}
