use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;
use crate::listing::CategoryFilter;

/// Scope of a quiz round. The quiz frontend sends id `0` for "all categories", and real
/// category ids start at 1, so both a missing id and `0` leave the round unrestricted.
pub fn quiz_scope(category_id: Option<i64>) -> CategoryFilter {
    match category_id {
        None | Some(0) => CategoryFilter::All,
        Some(id) => CategoryFilter::Id(id),
    }
}

pub fn candidates(
    questions: Vec<Question>,
    previous_questions: &[i64],
    scope: CategoryFilter,
) -> Vec<Question> {
    let asked: HashSet<i64> = previous_questions.iter().copied().collect();
    questions
        .into_iter()
        .filter(|q| scope.admits(q) && !asked.contains(&q.id))
        .collect()
}

/// Uniformly random question from the remaining candidates, `None` once they run out.
pub fn pick_question<R: Rng + ?Sized>(
    questions: Vec<Question>,
    previous_questions: &[i64],
    scope: CategoryFilter,
    rng: &mut R,
) -> Option<Question> {
    candidates(questions, previous_questions, scope)
        .choose(rng)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: i64, category: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category,
            difficulty: 3,
        }
    }

    fn pool() -> Vec<Question> {
        vec![
            question(1, 1),
            question(2, 1),
            question(3, 2),
            question(4, 2),
            question(5, 3),
        ]
    }

    #[test]
    fn never_repeats_a_previous_question() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_question(pool(), &[1, 3, 5], CategoryFilter::All, &mut rng).unwrap();
            assert!(picked.id == 2 || picked.id == 4);
        }
    }

    #[test]
    fn stays_inside_the_requested_category() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let picked = pick_question(pool(), &[], CategoryFilter::Id(2), &mut rng).unwrap();
            assert_eq!(picked.category, 2);
        }
    }

    #[test]
    fn exhausted_category_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick_question(pool(), &[3, 4], CategoryFilter::Id(2), &mut rng).is_none());
        assert!(pick_question(vec![], &[], CategoryFilter::All, &mut rng).is_none());
    }

    #[test]
    fn every_candidate_can_come_up() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<i64> = (0..200)
            .filter_map(|_| pick_question(pool(), &[], CategoryFilter::All, &mut rng))
            .map(|q| q.id)
            .collect();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn missing_or_zero_category_means_all() {
        assert_eq!(quiz_scope(None), CategoryFilter::All);
        assert_eq!(quiz_scope(Some(0)), CategoryFilter::All);
        assert_eq!(quiz_scope(Some(4)), CategoryFilter::Id(4));
    }
}
