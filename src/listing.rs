//! Filtering and pagination of question lists.
//!
//! The store hands back every question ordered by id; this module narrows that list down by
//! category and search term, cuts a page out of it and assembles the payload shared by the
//! question listing endpoints.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::db::{Category, Question};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Category id to category name, rendered as a JSON object keyed by the stringified id.
pub type CategoryMap = BTreeMap<i64, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Id(i64),
}

impl CategoryFilter {
    pub fn admits(&self, question: &Question) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => question.category == *id,
        }
    }
}

// Echoed back as "All" or as the bare numeric id.
impl Serialize for CategoryFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CategoryFilter::All => serializer.serialize_str("All"),
            CategoryFilter::Id(id) => serializer.serialize_i64(*id),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuestionsPayload {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: CategoryMap,
    pub current_category: CategoryFilter,
}

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// Case-insensitive substring match; an absent or empty term matches everything.
pub fn matches_search(question: &Question, search_term: Option<&str>) -> bool {
    match search_term {
        None | Some("") => true,
        Some(term) => question
            .question
            .to_lowercase()
            .contains(&term.to_lowercase()),
    }
}

/// One-based page of `QUESTIONS_PER_PAGE` items. Page 0 and pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: u32) -> Vec<T> {
    if page == 0 {
        return Vec::new();
    }
    let offset = (page as usize - 1).saturating_mul(QUESTIONS_PER_PAGE);
    items
        .iter()
        .skip(offset)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}

pub fn build_payload(
    questions: Vec<Question>,
    categories: Vec<Category>,
    search_term: Option<&str>,
    filter: CategoryFilter,
    page: u32,
) -> QuestionsPayload {
    let selection: Vec<Question> = questions
        .into_iter()
        .filter(|q| filter.admits(q) && matches_search(q, search_term))
        .collect();

    QuestionsPayload {
        questions: paginate(&selection, page),
        total_questions: selection.len(),
        categories: category_map(categories),
        current_category: filter,
    }
}
