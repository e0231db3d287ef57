//! Client-side filtering and ordering of the quiz list.

use std::cmp::Ordering;
use std::collections::HashSet;

use clap::ValueEnum;

use crate::models::QuizSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    #[default]
    Title,
    Newest,
    Rating,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub favorites_only: bool,
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, quiz: &QuizSummary, favorites: &HashSet<String>) -> bool {
        if self.favorites_only && !favorites.contains(&quiz.id) {
            return false;
        }

        if let Some(category) = &self.category {
            let same = quiz
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                quiz.title.to_lowercase().contains(&needle)
                    || quiz
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Applies `query` to `quizzes`, returning matches in the requested order.
pub fn filter_quizzes<'a>(
    quizzes: &'a [QuizSummary],
    query: &CatalogQuery,
    favorites: &HashSet<String>,
) -> Vec<&'a QuizSummary> {
    let mut matched: Vec<&QuizSummary> = quizzes
        .iter()
        .filter(|quiz| query.matches(quiz, favorites))
        .collect();

    match query.sort {
        SortOrder::Title => {
            matched.sort_by_key(|quiz| quiz.title.to_lowercase());
        }
        SortOrder::Newest => {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortOrder::Rating => {
            matched.sort_by(|a, b| match (a.average_rating, b.average_rating) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }

    matched
}

/// Distinct categories present in the list, sorted.
pub fn categories(quizzes: &[QuizSummary]) -> Vec<String> {
    let mut found: Vec<String> = quizzes
        .iter()
        .filter_map(|q| q.category.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn summary(id: &str, title: &str, category: &str, rating: Option<f64>, day: u32) -> QuizSummary {
        QuizSummary {
            id: id.to_string(),
            title: title.to_string(),
            description: Some(format!("All about {}", title.to_lowercase())),
            category: Some(category.to_string()),
            question_count: Some(10),
            average_rating: rating,
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).single(),
        }
    }

    fn quizzes() -> Vec<QuizSummary> {
        vec![
            summary("1", "Lifetimes", "rust", Some(4.5), 3),
            summary("2", "async Await", "rust", None, 9),
            summary("3", "Capitals", "geography", Some(3.0), 1),
            summary("4", "Borrowing", "rust", Some(4.9), 5),
        ]
    }

    fn ids(found: Vec<&QuizSummary>) -> Vec<&str> {
        found.into_iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_by_title_case_insensitively() {
        let all = quizzes();
        let found = filter_quizzes(&all, &CatalogQuery::default(), &HashSet::new());
        assert_eq!(ids(found), vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn search_covers_title_and_description() {
        let all = quizzes();
        let query = CatalogQuery {
            search: Some("  BORROW ".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter_quizzes(&all, &query, &HashSet::new())), vec!["4"]);

        let query = CatalogQuery {
            search: Some("about capitals".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter_quizzes(&all, &query, &HashSet::new())), vec!["3"]);
    }

    #[test]
    fn category_and_favorites_narrow_results() {
        let all = quizzes();
        let favorites: HashSet<String> = ["1".to_string(), "3".to_string()].into();
        let query = CatalogQuery {
            category: Some("Rust".to_string()),
            favorites_only: true,
            ..Default::default()
        };
        assert_eq!(ids(filter_quizzes(&all, &query, &favorites)), vec!["1"]);
    }

    #[test]
    fn rating_sort_puts_unrated_last() {
        let all = quizzes();
        let query = CatalogQuery {
            sort: SortOrder::Rating,
            ..Default::default()
        };
        assert_eq!(
            ids(filter_quizzes(&all, &query, &HashSet::new())),
            vec!["4", "1", "3", "2"]
        );
    }

    #[test]
    fn newest_first() {
        let all = quizzes();
        let query = CatalogQuery {
            sort: SortOrder::Newest,
            ..Default::default()
        };
        assert_eq!(
            ids(filter_quizzes(&all, &query, &HashSet::new())),
            vec!["2", "4", "1", "3"]
        );
    }

    #[test]
    fn lists_distinct_categories() {
        assert_eq!(categories(&quizzes()), vec!["geography", "rust"]);
    }
}
