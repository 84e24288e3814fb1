//! Question-group detection ("auto mode")
//!
//! Survey exports keep the full question text next to each answer column as
//! `<column>_fulltext`, in the form `Native name (English name) [question]`.
//! Columns whose text shares the first three letters of the English name
//! belong to the same variable group.

use likert_core::{Cell, DataTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const FULLTEXT_SUFFIX: &str = "_fulltext";

const GROUP_KEY_LEN: usize = 3;

static HEADER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// `Native name (English name) [`, compiled once
fn header_regex() -> Option<&'static Regex> {
    HEADER_REGEX
        .get_or_init(|| Regex::new(r"^([^(]+)\s*\(([^)]+)\)\s*\[").ok())
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Answer column
    pub id: String,
    /// Full question text
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableGroup {
    /// First three letters of the English name, upper-cased
    pub id: String,
    pub name: String,
    pub english_name: String,
    pub questions: Vec<Question>,
}

impl VariableGroup {
    /// Answer columns in question order
    pub fn variables(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}

/// Answer columns of the table, `_fulltext` companions excluded
pub fn answer_columns(table: &DataTable) -> Vec<String> {
    table
        .columns()
        .into_iter()
        .filter(|c| !c.ends_with(FULLTEXT_SUFFIX))
        .collect()
}

/// Group answer columns by the English name in their first-row question text
pub fn detect_question_groups(table: &DataTable) -> Vec<VariableGroup> {
    let (first, regex) = match (table.rows.first(), header_regex()) {
        (Some(row), Some(regex)) => (row, regex),
        _ => return Vec::new(),
    };

    let mut groups: Vec<VariableGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for column in answer_columns(table) {
        let text = match first.get(&format!("{}{}", column, FULLTEXT_SUFFIX)).and_then(Cell::as_text) {
            Some(t) => t,
            None => continue,
        };
        let caps = match regex.captures(text) {
            Some(c) => c,
            None => continue,
        };

        let name = caps[1].trim().to_string();
        let english_name = caps[2].trim().to_string();
        let key: String = english_name.to_uppercase().chars().take(GROUP_KEY_LEN).collect();

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(VariableGroup {
                id: key,
                name,
                english_name,
                questions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].questions.push(Question {
            id: column,
            text: text.to_string(),
        });
    }

    for group in &mut groups {
        group.questions.sort_by_key(|q| question_number(&q.id).map_or((1, 0), |n| (0, n)));
    }
    groups
}

/// Leading integer after the three-character prefix (`"SAT12"` → 12)
fn question_number(id: &str) -> Option<i64> {
    let digits: String = id
        .chars()
        .skip(GROUP_KEY_LEN)
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::Row;

    fn row(pairs: &[(&str, Cell)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn survey() -> DataTable {
        DataTable::new(vec![
            row(&[
                ("SAT10", Cell::Number(4.0)),
                ("SAT10_fulltext", text("ความพึงพอใจ (Satisfaction) [overall service]")),
                ("SAT2", Cell::Number(3.0)),
                ("SAT2_fulltext", text("ความพึงพอใจ (Satisfaction) [staff]")),
                ("LOY1", Cell::Number(5.0)),
                ("LOY1_fulltext", text("ความภักดี (Loyalty) [recommend]")),
                ("age", Cell::Number(31.0)),
                ("note", Cell::Number(1.0)),
                ("note_fulltext", text("free text without a bracket")),
            ]),
            row(&[("SAT10", Cell::Number(2.0)), ("SAT2", Cell::Number(2.0))]),
        ])
    }

    #[test]
    fn test_detect_groups() {
        let groups = detect_question_groups(&survey());
        assert_eq!(groups.len(), 2);

        let loy = groups.iter().find(|g| g.id == "LOY").unwrap();
        assert_eq!(loy.english_name, "Loyalty");
        assert_eq!(loy.name, "ความภักดี");
        assert_eq!(loy.variables(), vec!["LOY1".to_string()]);

        let sat = groups.iter().find(|g| g.id == "SAT").unwrap();
        assert_eq!(sat.variables(), vec!["SAT2".to_string(), "SAT10".to_string()]);
        assert_eq!(sat.questions[1].text, "ความพึงพอใจ (Satisfaction) [overall service]");
    }

    #[test]
    fn test_fulltext_columns_excluded() {
        let columns = answer_columns(&survey());
        assert!(columns.iter().all(|c| !c.ends_with(FULLTEXT_SUFFIX)));
        assert!(columns.contains(&"age".to_string()));
    }

    #[test]
    fn test_empty_table() {
        assert!(detect_question_groups(&DataTable::default()).is_empty());
    }

    #[test]
    fn test_question_number() {
        assert_eq!(question_number("SAT12"), Some(12));
        assert_eq!(question_number("SAT 3"), Some(3));
        assert_eq!(question_number("SATx"), None);
        assert_eq!(question_number("SA"), None);
    }

    #[test]
    fn test_unnumbered_questions_sort_last() {
        let table = DataTable::new(vec![row(&[
            ("ENVa", Cell::Number(1.0)),
            ("ENVa_fulltext", text("x (Environment) [a]")),
            ("ENV7", Cell::Number(1.0)),
            ("ENV7_fulltext", text("x (Environment) [b]")),
        ])]);
        let groups = detect_question_groups(&table);
        assert_eq!(groups[0].variables(), vec!["ENV7".to_string(), "ENVa".to_string()]);
    }
}
