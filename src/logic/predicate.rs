use crate::logic::error::SurveyError;
use crate::model::{FilterKey, FilterSet};

/// A parameterized `WHERE` clause and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub clause: String,
    pub args: Vec<String>,
}

/// Translate a filter set into `WHERE 1=1 AND column = $n ...`.
///
/// Only whitelisted column names reach the SQL text; every value is bound.
/// Placeholders are numbered from 1 in filter order.
pub fn build_predicate(filters: &FilterSet) -> Result<Predicate, SurveyError> {
    let mut clause = String::from("WHERE 1=1");
    let mut args = Vec::with_capacity(filters.len());

    for (key, value) in filters.iter() {
        let key = FilterKey::parse(key).ok_or_else(|| SurveyError::InvalidFilterKey(key.to_string()))?;
        args.push(value.to_string());
        clause.push_str(&format!(" AND {} = ${}", key.column(), args.len()));
    }

    Ok(Predicate { clause, args })
}
