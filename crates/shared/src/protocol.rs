//! Wire schemas for the list endpoints.
//!
//! Every response is decoded into one of these types at the HTTP boundary.
//! A body that does not fit its schema is a contract violation and never
//! reaches the list state.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{CategoryId, ItemId};

/// Number of items the backend puts on one page.
pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: ItemId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    pub difficulty: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub label: String,
}

/// Category set as sent by the backend.
///
/// Accepts `[{"id": 1, "type": "Science"}]`, `{"1": "Science"}` and bare
/// label lists (`["Science"]`, ids assigned by 1-based position).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCategorySet")]
pub struct CategorySet(pub Vec<Category>);

impl CategorySet {
    pub fn into_vec(self) -> Vec<Category> {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryEntry {
    Full {
        id: CategoryId,
        #[serde(rename = "type")]
        label: String,
    },
    Label(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategorySet {
    List(Vec<RawCategoryEntry>),
    Map(BTreeMap<String, String>),
}

impl TryFrom<RawCategorySet> for CategorySet {
    type Error = String;

    fn try_from(raw: RawCategorySet) -> Result<Self, Self::Error> {
        let categories = match raw {
            RawCategorySet::List(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| match entry {
                    RawCategoryEntry::Full { id, label } => Category { id, label },
                    RawCategoryEntry::Label(label) => Category {
                        id: CategoryId(idx as i64 + 1),
                        label,
                    },
                })
                .collect(),
            RawCategorySet::Map(map) => {
                let mut categories = map
                    .into_iter()
                    .map(|(key, label)| {
                        key.parse::<i64>()
                            .map(|id| Category {
                                id: CategoryId(id),
                                label,
                            })
                            .map_err(|_| format!("category key '{key}' is not an integer id"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                categories.sort_by_key(|category| category.id.0);
                categories
            }
        };
        Ok(Self(categories))
    }
}

/// The server's notion of the category currently in view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(CategoryId),
    Label(String),
}

/// `GET /questions?page={n}`
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionPage<T> {
    pub questions: Vec<T>,
    pub total_questions: u64,
    pub categories: CategorySet,
    #[serde(default)]
    pub current_category: Option<CategoryRef>,
}

/// `GET /categories/{id}/questions`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryQuestions<T> {
    pub questions: Vec<T>,
    pub total_questions: u64,
    #[serde(default)]
    pub current_category: Option<CategoryRef>,
}

/// `POST /questions/search` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

/// `POST /questions/search`
///
/// Both list fields must be present; an explicit `null` means no matches.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResults<T> {
    #[serde(deserialize_with = "nullable")]
    pub questions: Option<Vec<T>>,
    #[serde(deserialize_with = "nullable")]
    pub total_questions: Option<u64>,
    #[serde(default)]
    pub current_category: Option<CategoryRef>,
}

/// `GET /categories`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryListing {
    pub categories: CategorySet,
    pub total_categories: u64,
}

/// `POST /questions` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

/// Acknowledgement returned by mutating endpoints (`DELETE`, `POST /questions`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub success: Value,
    #[serde(default)]
    pub deleted: Option<ItemId>,
}

impl MutationAck {
    pub fn succeeded(&self) -> bool {
        is_truthy(&self.success)
    }
}

/// Loose truthiness used for `success` markers.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
