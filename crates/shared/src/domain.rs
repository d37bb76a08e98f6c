use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ItemId);
id_newtype!(CategoryId);

/// Remote collections that accept `DELETE /{collection}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[default]
    Questions,
    Venues,
    Artists,
}

impl ResourceKind {
    pub fn collection(self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Venues => "venues",
            Self::Artists => "artists",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Questions => "question",
            Self::Venues => "venue",
            Self::Artists => "artist",
        }
    }

    pub fn load_failure_message(self) -> String {
        format!(
            "Unable to load {}. Please try your request again",
            self.collection()
        )
    }

    pub fn create_failure_message(self) -> String {
        format!(
            "Unable to add {}. Please try your request again",
            self.singular()
        )
    }

    pub fn delete_prompt(self) -> String {
        format!("are you sure you want to delete the {}?", self.singular())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&ItemId(7)).expect("json"), "7");
        let id: CategoryId = serde_json::from_str("3").expect("decode");
        assert_eq!(id, CategoryId(3));
    }

    #[test]
    fn resource_messages_name_the_collection() {
        assert_eq!(
            ResourceKind::Questions.load_failure_message(),
            "Unable to load questions. Please try your request again"
        );
        assert_eq!(
            ResourceKind::Venues.delete_prompt(),
            "are you sure you want to delete the venue?"
        );
        assert_eq!(ResourceKind::Artists.to_string(), "artists");
    }
}
