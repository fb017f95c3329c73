use maud::{Markup, Render, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod class;
pub mod filter;
pub mod new_student;
pub mod student;

/// An id exactly as the backend sent it.
///
/// Numbers and strings are never equal to each other, so `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

///everything outside RFC 3986's unreserved set
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl ResourceId {
    fn json_form(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => serde_json::Value::from(s.as_str()).to_string(),
        }
    }

    /// The id as one URL path segment: its JSON form, percent-encoded, so `1` and `"1"` stay apart.
    pub fn to_path_segment(&self) -> String {
        utf8_percent_encode(&self.json_form(), PATH_SEGMENT).to_string()
    }

    /// Takes a segment axum already percent-decoded. Only the exact form
    /// [`Self::to_path_segment`] writes is accepted, so `01`, `+1` or ` 1` are not `1`.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        serde_json::from_str::<Self>(segment)
            .ok()
            .filter(|id| id.json_form() == segment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    Masculin,
    Feminin,
    Other(String),
}

impl Genre {
    pub const SELECTABLE: [Self; 2] = [Self::Masculin, Self::Feminin];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Masculin => "Masculin",
            Self::Feminin => "Féminin",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Genre {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Masculin" => Self::Masculin,
            "Féminin" => Self::Feminin,
            _ => Self::Other(value),
        }
    }
}

impl From<Genre> for String {
    fn from(value: Genre) -> Self {
        match value {
            Genre::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Render for Genre {
    fn render(&self) -> Markup {
        html! {
            (self.as_str())
        }
    }
}
