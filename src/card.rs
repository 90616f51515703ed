// cardcheck/src/card.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeSet, fmt};

/// Every field a card may carry. The JSON key is the lowercase variant name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Profession,
    Quote,
    Github,
    Email,
    Twitter,
    Dribbble,
    Behance,
    Linkedin,
}

impl Field {
    pub const REQUIRED: [Field; 4] = [Field::Name, Field::Profession, Field::Quote, Field::Github];
    pub const OPTIONAL: [Field; 5] = [Field::Email, Field::Twitter, Field::Dribbble, Field::Behance, Field::Linkedin];
    pub const ALL: [Field; 9] = [
        Field::Name, Field::Profession, Field::Quote, Field::Github,
        Field::Email, Field::Twitter, Field::Dribbble, Field::Behance, Field::Linkedin,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Profession => "profession",
            Self::Quote => "quote",
            Self::Github => "github",
            Self::Email => "email",
            Self::Twitter => "twitter",
            Self::Dribbble => "dribbble",
            Self::Behance => "behance",
            Self::Linkedin => "linkedin",
        }
    }

    pub fn is_required(&self) -> bool { Self::REQUIRED.contains(self) }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

/// One entry of `cardDetails`. A field value is `None` when the key is absent or `null`;
/// `present` still records a `null` key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Card {
    #[serde(skip)]
    pub(crate) present: BTreeSet<Field>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub profession: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub quote: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub github: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub twitter: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub dribbble: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub behance: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub linkedin: Option<String>,
}

impl Card {
    /// Reads a card out of one `cardDetails` element; `None` unless the element is an object.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        // serde would also accept a sequence for a struct, so check the shape first.
        let obj = value.as_object()?;
        let mut card = Card::deserialize(value).ok()?;
        card.present = Field::ALL.into_iter().filter(|f| obj.contains_key(f.key())).collect();
        Some(card)
    }

    /// The key appears in the source object, whatever its value.
    pub fn is_present(&self, field: Field) -> bool {
        self.present.contains(&field) || self.get(field).is_some()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let v = match field {
            Field::Name => &self.name,
            Field::Profession => &self.profession,
            Field::Quote => &self.quote,
            Field::Github => &self.github,
            Field::Email => &self.email,
            Field::Twitter => &self.twitter,
            Field::Dribbble => &self.dribbble,
            Field::Behance => &self.behance,
            Field::Linkedin => &self.linkedin,
        };
        v.as_deref()
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn filled(&self, field: Field) -> Option<&str> {
        self.get(field).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Name shown in diagnostics; the raw value, untrimmed.
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(n) => n.clone(),
            None => format!("(unknown at index {index})"),
        }
    }
}

// Non-string scalars are kept as their JSON text so that `"github": 42` still counts as filled.
fn scalar_as_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(de)?;
    Ok(match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
