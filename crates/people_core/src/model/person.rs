//! Person domain model.
//!
//! # Responsibility
//! - Define the single document shape persisted by the people store.
//! - Enforce the required-name rule before any write.
//!
//! # Invariants
//! - `id` is assigned at construction time and never reused.
//! - `name` is required; the empty string counts as missing.
//! - `favorite_foods` keeps insertion order and may hold duplicates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Unique identifier assigned to every stored person.
pub type PersonId = Uuid;

/// Validation failures for person documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// `name` is required.
    MissingName,
    /// The nil UUID is never a valid document id.
    NilId,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "person validation failed: name is required"),
            Self::NilId => write!(f, "person validation failed: id must not be nil"),
        }
    }
}

impl Error for PersonValidationError {}

/// Stored person document.
///
/// Serialized with document-style field names (`_id`, `favoriteFoods`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPerson")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    pub age: Option<i64>,
    #[serde(rename = "favoriteFoods")]
    pub favorite_foods: Vec<String>,
}

#[derive(Deserialize)]
struct RawPerson {
    #[serde(rename = "_id")]
    id: PersonId,
    name: String,
    #[serde(default)]
    age: Option<i64>,
    #[serde(rename = "favoriteFoods", default)]
    favorite_foods: Vec<String>,
}

impl TryFrom<RawPerson> for Person {
    type Error = PersonValidationError;

    fn try_from(value: RawPerson) -> Result<Self, Self::Error> {
        let person = Self {
            id: value.id,
            name: value.name,
            age: value.age,
            favorite_foods: value.favorite_foods,
        };
        person.validate()?;
        Ok(person)
    }
}

impl Person {
    /// Creates a person with a freshly generated id.
    ///
    /// Validation is deferred to write time, matching how a document model
    /// instance can be built before it is saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    /// Creates a person with a caller-provided id.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    pub fn with_id(id: PersonId, name: impl Into<String>) -> Result<Self, PersonValidationError> {
        if id.is_nil() {
            return Err(PersonValidationError::NilId);
        }
        Ok(Self {
            id,
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        })
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the document against the schema rules.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.id.is_nil() {
            return Err(PersonValidationError::NilId);
        }
        if self.name.is_empty() {
            return Err(PersonValidationError::MissingName);
        }
        Ok(())
    }

    /// Returns whether `food` appears in this person's food list.
    pub fn likes(&self, food: &str) -> bool {
        self.favorite_foods.iter().any(|item| item == food)
    }
}

/// Record literal used for bulk creation.
///
/// Carries no id; one is assigned when the record becomes a [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    pub fn new<I, S>(name: impl Into<String>, age: Option<i64>, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            age,
            favorite_foods: foods.into_iter().map(Into::into).collect(),
        }
    }

    /// Converts the literal into a document with a fresh id.
    pub fn into_person(self) -> Person {
        Person {
            id: Uuid::new_v4(),
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
        }
    }
}

impl From<NewPerson> for Person {
    fn from(value: NewPerson) -> Self {
        value.into_person()
    }
}
