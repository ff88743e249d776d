//! Person use-case service.
//!
//! # Responsibility
//! - Provide the walkthrough operations (create, find, update, remove,
//!   chained query) as single calls over a repository.
//! - Log every failure and hand it back to the caller.
//!
//! # Invariants
//! - Each operation issues one storage call, except `find_edit_then_save`
//!   which fetches, mutates in memory and saves.
//! - No operation returns success data after a storage error.

use crate::model::person::{NewPerson, Person, PersonId};
use crate::repo::person_repo::{PersonRepository, RepoError};
use crate::repo::query::{
    DeleteResult, PersonField, PersonFilter, PersonQuery, PersonUpdate, SortField, SortOrder,
};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Food appended by `find_edit_then_save`.
pub const FOOD_TO_ADD: &str = "hamburger";
/// Age assigned by `find_and_update`.
pub const AGE_TO_SET: i64 = 20;
/// Name removed by `remove_many_people`.
pub const NAME_TO_REMOVE: &str = "Mary";
/// Food searched by `query_chain`.
pub const FOOD_TO_SEARCH: &str = "burrito";
/// Result cap applied by `query_chain`.
pub const QUERY_CHAIN_LIMIT: u32 = 2;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for person use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target person does not exist.
    PersonNotFound(PersonId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PersonNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PersonNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// The person saved by `create_and_save_person`.
pub fn sample_person() -> Person {
    Person::new("Justin Lee")
        .with_age(28)
        .with_favorite_foods(["italian sandwiches", "kbbq", "pizza"])
}

/// The records inserted by the bulk-create walkthrough step.
pub fn sample_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new("Gina", Some(33), ["bread"]),
        NewPerson::new("Kendra", Some(25), ["eggs"]),
        NewPerson::new("Patrick", Some(40), ["burgers"]),
    ]
}

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds and saves the sample person. Returns the stored document.
    pub fn create_and_save_person(&self) -> ServiceResult<Person> {
        let person = sample_person();
        let id = logged("create_and_save_person", self.repo.insert_person(&person))?;
        debug!("event=person_create module=service status=ok id={id}");
        Ok(person)
    }

    /// Inserts every record at once. Returns the stored documents in input
    /// order.
    pub fn create_many_people(&self, records: &[NewPerson]) -> ServiceResult<Vec<Person>> {
        let people: Vec<Person> = records.iter().cloned().map(Person::from).collect();
        logged("create_many_people", self.repo.insert_people(&people))?;
        debug!(
            "event=person_create_many module=service status=ok count={}",
            people.len()
        );
        Ok(people)
    }

    /// Finds every person with exactly this name.
    pub fn find_people_by_name(&self, name: &str) -> ServiceResult<Vec<Person>> {
        logged(
            "find_people_by_name",
            self.repo.find_people(&PersonFilter::by_name(name)),
        )
    }

    /// Finds the first person whose food list contains `food`.
    pub fn find_one_by_food(&self, food: &str) -> ServiceResult<Option<Person>> {
        logged(
            "find_one_by_food",
            self.repo.find_one_person(&PersonFilter::by_food(food)),
        )
    }

    pub fn find_person_by_id(&self, id: PersonId) -> ServiceResult<Option<Person>> {
        logged("find_person_by_id", self.repo.find_person_by_id(id))
    }

    /// Fetches a person, appends [`FOOD_TO_ADD`] and saves the whole
    /// document back.
    ///
    /// # Errors
    /// - `PersonNotFound` when no person has this id.
    pub fn find_edit_then_save(&self, id: PersonId) -> ServiceResult<Person> {
        let found = logged("find_edit_then_save", self.repo.find_person_by_id(id))?;
        let Some(mut person) = found else {
            error!(
                "event=find_edit_then_save module=service status=error error_code=not_found id={id}"
            );
            return Err(ServiceError::PersonNotFound(id));
        };

        person.favorite_foods.push(FOOD_TO_ADD.to_string());
        logged("find_edit_then_save", self.repo.save_person(&person))?;
        Ok(person)
    }

    /// Sets age to [`AGE_TO_SET`] on the first person with this name and
    /// returns the updated document.
    pub fn find_and_update(&self, name: &str) -> ServiceResult<Option<Person>> {
        logged(
            "find_and_update",
            self.repo.find_one_and_update(
                &PersonFilter::by_name(name),
                &PersonUpdate::set_age(AGE_TO_SET),
            ),
        )
    }

    /// Deletes one person by id and returns the removed document.
    pub fn remove_by_id(&self, id: PersonId) -> ServiceResult<Option<Person>> {
        logged("remove_by_id", self.repo.find_by_id_and_remove(id))
    }

    /// Deletes every person named [`NAME_TO_REMOVE`].
    pub fn remove_many_people(&self) -> ServiceResult<DeleteResult> {
        logged(
            "remove_many_people",
            self.repo.remove_people(&PersonFilter::by_name(NAME_TO_REMOVE)),
        )
    }

    /// People who like [`FOOD_TO_SEARCH`], sorted by name, at most
    /// [`QUERY_CHAIN_LIMIT`] of them, with `age` hidden.
    pub fn query_chain(&self) -> ServiceResult<Vec<Person>> {
        let query = PersonQuery::new(PersonFilter::by_food(FOOD_TO_SEARCH))
            .sort(SortField::Name, SortOrder::Ascending)
            .limit(QUERY_CHAIN_LIMIT)
            .exclude(PersonField::Age);
        logged("query_chain", self.repo.run_query(&query))
    }
}

fn logged<T>(event: &str, result: Result<T, RepoError>) -> ServiceResult<T> {
    result.map_err(|err| {
        error!("event={event} module=service status=error error={err}");
        ServiceError::from(err)
    })
}
