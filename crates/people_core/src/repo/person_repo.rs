//! Person repository contract and SQLite document-store implementation.
//!
//! # Responsibility
//! - Provide one method per storage call used by the person use-cases.
//! - Keep SQL and JSON document encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Person::validate()` before SQL mutations.
//! - Read paths reject invalid persisted documents instead of masking them.
//! - Unordered reads return documents in insertion order.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::person::{Person, PersonId, PersonValidationError};
use crate::repo::query::{DeleteResult, PersonField, PersonFilter, PersonQuery, PersonUpdate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_COLUMNS: &[&str] = &["seq", "id", "name", "age", "favorite_foods"];
const FOOD_MATCH_SQL: &str = " AND EXISTS (
    SELECT 1
    FROM json_each(people.favorite_foods)
    WHERE json_each.value = ?
)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage calls available for person documents.
pub trait PersonRepository {
    /// Insert-one. Returns the stored id.
    fn insert_person(&self, person: &Person) -> RepoResult<PersonId>;
    /// Insert-many. Either every document is stored or none is.
    fn insert_people(&self, people: &[Person]) -> RepoResult<Vec<PersonId>>;
    /// Find-by-filter.
    fn find_people(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>>;
    /// Find-one-by-filter: the earliest inserted match.
    fn find_one_person(&self, filter: &PersonFilter) -> RepoResult<Option<Person>>;
    /// Find-by-identifier.
    fn find_person_by_id(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Full-document replace keyed by `person.id`.
    fn save_person(&self, person: &Person) -> RepoResult<()>;
    /// Update-by-filter on the first match; returns the document after update.
    fn find_one_and_update(
        &self,
        filter: &PersonFilter,
        update: &PersonUpdate,
    ) -> RepoResult<Option<Person>>;
    /// Delete-by-identifier; returns the removed document.
    fn find_by_id_and_remove(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Delete-by-filter.
    fn remove_people(&self, filter: &PersonFilter) -> RepoResult<DeleteResult>;
    /// Chained query with sort, limit and field selection.
    fn run_query(&self, query: &PersonQuery) -> RepoResult<Vec<Person>>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `people`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, person: &Person) -> RepoResult<PersonId> {
        person.validate()?;
        insert_row(self.conn, person)?;
        Ok(person.id)
    }

    fn insert_people(&self, people: &[Person]) -> RepoResult<Vec<PersonId>> {
        for person in people {
            person.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        for person in people {
            insert_row(&tx, person)?;
        }
        tx.commit()?;

        Ok(people.iter().map(|person| person.id).collect())
    }

    fn find_people(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>> {
        self.run_query(&PersonQuery::new(filter.clone()))
    }

    fn find_one_person(&self, filter: &PersonFilter) -> RepoResult<Option<Person>> {
        let mut found = self.run_query(&PersonQuery::new(filter.clone()).limit(1))?;
        Ok(found.pop())
    }

    fn find_person_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        load_by_id(self.conn, id)
    }

    fn save_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE people
             SET
                name = ?1,
                age = ?2,
                favorite_foods = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                person.name.as_str(),
                person.age,
                foods_to_db(&person.favorite_foods)?,
                person.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        Ok(())
    }

    fn find_one_and_update(
        &self,
        filter: &PersonFilter,
        update: &PersonUpdate,
    ) -> RepoResult<Option<Person>> {
        if matches!(update.name.as_deref(), Some("")) {
            return Err(RepoError::Validation(PersonValidationError::MissingName));
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut sql = String::from("SELECT id FROM people WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filter(&mut sql, &mut bind_values, filter);
        sql.push_str(" ORDER BY seq ASC LIMIT 1");

        let target: Option<String> = tx
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))
            .optional()?;
        let Some(id_text) = target else {
            return Ok(None);
        };

        if !update.is_empty() {
            let mut assignments = Vec::new();
            let mut bind_values: Vec<Value> = Vec::new();
            if let Some(name) = update.name.as_ref() {
                assignments.push("name = ?");
                bind_values.push(Value::Text(name.clone()));
            }
            if let Some(age) = update.age {
                assignments.push("age = ?");
                bind_values.push(Value::Integer(age));
            }
            if let Some(foods) = update.favorite_foods.as_ref() {
                assignments.push("favorite_foods = ?");
                bind_values.push(Value::Text(foods_to_db(foods)?));
            }
            assignments.push("updated_at = (strftime('%s', 'now') * 1000)");
            bind_values.push(Value::Text(id_text.clone()));

            tx.execute(
                &format!("UPDATE people SET {} WHERE id = ?;", assignments.join(", ")),
                params_from_iter(bind_values),
            )?;
        }

        let updated = load_by_id(&tx, parse_id(&id_text)?)?;
        tx.commit()?;
        Ok(updated)
    }

    fn find_by_id_and_remove(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(person) = load_by_id(&tx, id)? else {
            return Ok(None);
        };
        tx.execute("DELETE FROM people WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(Some(person))
    }

    fn remove_people(&self, filter: &PersonFilter) -> RepoResult<DeleteResult> {
        let mut sql = String::from("DELETE FROM people WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filter(&mut sql, &mut bind_values, filter);

        let deleted = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(DeleteResult {
            deleted_count: deleted as u64,
        })
    }

    fn run_query(&self, query: &PersonQuery) -> RepoResult<Vec<Person>> {
        let age_column = if query.hides(PersonField::Age) {
            "NULL AS age"
        } else {
            "age"
        };
        let foods_column = if query.hides(PersonField::FavoriteFoods) {
            "'[]' AS favorite_foods"
        } else {
            "favorite_foods"
        };

        let mut sql =
            format!("SELECT id, name, {age_column}, {foods_column} FROM people WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filter(&mut sql, &mut bind_values, &query.filter);

        match query.sort {
            Some((field, order)) => sql.push_str(&format!(
                " ORDER BY people.{} {}, seq ASC",
                field.column(),
                order.keyword()
            )),
            None => sql.push_str(" ORDER BY seq ASC"),
        }

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }
}

fn insert_row(conn: &Connection, person: &Person) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO people (
            id,
            name,
            age,
            favorite_foods
        ) VALUES (?1, ?2, ?3, ?4);",
        params![
            person.id.to_string(),
            person.name.as_str(),
            person.age,
            foods_to_db(&person.favorite_foods)?,
        ],
    )?;
    Ok(())
}

fn load_by_id(conn: &Connection, id: PersonId) -> RepoResult<Option<Person>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, favorite_foods
         FROM people
         WHERE id = ?1;",
    )?;

    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_person_row(row)?));
    }

    Ok(None)
}

fn push_filter(sql: &mut String, bind_values: &mut Vec<Value>, filter: &PersonFilter) {
    if let Some(name) = filter.name.as_ref() {
        sql.push_str(" AND name = ?");
        bind_values.push(Value::Text(name.clone()));
    }

    if let Some(food) = filter.favorite_food.as_ref() {
        sql.push_str(FOOD_MATCH_SQL);
        bind_values.push(Value::Text(food.clone()));
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("id")?;
    let id = parse_id(&id_text)?;

    let foods_text: String = row.get("favorite_foods")?;
    let favorite_foods: Vec<String> = serde_json::from_str(&foods_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid favorite_foods document `{foods_text}` for person {id}: {err}"
        ))
    })?;

    let person = Person {
        id,
        name: row.get("name")?,
        age: row.get("age")?,
        favorite_foods,
    };
    person
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("person {id}: {err}")))?;
    Ok(person)
}

fn parse_id(value: &str) -> RepoResult<PersonId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in people.id")))
}

fn foods_to_db(foods: &[String]) -> RepoResult<String> {
    serde_json::to_string(foods)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode favorite_foods: {err}")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "people")? {
        return Err(RepoError::MissingRequiredTable("people"));
    }

    for &column in PERSON_COLUMNS {
        if !table_has_column(conn, "people", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "people",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
