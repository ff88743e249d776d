//! Walkthrough entry point.
//!
//! # Responsibility
//! - Resolve the store from `PEOPLE_DB_URI` and run every person use-case
//!   once, printing each result as JSON.
//! - Exit non-zero on the first failing step.

use log::info;
use people_core::db::open_db_from_config;
use people_core::logging::init_logging_from_config;
use people_core::{sample_people, NewPerson, PersonService, SqlitePersonRepository, StoreConfig};
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::from_env()?;
    init_logging_from_config(&config)?;
    info!(
        "event=walkthrough module=cli status=start version={}",
        people_core::core_version()
    );

    let conn = open_db_from_config(&config)?;
    let service = PersonService::new(SqlitePersonRepository::try_new(&conn)?);

    let justin = service.create_and_save_person()?;
    print_step("createAndSavePerson", &justin)?;

    let created = service.create_many_people(&sample_people())?;
    print_step("createManyPeople", &created)?;

    print_step("findPeopleByName", &service.find_people_by_name("Gina")?)?;
    print_step("findOneByFood", &service.find_one_by_food("eggs")?)?;
    print_step("findPersonById", &service.find_person_by_id(justin.id)?)?;
    print_step("findEditThenSave", &service.find_edit_then_save(justin.id)?)?;
    print_step("findAndUpdate", &service.find_and_update("Kendra")?)?;

    service.create_many_people(&[
        NewPerson::new("Mary", Some(31), ["burrito", "tacos"]),
        NewPerson::new("Ann", Some(22), ["burrito"]),
        NewPerson::new("Zoe", None, ["burrito", "salad"]),
    ])?;
    print_step("queryChain", &service.query_chain()?)?;

    if let Some(patrick) = created.iter().find(|person| person.name == "Patrick") {
        print_step("removeById", &service.remove_by_id(patrick.id)?)?;
    }
    let removed = service.remove_many_people()?;
    print_step("removeManyPeople", &removed.deleted_count)?;

    info!("event=walkthrough module=cli status=ok");
    Ok(())
}

fn print_step<T: Serialize>(step: &str, value: &T) -> Result<(), serde_json::Error> {
    println!("{step}: {}", serde_json::to_string_pretty(value)?);
    Ok(())
}
