use roster_core::db::open_db_in_memory;
use roster_core::db::schema::SCHEMA_VERSION;
use roster_core::{
    Employee, EmployeeInput, EmployeeRepository, EmployeeService, RepoError, ServiceError,
    SqliteEmployeeRepository, UNSET_EMPLOYEE_ID,
};
use rusqlite::Connection;

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_employee(&Employee::new("Bedirhan Saglam", "bedirhansaglan270@gmail.com"))
        .unwrap();
    assert_ne!(id, UNSET_EMPLOYEE_ID);

    let loaded = repo.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, "Bedirhan Saglam");
    assert_eq!(loaded.email, "bedirhansaglan270@gmail.com");
}

#[test]
fn insert_rejects_record_with_assigned_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let err = repo
        .insert_employee(&Employee::with_id(7, "A", "a@x.com"))
        .unwrap_err();
    assert!(matches!(err, RepoError::IdAlreadyAssigned(7)));
    assert!(repo.list_employees().unwrap().is_empty());
}

#[test]
fn list_returns_rows_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    for name in ["Ann", "Bob", "Cem"] {
        repo.insert_employee(&Employee::new(name, format!("{name}@x.com")))
            .unwrap();
    }

    let names = repo
        .list_employees()
        .unwrap()
        .into_iter()
        .map(|employee| employee.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Ann", "Bob", "Cem"]);
}

#[test]
fn update_replaces_name_and_email_only_for_matching_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let first = repo.insert_employee(&Employee::new("A", "a@x.com")).unwrap();
    let second = repo.insert_employee(&Employee::new("B", "b@x.com")).unwrap();

    assert!(repo
        .update_employee(&Employee::with_id(first, "A2", "a2@x.com"))
        .unwrap());

    assert_eq!(
        repo.get_employee(first).unwrap().unwrap(),
        Employee::with_id(first, "A2", "a2@x.com")
    );
    assert_eq!(
        repo.get_employee(second).unwrap().unwrap(),
        Employee::with_id(second, "B", "b@x.com")
    );
}

#[test]
fn update_and_delete_of_missing_id_change_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let id = repo.insert_employee(&Employee::new("A", "a@x.com")).unwrap();

    assert!(!repo
        .update_employee(&Employee::with_id(id + 100, "Ghost", "g@x.com"))
        .unwrap());
    assert!(!repo.delete_employee(&Employee::key(id + 100)).unwrap());
    assert_eq!(repo.list_employees().unwrap().len(), 1);
}

#[test]
fn delete_matches_on_id_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let id = repo.insert_employee(&Employee::new("A", "a@x.com")).unwrap();

    let stale = Employee::with_id(id, "different", "different@x.com");
    assert!(repo.delete_employee(&stale).unwrap());
    assert!(repo.get_employee(id).unwrap().is_none());
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let first = repo.insert_employee(&Employee::new("A", "a@x.com")).unwrap();
    assert!(repo.delete_employee(&Employee::key(first)).unwrap());
    let second = repo.insert_employee(&Employee::new("B", "b@x.com")).unwrap();

    assert!(second > first);
}

#[test]
fn repository_rejects_unversioned_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version: 0,
        })
    ));
}

#[test]
fn repository_rejects_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("employees"))));
}

#[test]
fn repository_rejects_missing_email_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE employees (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
         PRAGMA user_version = {SCHEMA_VERSION};"
    ))
    .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: "email_id",
        })
    ));
}

#[test]
fn service_rejects_blank_fields_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let service = EmployeeService::new(repo);

    let err = service
        .add_employee(EmployeeInput::new("", "x@y.com"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    let err = service
        .add_employee(EmployeeInput::new("Name", ""))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    assert!(service.list_employees().unwrap().is_empty());
}

#[test]
fn service_accepts_whitespace_and_unvalidated_email() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let service = EmployeeService::new(repo);

    let id = service
        .add_employee(EmployeeInput::new(" ", "not-an-email"))
        .unwrap();
    let loaded = service.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.name, " ");
    assert_eq!(loaded.email, "not-an-email");
}
