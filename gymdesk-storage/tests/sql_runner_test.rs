mod common;

use std::io::Write;

use common::TestDb;
use gymdesk_storage::{sql_runner::SqlRunner, StorageError};

fn sql_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".sql").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_sql_file_commits_all_statements() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    let runner = SqlRunner::new(test_db.db.clone());

    let file = sql_file(
        "CREATE TABLE scratch (id SERIAL PRIMARY KEY, label TEXT NOT NULL);\n\
         INSERT INTO scratch (label) VALUES ('a'), ('b');",
    );
    let report = runner.run_file(file.path()).await.unwrap();
    assert_eq!(report.path, file.path());

    assert_eq!(test_db.scalar("SELECT COUNT(*) AS value FROM scratch").await, 2);
    test_db.drop_schema().await;
}

#[tokio::test]
async fn test_failing_statement_rolls_back_file() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    test_db
        .execute("CREATE TABLE scratch (id SERIAL PRIMARY KEY, label TEXT NOT NULL)")
        .await;
    let runner = SqlRunner::new(test_db.db.clone());

    let file = sql_file(
        "INSERT INTO scratch (label) VALUES ('kept?');\n\
         INSERT INTO scratch (label) VALUES (NULL);",
    );
    assert!(runner.run_file(file.path()).await.is_err());
    assert_eq!(test_db.scalar("SELECT COUNT(*) AS value FROM scratch").await, 0);

    test_db.drop_schema().await;
}

#[tokio::test]
async fn test_missing_or_empty_file_is_an_error() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    let runner = SqlRunner::new(test_db.db.clone());

    let missing = runner.run_file("/nonexistent/gymdesk/fix.sql").await.unwrap_err();
    assert!(matches!(missing, StorageError::Io(_)));

    let empty = sql_file("   \n");
    assert!(runner.run_file(empty.path()).await.is_err());

    test_db.drop_schema().await;
}
