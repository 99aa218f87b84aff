//! End-to-end runs of the membuf-estimate binary.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn schema_file(sql: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(sql.as_bytes()).unwrap();
    file
}

fn membuf_estimate(schema: &NamedTempFile, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_membuf-estimate"))
        .arg("--schema")
        .arg(schema.path())
        .args(["--settle-ms", "0", "--rss-source", "none"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_insert_report() {
    let schema = schema_file("CREATE TABLE t (id BIGINT UNSIGNED)");
    let output = membuf_estimate(&schema, &["--rows", "1000", "--sample", "100"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.starts_with("sample 10 lines cost"));
    assert!(text.contains("\ninsert 1000 rows with 10 rows sampled\n"));
    assert!(text.contains("\ninsert-gc 1000 rows with 10 rows sampled\n"));
    // 10 records of 31 bytes, projected to 1000 rows
    assert!(text.contains("membuffer: 310.00B\n"));
    assert!(text.contains("membuffer: 30.27KB\n"));
    assert!(text.contains("insert 1000 rows with memory cost: 30.27KB(31000 bytes)\n"));
    assert!(text.ends_with("====== END ======\n"));
}

#[test]
fn test_update_with_drop_value() {
    let schema = schema_file(
        "CREATE TABLE sbtest1 (
            id INT NOT NULL,
            k INT NOT NULL DEFAULT '0',
            c CHAR(120) NOT NULL DEFAULT '',
            pad CHAR(60) NOT NULL DEFAULT '',
            PRIMARY KEY (id),
            KEY k_1 (k)
        )",
    );
    let output = membuf_estimate(
        &schema,
        &["--rows", "10000", "--sample", "100", "--mode", "update", "--drop-value"],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("\nupdate 10000 rows with 100 rows sampled\n"));
    assert!(text.contains("\ndrop-value over"));
    assert!(text.contains("values: 0.00B\n"));
    assert!(text.ends_with("====== END ======\n"));
}

#[test]
fn test_drop_flags_conflict() {
    let schema = schema_file("CREATE TABLE t (id BIGINT)");
    let output = membuf_estimate(&schema, &["--drop-key", "--drop-value"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_empty_sample_is_usage_error() {
    let schema = schema_file("CREATE TABLE t (id BIGINT)");

    let output = membuf_estimate(&schema, &["--rows", "10", "--sample", "100"]);
    assert_eq!(output.status.code(), Some(2));

    let output = membuf_estimate(&schema, &["--sample", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_schema_errors() {
    let two_tables = schema_file("CREATE TABLE a (id INT); CREATE TABLE b (id INT);");
    let output = membuf_estimate(&two_tables, &[]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unexpected count of SQL statements 2"));

    let select = schema_file("SELECT 1");
    assert_eq!(membuf_estimate(&select, &[]).status.code(), Some(3));
}

#[test]
fn test_missing_schema_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_membuf-estimate"))
        .args(["--schema", "/nonexistent/membuf/schema.sql", "--settle-ms", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unsupported_column_is_generator_error() {
    let schema = schema_file("CREATE TABLE t (id BIGINT, doc JSON)");
    let output = membuf_estimate(&schema, &["--rows", "1000", "--sample", "100"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_txn_limit_is_storage_error() {
    let schema = schema_file("CREATE TABLE t (id BIGINT UNSIGNED, c CHAR(100))");
    let output = membuf_estimate(
        &schema,
        &["--rows", "1000", "--sample", "10", "--txn-size-limit", "1024"],
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_entry_limit_is_storage_error() {
    let schema = schema_file("CREATE TABLE t (id BIGINT UNSIGNED)");
    let output = membuf_estimate(
        &schema,
        &["--rows", "1000", "--sample", "100", "--entry-size-limit", "16"],
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Entry too large: 31 bytes"));
}
