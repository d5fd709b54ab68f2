//! PostgreSQL connection verification utility.
//!
//! Connects using the same environment-driven settings as the server,
//! reports server time, version, encoding, and visible tables, and on
//! failure classifies the common causes (service not running, bad
//! credentials, missing database, unresolvable host) with actionable
//! guidance.
//!
//! Run with `cargo run --bin verify-db`.

use std::io::ErrorKind;
use std::process::ExitCode;

use backend::server::DatabaseSettings;
use mockable::DefaultEnv;
use postgres::error::SqlState;
use postgres::{Client, NoTls};

struct Report {
    now: String,
    version: String,
    encoding: String,
    tables: Vec<String>,
}

fn main() -> ExitCode {
    let settings = DatabaseSettings::from_env(&DefaultEnv::new());

    println!("Connecting to PostgreSQL...");
    println!("  host:     {}", settings.host);
    println!("  port:     {}", settings.port);
    println!("  user:     {}", settings.username);
    println!("  database: {}", settings.database);
    println!();

    match verify(&settings) {
        Ok(report) => {
            println!("Connection OK");
            println!("  server time: {}", report.now);
            println!("  version:     {}", report.version);
            println!("  encoding:    {}", report.encoding);
            if report.tables.is_empty() {
                println!("  no tables yet; run the backend once to apply migrations");
            } else {
                println!("  tables:");
                for table in &report.tables {
                    println!("    - {table}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Connection FAILED: {error}");
            if let Some(hint) = guidance(&error) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn verify(settings: &DatabaseSettings) -> Result<Report, postgres::Error> {
    let mut client = Client::connect(settings.url().as_str(), NoTls)?;

    let facts = client.query_one("SELECT now()::text, version()", &[])?;
    let now: String = facts.get(0);
    let version: String = facts.get(1);

    let encoding_row = client.query_one(
        "SELECT pg_encoding_to_char(encoding) FROM pg_database \
         WHERE datname = current_database()",
        &[],
    )?;
    let encoding: String = encoding_row.get(0);

    let tables = client
        .query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
            &[],
        )?
        .iter()
        .map(|row| row.get(0))
        .collect();

    client.close()?;
    Ok(Report {
        now,
        version,
        encoding,
        tables,
    })
}

fn guidance(error: &postgres::Error) -> Option<&'static str> {
    classify(error.code(), io_kind(error), &error.to_string())
}

/// Walk the source chain looking for an underlying I/O error.
fn io_kind(error: &postgres::Error) -> Option<ErrorKind> {
    let mut source = std::error::Error::source(error);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = current.source();
    }
    None
}

fn classify(
    code: Option<&SqlState>,
    io_kind: Option<ErrorKind>,
    message: &str,
) -> Option<&'static str> {
    if let Some(code) = code {
        if *code == SqlState::INVALID_PASSWORD
            || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
        {
            return Some(
                "the server rejected the credentials; check DB_USERNAME and DB_PASSWORD",
            );
        }
        if *code == SqlState::INVALID_CATALOG_NAME {
            return Some(
                "the database does not exist; create it (CREATE DATABASE what_to_eat) or adjust DB_DATABASE",
            );
        }
    }

    match io_kind {
        Some(ErrorKind::ConnectionRefused) => {
            return Some(
                "PostgreSQL refused the connection; check that the service is running on DB_HOST:DB_PORT",
            );
        }
        Some(ErrorKind::TimedOut) => {
            return Some("the connection timed out; check DB_HOST and any firewalls in between");
        }
        _ => {}
    }

    if message.contains("resolve") || message.contains("lookup") {
        return Some("the database host could not be resolved; check DB_HOST");
    }

    None
}
