//! Schema initialization.
//!
//! Runs once per opened store: tables from the old single-screen builds are
//! rebuilt into their current shape, then the embedded migrations bring the
//! file up to date. Both steps are no-ops on a current store.

use anyhow::{Context, Result, anyhow};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A table whose earlier layout lacked columns the store now relies on.
struct ReconciledTable {
    name: &'static str,
    columns: &'static [&'static str],
    definition: &'static str,
}

const RECONCILED_TABLES: &[ReconciledTable] = &[
    ReconciledTable {
        name: "exercises",
        columns: &["id", "name", "description", "muscle_group"],
        definition: "id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            name TEXT UNIQUE NOT NULL,
            description TEXT,
            muscle_group TEXT",
    },
    ReconciledTable {
        name: "workouts",
        columns: &["id", "user_id", "name", "created_at"],
        definition: "id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            user_id INTEGER,
            name TEXT,
            created_at INTEGER,
            FOREIGN KEY(user_id) REFERENCES users(id)",
    },
];

#[derive(QueryableByName)]
struct ColumnName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Brings the store's schema up to date. Safe to call on every start.
pub fn initialize(conn: &mut SqliteConnection) -> Result<()> {
    let rebuilt = reconcile_legacy_tables(conn).context("reconciling legacy tables")?;
    if !rebuilt.is_empty() {
        info!("Reconciled legacy tables: {}", rebuilt.join(", "));
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("running pending migrations: {e}"))?;
    if applied.is_empty() {
        debug!("Schema is up to date");
    }
    for version in applied {
        info!("Applied migration {}", version);
    }
    Ok(())
}

/// Names of the columns `table` currently has; empty when it does not exist.
pub fn table_columns(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>> {
    let rows = diesel::sql_query("SELECT name FROM pragma_table_info(?)")
        .bind::<Text, _>(table)
        .load::<ColumnName>(conn)
        .with_context(|| format!("reading columns of {}", table))?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

fn needs_rebuild(existing: &[String], table: &ReconciledTable) -> bool {
    !existing.is_empty()
        && table
            .columns
            .iter()
            .any(|column| !existing.iter().any(|c| c == column))
}

fn rebuild_statements(existing: &[String], table: &ReconciledTable) -> String {
    let staging = format!("{}_reconciled", table.name);
    let kept = table
        .columns
        .iter()
        .filter(|column| existing.iter().any(|c| c == *column))
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE {staging} ({definition});
         INSERT INTO {staging} ({kept}) SELECT {kept} FROM {name};
         DROP TABLE {name};
         ALTER TABLE {staging} RENAME TO {name};",
        staging = staging,
        definition = table.definition,
        kept = kept,
        name = table.name,
    )
}

/// Rebuilds every table still in its legacy layout. Returns the rebuilt names.
pub fn reconcile_legacy_tables(conn: &mut SqliteConnection) -> Result<Vec<&'static str>> {
    let mut pending = Vec::new();
    for table in RECONCILED_TABLES {
        let existing = table_columns(conn, table.name)?;
        if needs_rebuild(&existing, table) {
            debug!(
                "Table {} has legacy columns [{}]",
                table.name,
                existing.join(", ")
            );
            pending.push((table, existing));
        }
    }
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    // foreign_keys cannot change inside a transaction, and dropping a parent
    // table with enforcement on would fail on any referencing row.
    let enforced = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeys>(conn)
        .context("reading foreign key setting")?
        .foreign_keys
        != 0;
    if enforced {
        conn.batch_execute("PRAGMA foreign_keys = OFF")?;
    }

    let outcome = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        for (table, existing) in &pending {
            conn.batch_execute(&rebuild_statements(existing, table))
                .with_context(|| format!("rebuilding {}", table.name))?;
        }
        Ok(())
    });

    if enforced {
        conn.batch_execute("PRAGMA foreign_keys = ON")?;
    }
    outcome?;

    Ok(pending.into_iter().map(|(table, _)| table.name).collect())
}
