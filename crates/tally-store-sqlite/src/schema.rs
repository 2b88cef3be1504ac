//! SQL schema for the tally SQLite store.
//!
//! Applied by [`SqliteStore::ensure_schema`](crate::SqliteStore::ensure_schema)
//! once at process startup. There are no migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- Responses are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS satisfaction_responses (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    sector                TEXT    NOT NULL,
    material_missing      INTEGER NOT NULL,  -- 0 | 1
    missing_material_name TEXT,
    service_quality       TEXT    NOT NULL,
    message               TEXT,
    recorded_at           TEXT    NOT NULL   -- RFC 3339 UTC, microseconds; server-assigned
);
";
