use rusqlite::Connection;

/// Initialize the database schema, creating tables if they don't exist.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS weather_history (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            recorded_at       TEXT    NOT NULL,
            locality          TEXT    NOT NULL,
            temperature_c     REAL    NOT NULL,
            humidity_percent  REAL    NOT NULL,
            precipitation_mm  REAL    NOT NULL,
            risk_level        TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS alerts (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at   TEXT    NOT NULL,
            zone         TEXT    NOT NULL,
            message      TEXT    NOT NULL,
            level        TEXT    NOT NULL,
            status       TEXT    NOT NULL DEFAULT 'active',
            origin       TEXT    NOT NULL,
            resolved_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS subscriptions (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at        TEXT    NOT NULL,
            email             TEXT,
            phone             TEXT,
            flood_alerts      INTEGER NOT NULL DEFAULT 1,
            weather_alerts    INTEGER NOT NULL DEFAULT 1,
            emergency_alerts  INTEGER NOT NULL DEFAULT 1,
            CHECK (email IS NOT NULL OR phone IS NOT NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_history_recorded_at ON weather_history(recorded_at);
        CREATE INDEX IF NOT EXISTS idx_history_locality ON weather_history(locality COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_alerts_created_at ON alerts(created_at);
        CREATE INDEX IF NOT EXISTS idx_alerts_zone_status ON alerts(zone COLLATE NOCASE, status);",
    )?;
    Ok(())
}
