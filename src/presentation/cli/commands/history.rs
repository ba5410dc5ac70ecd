use colored::Colorize;

use crate::domain::entities::history::HistoryQuery;
use crate::domain::ports::store::HistoryStore;
use crate::presentation::cli::formatters::assessment_fmt::print_section_header;
use crate::presentation::cli::formatters::table_fmt::format_history_table;

/// Print recorded assessments matching `query`, newest first.
///
/// # Errors
///
/// Returns an error if the store query fails or JSON serialization fails.
pub fn run_history(store: &dyn HistoryStore, query: &HistoryQuery, json: bool) -> anyhow::Result<()> {
    let records = store
        .query(query)
        .map_err(|e| anyhow::anyhow!("failed to read history: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_section_header("📜 Assessment history");
    if records.is_empty() {
        println!("{}", "No assessments recorded yet".dimmed());
    } else {
        println!("{}", format_history_table(&records));
        println!("{}", format!("{} record(s)", records.len()).dimmed());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::history::HistoryRecord;
    use crate::domain::ports::store::StoreError;
    use crate::domain::value_objects::risk_level::RiskLevel;
    use crate::infrastructure::persistence::in_memory_store::InMemoryStore;
    use chrono::Utc;
    use colored::control;

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn append(&self, _record: &HistoryRecord) -> Result<HistoryRecord, StoreError> {
            Err(StoreError::WriteFailed("disk full".into()))
        }

        fn query(&self, _query: &HistoryQuery) -> Result<Vec<HistoryRecord>, StoreError> {
            Err(StoreError::ReadFailed("database is locked".into()))
        }
    }

    #[test]
    fn prints_table_and_json() {
        control::set_override(false);
        let store = InMemoryStore::new();
        store
            .append(&HistoryRecord {
                id: None,
                locality: "Lomé".into(),
                temperature_c: 27.0,
                humidity_percent: 90.0,
                precipitation_mm: 60.0,
                risk_level: RiskLevel::Critical,
                recorded_at: Utc::now(),
            })
            .expect("append");

        let query = HistoryQuery {
            limit: Some(50),
            ..HistoryQuery::default()
        };
        assert!(run_history(&store, &query, false).is_ok());
        assert!(run_history(&store, &query, true).is_ok());
        assert!(run_history(&InMemoryStore::new(), &query, false).is_ok());
    }

    #[test]
    fn store_failure_is_reported() {
        let err = run_history(&BrokenStore, &HistoryQuery::default(), false).expect_err("broken");
        assert!(err.to_string().contains("database is locked"));
    }
}
