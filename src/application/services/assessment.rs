use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::entities::assessment::RiskAssessment;
use crate::domain::entities::history::HistoryRecord;
use crate::domain::entities::weather::{ForecastWindow, WeatherSnapshot};
use crate::domain::ports::store::{HistoryStore, StoreError};
use crate::domain::ports::weather_source::{WeatherError, WeatherSource};
use crate::domain::rules::RiskScorer;

/// Fetched weather and the assessment computed from it. Nothing persisted yet.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub snapshot: WeatherSnapshot,
    pub forecast: ForecastWindow,
    pub assessment: RiskAssessment,
}

/// Result of an on-demand assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub assessment: RiskAssessment,
    pub snapshot: WeatherSnapshot,
    /// The history entry; carries its store id when `persisted` is true
    pub record: HistoryRecord,
    /// False when the history store rejected the write. Retry with `persist`.
    pub persisted: bool,
}

/// Fetches weather for a locality, scores it, and records the result.
pub struct AssessmentService {
    weather: Arc<dyn WeatherSource>,
    scorer: Arc<RiskScorer>,
    history: Arc<dyn HistoryStore>,
    fetch_timeout: Duration,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        scorer: Arc<RiskScorer>,
        history: Arc<dyn HistoryStore>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            weather,
            scorer,
            history,
            fetch_timeout,
        }
    }

    /// Fetch current conditions and forecast concurrently, then score them.
    ///
    /// # Errors
    ///
    /// Returns the first `WeatherError` from either fetch. A fetch that
    /// exceeds the timeout fails with `WeatherError::ProviderUnavailable`.
    pub async fn evaluate(&self, locality: &str) -> Result<Evaluation, WeatherError> {
        let locality = locality.trim();
        if locality.is_empty() {
            return Err(WeatherError::LocalityNotFound(String::new()));
        }

        let timeout = self.fetch_timeout;
        let current = async {
            tokio::time::timeout(timeout, self.weather.fetch_current(locality))
                .await
                .map_err(|_| timed_out("current conditions", timeout))?
        };
        let forecast = async {
            tokio::time::timeout(timeout, self.weather.fetch_forecast(locality))
                .await
                .map_err(|_| timed_out("forecast", timeout))?
        };
        let (snapshot, forecast) = tokio::try_join!(current, forecast)?;

        let mut assessment = self.scorer.score(Some(&snapshot), Some(&forecast));
        assessment.locality = locality.to_string();

        tracing::debug!(
            locality,
            level = %assessment.level,
            score = assessment.score,
            provider = self.weather.name(),
            "locality evaluated"
        );

        Ok(Evaluation {
            snapshot,
            forecast,
            assessment,
        })
    }

    /// Evaluate a locality and append the outcome to history.
    ///
    /// A failed history write does not fail the assessment: the outcome is
    /// returned with `persisted = false` so the caller can retry with
    /// [`AssessmentService::persist`].
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` if the weather could not be fetched. Nothing
    /// is written in that case.
    pub async fn assess(&self, locality: &str) -> Result<AssessmentOutcome, WeatherError> {
        let evaluation = self.evaluate(locality).await?;
        let (record, persisted) = self.record(&evaluation);

        Ok(AssessmentOutcome {
            assessment: evaluation.assessment,
            snapshot: evaluation.snapshot,
            record,
            persisted,
        })
    }

    /// Append an evaluation to history, logging instead of failing on store errors.
    #[must_use]
    pub fn record(&self, evaluation: &Evaluation) -> (HistoryRecord, bool) {
        let record = HistoryRecord::from_assessment(&evaluation.snapshot, &evaluation.assessment);
        match self.persist(&record) {
            Ok(saved) => (saved, true),
            Err(e) => {
                tracing::warn!(locality = %record.locality, "Failed to save history record: {e}");
                (record, false)
            }
        }
    }

    /// Write a history record, e.g. to retry an unpersisted assessment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the history store rejects the write.
    pub fn persist(&self, record: &HistoryRecord) -> Result<HistoryRecord, StoreError> {
        self.history.append(record)
    }

    /// Most recent history entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the history store cannot be read.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        self.history.recent(limit)
    }
}

fn timed_out(what: &str, timeout: Duration) -> WeatherError {
    WeatherError::ProviderUnavailable(format!(
        "{what} request timed out after {}s",
        timeout.as_secs_f32()
    ))
}
