use anyhow::Result;

use crate::api::{self, ApiError, BackendClient, SaveRequest, SaveResponse};
use crate::clock::Clock;

const REJECTED_NOTICE: &str = "Failed to save session.";
const FAILED_NOTICE: &str = "Error saving session.";

/// What the user is told once a save has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveNotice {
    /// Backend stored the count; carries its confirmation message.
    Saved(String),
    /// Backend answered but declined (`success: false`).
    Rejected,
    /// The request never produced a usable answer.
    Failed,
}

impl SaveNotice {
    pub fn text(&self) -> &str {
        match self {
            SaveNotice::Saved(message) => message,
            SaveNotice::Rejected => REJECTED_NOTICE,
            SaveNotice::Failed => FAILED_NOTICE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SaveNotice::Saved(_))
    }

    /// Stats on screen are stale after a successful save.
    pub fn refresh_stats(&self) -> bool {
        self.is_success()
    }
}

/// Counts completed pomodoros and hands them to the backend on request.
///
/// The count survives every failed save. A confirmed save only removes the
/// batch that was sent, so completions that land mid-flight stay counted.
#[derive(Debug, Default)]
pub struct SessionReporter {
    completed: u32,
    /// Size of the batch currently being saved.
    in_flight: Option<u32>,
}

impl SessionReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_count(&self) -> u32 {
        self.completed
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the save trigger is currently offered. Off while there is
    /// nothing to send and while a save is in flight.
    pub fn can_save(&self) -> bool {
        self.in_flight.is_none() && self.completed > 0
    }

    pub fn on_completion(&mut self) {
        self.completed = self.completed.saturating_add(1);
        tracing::info!(count = self.completed, "completed pomodoro counted");
    }

    /// Claim the save trigger and build the request.
    ///
    /// Returns `None` while the trigger is disabled, so an empty batch is
    /// never sent. Unset targets default to the clock's current year and
    /// month.
    pub fn begin_save(
        &mut self,
        target_year: Option<i32>,
        target_month: Option<u32>,
        clock: &impl Clock,
    ) -> Option<SaveRequest> {
        if !self.can_save() {
            return None;
        }
        self.in_flight = Some(self.completed);

        let request = SaveRequest {
            pomodoros: self.completed,
            year: target_year.unwrap_or_else(|| clock.current_year()),
            month: target_month.unwrap_or_else(|| clock.current_month()),
        };
        tracing::info!(
            pomodoros = request.pomodoros,
            year = request.year,
            month = request.month,
            "saving pomodoros"
        );
        Some(request)
    }

    /// Settle the in-flight save. Re-enables the trigger whatever happened;
    /// after a success it stays off until there is something new to send.
    pub fn finish_save(&mut self, result: Result<SaveResponse, ApiError>) -> SaveNotice {
        let sent = self.in_flight.take().unwrap_or(0);

        match result {
            Ok(response) if response.success => {
                tracing::info!(
                    message = %response.message,
                    session_id = ?response.session_id,
                    "save confirmed"
                );
                self.completed = self.completed.saturating_sub(sent);
                SaveNotice::Saved(response.message)
            }
            Ok(response) => {
                tracing::warn!(message = %response.message, "backend declined save");
                SaveNotice::Rejected
            }
            Err(e) => {
                tracing::warn!(error = %e, "save request failed");
                SaveNotice::Failed
            }
        }
    }
}

/// Post a count directly, outside any interactive session.
pub fn save_blocking(client: &BackendClient, request: &SaveRequest) -> Result<SaveNotice> {
    let rt = api::runtime()?;
    let result = rt.block_on(client.save_pomodoros(request));

    // One-shot reporter so the CLI goes through the same outcome rules.
    let mut reporter = SessionReporter {
        completed: request.pomodoros,
        in_flight: Some(request.pomodoros),
    };
    Ok(reporter.finish_save(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())
    }

    fn ok(success: bool, message: &str) -> Result<SaveResponse, ApiError> {
        Ok(SaveResponse {
            success,
            message: message.into(),
            session_id: None,
        })
    }

    fn transport_failure() -> Result<SaveResponse, ApiError> {
        Err(ApiError::Parse {
            url: "http://localhost/api/save-pomodoros".into(),
            source: serde_json::from_str::<serde_json::Value>("nope").unwrap_err(),
        })
    }

    fn reporter_with(count: u32) -> SessionReporter {
        let mut r = SessionReporter::new();
        for _ in 0..count {
            r.on_completion();
        }
        r
    }

    #[test]
    fn save_disabled_before_first_completion() {
        let mut r = SessionReporter::new();
        assert!(!r.can_save());
        assert!(r.begin_save(None, None, &clock()).is_none());
    }

    #[test]
    fn completion_increments_and_enables_save() {
        let r = reporter_with(2);
        assert_eq!(r.completed_count(), 2);
        assert!(r.can_save());
    }

    #[test]
    fn begin_save_defaults_to_clock_date() {
        let mut r = reporter_with(3);
        let req = r.begin_save(None, None, &clock()).unwrap();
        assert_eq!(
            req,
            SaveRequest {
                pomodoros: 3,
                year: 2025,
                month: 6
            }
        );
    }

    #[test]
    fn begin_save_uses_explicit_targets() {
        let mut r = reporter_with(1);
        let req = r.begin_save(Some(2023), Some(11), &clock()).unwrap();
        assert_eq!(req.year, 2023);
        assert_eq!(req.month, 11);
    }

    #[test]
    fn second_save_while_in_flight_is_refused() {
        let mut r = reporter_with(1);
        assert!(r.begin_save(None, None, &clock()).is_some());
        assert!(r.is_saving());
        assert!(!r.can_save());
        assert!(r.begin_save(None, None, &clock()).is_none());
    }

    #[test]
    fn successful_save_resets_count_and_requests_refresh() {
        let mut r = reporter_with(4);
        r.begin_save(None, None, &clock()).unwrap();
        let notice = r.finish_save(ok(true, "Saved"));
        assert_eq!(notice, SaveNotice::Saved("Saved".into()));
        assert_eq!(notice.text(), "Saved");
        assert!(notice.refresh_stats());
        assert_eq!(r.completed_count(), 0);
        assert!(!r.is_saving());
    }

    #[test]
    fn nothing_to_save_after_successful_save() {
        let mut r = reporter_with(1);
        r.begin_save(None, None, &clock()).unwrap();
        r.finish_save(ok(true, "Saved"));
        assert!(!r.can_save());
        assert!(r.begin_save(None, None, &clock()).is_none());

        r.on_completion();
        let req = r.begin_save(None, None, &clock()).unwrap();
        assert_eq!(req.pomodoros, 1);
    }

    #[test]
    fn completions_during_save_survive_success() {
        let mut r = reporter_with(1);
        let req = r.begin_save(None, None, &clock()).unwrap();
        assert_eq!(req.pomodoros, 1);
        r.on_completion();
        r.finish_save(ok(true, "Saved"));
        assert_eq!(r.completed_count(), 1);
        assert!(r.can_save());
    }

    #[test]
    fn rejected_save_keeps_count() {
        let mut r = reporter_with(2);
        r.begin_save(None, None, &clock()).unwrap();
        let notice = r.finish_save(ok(false, ""));
        assert_eq!(notice, SaveNotice::Rejected);
        assert_eq!(notice.text(), "Failed to save session.");
        assert!(!notice.refresh_stats());
        assert_eq!(r.completed_count(), 2);
        assert!(r.can_save());
    }

    #[test]
    fn transport_failure_keeps_count_and_reenables() {
        let mut r = reporter_with(5);
        r.begin_save(None, None, &clock()).unwrap();
        let notice = r.finish_save(transport_failure());
        assert_eq!(notice, SaveNotice::Failed);
        assert_eq!(notice.text(), "Error saving session.");
        assert_eq!(r.completed_count(), 5);
        assert!(!r.is_saving());
        assert!(r.can_save());
    }

    #[test]
    fn completions_during_save_survive_failure() {
        let mut r = reporter_with(1);
        r.begin_save(None, None, &clock()).unwrap();
        r.on_completion();
        r.finish_save(transport_failure());
        assert_eq!(r.completed_count(), 2);
    }
}
