use serde::{Deserialize, Serialize};

/// Form body of `POST /api/save-pomodoros`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub pomodoros: u32,
    pub year: i32,
    /// 1-indexed.
    pub month: u32,
}

/// Response of `POST /api/save-pomodoros`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Row id of the stored session, when the backend reports one.
    #[serde(default)]
    pub session_id: Option<i64>,
}

/// Aggregate statistics as served by `GET /api/stats`.
///
/// Doubles as the displayed snapshot: every load replaces it wholesale and
/// `Default` is the all-zero fallback shown after a failed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatsSnapshot {
    pub total_pomodoros: u64,
    pub total_sessions: u64,
    #[serde(default)]
    pub monthly_breakdown: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub total: u64,
}

/// Response of `GET /api/years`.
#[derive(Debug, Clone, Deserialize)]
pub struct YearsResponse {
    #[serde(default)]
    pub years: Vec<i32>,
}

/// FastAPI error body, used for log messages on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_without_breakdown_parses_as_empty() {
        let snap: StatsSnapshot =
            serde_json::from_str(r#"{"total_pomodoros": 4, "total_sessions": 2}"#).unwrap();
        assert_eq!(snap.total_pomodoros, 4);
        assert!(snap.monthly_breakdown.is_empty());
    }

    #[test]
    fn stats_ignores_echoed_filters() {
        let body = r#"{
            "total_pomodoros": 12,
            "total_sessions": 3,
            "monthly_breakdown": [{"month": 1, "total": 5}, {"month": 2, "total": 7}],
            "filters": {"year": null, "month": null}
        }"#;
        let snap: StatsSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(
            snap.monthly_breakdown,
            vec![
                MonthlyTotal { month: 1, total: 5 },
                MonthlyTotal { month: 2, total: 7 }
            ]
        );
    }

    #[test]
    fn save_response_with_session_id() {
        let resp: SaveResponse = serde_json::from_str(
            r#"{"success": true, "message": "Saved 3 pomodoros for 5/2025", "session_id": 9}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.session_id, Some(9));
    }

    #[test]
    fn save_failure_without_message() {
        let resp: SaveResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.message.is_empty());
    }
}
