use serde::Serialize;
use shared::domain::RequestStatus;

/// Process-wide activity record. Every setter overwrites; there is no history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppStatus {
    pub status: RequestStatus,
    pub error: Option<String>,
    pub is_initialized: bool,
    pub is_logged_in: bool,
}

impl AppStatus {
    pub fn set_global_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    pub fn set_global_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_logged_in(&mut self, is_logged_in: bool) {
        self.is_logged_in = is_logged_in;
    }

    pub fn mark_initialized(&mut self) {
        self.is_initialized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_wins() {
        let mut status = AppStatus::default();
        status.set_global_status(RequestStatus::Loading);
        status.set_global_error(Some("first".into()));
        status.set_global_error(Some("second".into()));
        status.set_global_status(RequestStatus::Failed);

        assert_eq!(status.status, RequestStatus::Failed);
        assert_eq!(status.error.as_deref(), Some("second"));
        assert!(!status.is_initialized);

        status.mark_initialized();
        status.set_global_error(None);
        assert!(status.is_initialized);
        assert!(status.error.is_none());
    }
}
