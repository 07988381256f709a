use crate::progress::{self, ProgressSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Fetching,
    Completed,
    Failed,
}

/// State of a single in-flight download. One session covers exactly one
/// resource URL and is never reused; a second download gets a fresh session.
#[derive(Debug)]
pub struct DownloadSession {
    resource_url: String,
    total_bytes: Option<u64>,
    received_bytes: u64,
    status: SessionStatus,
}

impl DownloadSession {
    pub fn new(resource_url: impl Into<String>) -> Self {
        Self {
            resource_url: resource_url.into(),
            total_bytes: None,
            received_bytes: 0,
            status: SessionStatus::Idle,
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    pub fn received_bytes(&self) -> u64 {
        self.received_bytes
    }

    /// Transition Idle -> Fetching, recording the declared total size if the
    /// response carried one.
    pub fn begin(&mut self, total_bytes: Option<u64>) {
        debug_assert_eq!(self.status, SessionStatus::Idle, "session reused");
        self.total_bytes = total_bytes;
        self.status = SessionStatus::Fetching;
    }

    pub fn record_chunk(&mut self, len: usize) {
        debug_assert_eq!(self.status, SessionStatus::Fetching);
        self.received_bytes += len as u64;
    }

    pub fn complete(&mut self) {
        debug_assert_eq!(self.status, SessionStatus::Fetching);
        self.status = SessionStatus::Completed;
    }

    pub fn fail(&mut self) {
        debug_assert_ne!(self.status, SessionStatus::Completed);
        self.status = SessionStatus::Failed;
    }

    pub fn sample(&self) -> ProgressSample {
        progress::sample(self.received_bytes, self.total_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_bytes_tracks_chunk_sums() {
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        session.begin(Some(1000));
        session.record_chunk(400);
        assert_eq!(session.received_bytes(), 400);
        session.record_chunk(600);
        assert_eq!(session.received_bytes(), 1000);
    }

    #[test]
    fn completes_after_fetching() {
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        assert_eq!(session.status, SessionStatus::Idle);
        session.begin(Some(10));
        assert_eq!(session.status, SessionStatus::Fetching);
        session.complete();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[test]
    fn fails_before_fetching_starts() {
        // A rejected request (e.g. 404 on open) fails the session while it
        // is still idle.
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        session.fail();
        assert_eq!(session.status, SessionStatus::Failed);
        assert_eq!(session.received_bytes(), 0);
    }

    #[test]
    fn fails_mid_fetch() {
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        session.begin(None);
        session.record_chunk(128);
        session.fail();
        assert_eq!(session.status, SessionStatus::Failed);
    }

    #[test]
    fn sample_reflects_declared_total() {
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        session.begin(Some(200));
        session.record_chunk(50);
        assert_eq!(session.sample(), ProgressSample::Percent(25.0));
    }

    #[test]
    fn sample_is_indeterminate_without_total() {
        let mut session = DownloadSession::new("https://example.com/a.mp4");
        session.begin(None);
        session.record_chunk(50);
        assert_eq!(session.sample(), ProgressSample::Indeterminate);
    }
}
