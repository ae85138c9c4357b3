//! Bate-ponto session tracking.
//!
//! One live session per user, held only in process memory. Pausing is
//! one-directional at this level; the attendance button layers toggle
//! behavior on top by checking the current state first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
}

/// An open attendance session. Closed sessions are removed from the live
/// set, never retained.
#[derive(Debug, Clone)]
pub struct Session {
    pub owner: u64,
    pub started_at: DateTime<Utc>,
    pub pause_count: u32,
    pub paused_accumulated_ms: i64,
    /// Present only while paused.
    pub current_pause_started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn state(&self) -> SessionState {
        if self.current_pause_started_at.is_some() {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }

    /// Service time accrued so far, excluding pauses. Clamped at zero.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        let mut paused = self.paused_accumulated_ms;
        if let Some(pause_start) = self.current_pause_started_at {
            paused += (now - pause_start).num_milliseconds();
        }
        ((now - self.started_at).num_milliseconds() - paused).max(0)
    }
}

/// Result of closing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub pause_count: u32,
    pub paused_ms: i64,
    pub elapsed_ms: i64,
}

/// Live sessions keyed by user id.
#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: HashMap<u64, Session>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: u64) -> Option<&Session> {
        self.sessions.get(&user)
    }

    /// Open a session for `user`, failing if one is already live.
    pub fn start(&mut self, user: u64, now: DateTime<Utc>) -> Result<&Session, Error> {
        if self.sessions.contains_key(&user) {
            return Err(Error::AlreadyActive);
        }
        let session = Session {
            owner: user,
            started_at: now,
            pause_count: 0,
            paused_accumulated_ms: 0,
            current_pause_started_at: None,
        };
        Ok(self.sessions.entry(user).or_insert(session))
    }

    /// Mark the session paused, recording when the pause began.
    pub fn pause(&mut self, user: u64, now: DateTime<Utc>) -> Result<&Session, Error> {
        let session = self.sessions.get_mut(&user).ok_or(Error::NoActiveSession)?;
        if session.current_pause_started_at.is_some() {
            return Err(Error::AlreadyPaused);
        }
        session.current_pause_started_at = Some(now);
        session.pause_count += 1;
        Ok(session)
    }

    /// Fold the open pause interval into the accumulated total and run again.
    pub fn resume(&mut self, user: u64, now: DateTime<Utc>) -> Result<&Session, Error> {
        let session = self.sessions.get_mut(&user).ok_or(Error::NoActiveSession)?;
        let pause_start = session.current_pause_started_at.take().ok_or(Error::NotPaused)?;
        session.paused_accumulated_ms += (now - pause_start).num_milliseconds().max(0);
        Ok(session)
    }

    /// Close the session and report what it accrued. A session stopped while
    /// paused has the open pause folded in first.
    pub fn stop(&mut self, user: u64, now: DateTime<Utc>) -> Result<SessionSummary, Error> {
        let mut session = self.sessions.remove(&user).ok_or(Error::NoActiveSession)?;
        if let Some(pause_start) = session.current_pause_started_at.take() {
            session.paused_accumulated_ms += (now - pause_start).num_milliseconds().max(0);
        }
        let elapsed_ms = ((now - session.started_at).num_milliseconds()
            - session.paused_accumulated_ms)
            .max(0);
        Ok(SessionSummary {
            started_at: session.started_at,
            stopped_at: now,
            pause_count: session.pause_count,
            paused_ms: session.paused_accumulated_ms,
            elapsed_ms,
        })
    }
}

/// Render a millisecond duration as `"{h}h {m}min"`, or `"{m}min"` when under
/// an hour. Negative inputs render as zero.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn stop_without_start_fails_and_mutates_nothing() {
        let mut tracker = SessionTracker::new();
        assert!(matches!(tracker.stop(1, at(0)), Err(Error::NoActiveSession)));
        assert!(tracker.get(1).is_none());
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut tracker = SessionTracker::new();
        tracker.start(1, at(0)).unwrap();
        assert!(matches!(tracker.start(1, at(10)), Err(Error::AlreadyActive)));
        // The first session is untouched.
        assert_eq!(tracker.get(1).unwrap().started_at, at(0));
    }

    #[test]
    fn plain_start_stop_elapsed_is_exact() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(1_000)).unwrap();
        let summary = tracker.stop(7, at(601_000)).unwrap();
        assert_eq!(summary.elapsed_ms, 600_000);
        assert_eq!(summary.pause_count, 0);
        assert_eq!(summary.paused_ms, 0);
        assert!(tracker.get(7).is_none());
    }

    #[test]
    fn single_pause_is_subtracted() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(0)).unwrap();
        tracker.pause(7, at(100_000)).unwrap();
        tracker.resume(7, at(160_000)).unwrap();
        let summary = tracker.stop(7, at(300_000)).unwrap();
        assert_eq!(summary.paused_ms, 60_000);
        assert_eq!(summary.elapsed_ms, 240_000);
        assert_eq!(summary.pause_count, 1);
    }

    #[test]
    fn stop_while_paused_folds_open_pause() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(0)).unwrap();
        tracker.pause(7, at(120_000)).unwrap();
        let summary = tracker.stop(7, at(180_000)).unwrap();
        assert_eq!(summary.paused_ms, 60_000);
        assert_eq!(summary.elapsed_ms, 120_000);
    }

    #[test]
    fn pause_while_paused_is_rejected() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(0)).unwrap();
        tracker.pause(7, at(10)).unwrap();
        assert!(matches!(tracker.pause(7, at(20)), Err(Error::AlreadyPaused)));
        assert_eq!(tracker.get(7).unwrap().pause_count, 1);
    }

    #[test]
    fn resume_while_running_is_rejected() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(0)).unwrap();
        assert!(matches!(tracker.resume(7, at(10)), Err(Error::NotPaused)));
    }

    #[test]
    fn elapsed_while_paused_excludes_open_pause() {
        let mut tracker = SessionTracker::new();
        tracker.start(7, at(0)).unwrap();
        tracker.pause(7, at(60_000)).unwrap();
        let session = tracker.get(7).unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.elapsed_ms(at(90_000)), 60_000);
    }

    #[test]
    fn sessions_are_independent_per_user() {
        let mut tracker = SessionTracker::new();
        tracker.start(1, at(0)).unwrap();
        tracker.start(2, at(50)).unwrap();
        tracker.stop(1, at(100)).unwrap();
        assert!(tracker.get(1).is_none());
        assert!(tracker.get(2).is_some());
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0min");
        assert_eq!(format_duration(59_999), "0min");
        assert_eq!(format_duration(60_000), "1min");
        assert_eq!(format_duration(3_660_000), "1h 1min");
        assert_eq!(format_duration(-5), "0min");
    }
}
