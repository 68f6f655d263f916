//! Session lifecycle tracking for one attached process.
//!
//! The tracker owns the login phase and the downstream-emission gate.
//! Scan sub-states are reported outward but never gate message
//! processing; only `Ready` lets normalized messages flow out.

use tracing::warn;
use wxpuppet_types::{Contact, ScanStatus, SessionPhase};

#[derive(Debug, Default)]
pub struct SessionTracker {
    phase: SessionPhase,
    agent_ready: bool,
    self_contact: Option<Contact>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the target process attached.
    pub fn attach(&mut self) {
        if self.phase != SessionPhase::Unattached {
            warn!(phase = ?self.phase, "Attach while already attached");
            return;
        }
        self.phase = SessionPhase::Attached;
    }

    /// Record a scan status report. Ignored once logged in so a stray
    /// report cannot regress the phase.
    pub fn on_scan(&mut self, status: ScanStatus) {
        if self.is_logged_in() {
            return;
        }
        match status {
            ScanStatus::Waiting => self.phase = SessionPhase::Scanning,
            ScanStatus::Scanned => self.phase = SessionPhase::Scanned,
            ScanStatus::Confirmed => self.phase = SessionPhase::Confirmed,
            _ => {}
        }
    }

    /// Open the ready gate. Returns false when nothing is attached.
    pub fn mark_agent_ready(&mut self) -> bool {
        if self.phase == SessionPhase::Unattached {
            warn!("Agent ready before attach");
            return false;
        }
        self.agent_ready = true;
        if self.phase == SessionPhase::LoggedIn {
            self.phase = SessionPhase::Ready;
        }
        true
    }

    /// Complete a login with the fetched account profile.
    pub fn complete_login(&mut self, self_contact: Contact) {
        self.self_contact = Some(self_contact);
        self.phase = if self.agent_ready {
            SessionPhase::Ready
        } else {
            SessionPhase::LoggedIn
        };
    }

    /// Close the session. The profile is kept for the logout event;
    /// the ready gate closes until the next agent-ready report.
    pub fn logout(&mut self) {
        self.phase = SessionPhase::LoggedOut;
        self.agent_ready = false;
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.phase, SessionPhase::LoggedIn | SessionPhase::Ready)
    }

    /// Whether normalized messages may flow to the outward surface.
    pub fn can_emit(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn self_contact(&self) -> Option<&Contact> {
        self.self_contact.as_ref()
    }

    pub fn self_id(&self) -> Option<&str> {
        self.self_contact.as_ref().map(|c| c.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn self_contact() -> Contact {
        Contact {
            name: "Self".to_owned(),
            ..Contact::placeholder("wxid_self")
        }
    }

    #[test]
    fn test_scan_then_login_then_ready() {
        let mut session = SessionTracker::new();
        session.attach();
        assert_eq!(session.phase(), SessionPhase::Attached);

        session.on_scan(ScanStatus::Waiting);
        assert_eq!(session.phase(), SessionPhase::Scanning);
        session.on_scan(ScanStatus::Scanned);
        assert_eq!(session.phase(), SessionPhase::Scanned);
        session.on_scan(ScanStatus::Confirmed);
        assert_eq!(session.phase(), SessionPhase::Confirmed);

        session.complete_login(self_contact());
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
        assert!(session.is_logged_in());
        assert!(!session.can_emit());

        assert!(session.mark_agent_ready());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(session.can_emit());
        assert_eq!(session.self_id(), Some("wxid_self"));
    }

    #[test]
    fn test_ready_gate_open_before_login() {
        let mut session = SessionTracker::new();
        session.attach();
        assert!(session.mark_agent_ready());
        assert_eq!(session.phase(), SessionPhase::Attached);
        assert!(!session.can_emit());

        session.complete_login(self_contact());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(session.can_emit());
    }

    #[test]
    fn test_agent_ready_requires_attach() {
        let mut session = SessionTracker::new();
        assert!(!session.mark_agent_ready());
        assert!(!session.can_emit());
    }

    #[test]
    fn test_logout_closes_gate() {
        let mut session = SessionTracker::new();
        session.attach();
        session.mark_agent_ready();
        session.complete_login(self_contact());
        assert!(session.can_emit());

        session.logout();
        assert_eq!(session.phase(), SessionPhase::LoggedOut);
        assert!(!session.is_logged_in());
        assert!(!session.can_emit());
        // profile survives for the logout event
        assert_eq!(session.self_id(), Some("wxid_self"));

        // a relogin without a fresh agent-ready stays gated
        session.complete_login(self_contact());
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
        assert!(!session.can_emit());
    }

    #[test]
    fn test_scan_ignored_when_logged_in() {
        let mut session = SessionTracker::new();
        session.attach();
        session.complete_login(self_contact());
        session.on_scan(ScanStatus::Waiting);
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
    }
}
