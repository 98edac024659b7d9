//! # Session Lifecycle
//!
//! ## Purpose
//!
//! One session per engine instance:
//!
//! ```text
//! Disconnected ──connect──> SessionRequested ──OpenSession──> SessionOpen
//! ```
//!
//! On connect the engine emits RequestSession; on the store's OpenSession it
//! auto-advances to SessionOpen and immediately arms streaming with a
//! ChannelStreaming.Start - a one-shot advance, not a reaction to any later
//! message. There is no protocol-driven close: the transport's disconnect
//! notification marks the session not-open out-of-band.
//!
//! The session also owns the outbound [`MessageFactory`]. The engine wraps
//! the whole session in one async mutex so "allocate next message id, encode,
//! write" is a single atomic unit.

use etp_protocol::MessageFactory;
use tracing::warn;

/// Handshake lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    SessionRequested,
    SessionOpen,
}

/// Per-engine session: lifecycle state plus the message-id sequencer
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    factory: MessageFactory,
}

impl Session {
    pub fn new(application_name: &str, application_version: &str) -> Self {
        Self {
            state: SessionState::Disconnected,
            factory: MessageFactory::new(application_name, application_version),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn factory_mut(&mut self) -> &mut MessageFactory {
        &mut self.factory
    }

    /// Transition taken when the transport connects and RequestSession goes
    /// out
    pub fn mark_requested(&mut self) {
        self.state = SessionState::SessionRequested;
    }

    /// Transition taken on Core.OpenSession. Returns true when the open was
    /// expected (session had been requested); a duplicate or unsolicited open
    /// is reported and ignored.
    pub fn open(&mut self) -> bool {
        match self.state {
            SessionState::SessionRequested => {
                self.state = SessionState::SessionOpen;
                true
            }
            state => {
                warn!(?state, "ignoring OpenSession in unexpected session state");
                false
            }
        }
    }

    /// Out-of-band transition driven by the transport's disconnect
    /// notification
    pub fn mark_disconnected(&mut self) {
        self.state = SessionState::Disconnected;
    }
}
