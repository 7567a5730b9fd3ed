//! Game sessions against external opponents

pub mod manager;
pub mod session;

pub use manager::SessionManager;
pub use session::{MoveLogEntry, Session, SessionPhase, SessionView};
