pub mod session;
pub mod stealth;
pub mod wait;

pub use session::{render_in_session, BrowserSession, SessionId};
pub use stealth::{BrowserFingerprint, ViewportSize};
pub use wait::{WaitConfig, WaitOutcome};
