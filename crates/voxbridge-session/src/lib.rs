pub mod session;

pub use session::{shutdown_channel, Session, SessionError, ShutdownHandle};
