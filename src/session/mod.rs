//! Session lifecycle: `Setup → Generating → Playing → Finished`.

mod controller;
mod state;
mod timer;

pub use controller::{SessionController, SessionSnapshot};
pub use state::{Session, SessionState};
pub use timer::{TimerDelays, TimerToken};
