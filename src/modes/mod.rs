pub mod headless;
pub mod human;
pub mod session;

pub use headless::HeadlessMode;
pub use human::HumanMode;
pub use session::{GameSession, SessionHandle, SessionSupervisor, Snapshot};
