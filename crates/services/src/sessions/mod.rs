mod controller;
mod progress;
mod projector;
mod reducer;
mod session;
mod store;

// Public API of the session subsystem.
pub use controller::SessionController;
pub use progress::SessionProgress;
pub use projector::{QuestionState, ResultProjector};
pub use reducer::{SessionEvent, apply};
pub use session::{QuizSession, SessionStatus};
pub use store::{SessionStore, StoreState};
