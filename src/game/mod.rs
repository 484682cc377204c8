mod engine;
mod session;

pub use engine::{PressOutcome, STEP_COUNT, SequenceEngine};
pub use session::GameSession;
