//! Memorization drills over a studied move tree: the player replays one
//! side from memory, the computer answers for the other, and a graded
//! report summarizes the run.

pub mod range;
pub mod report;
pub mod session;
pub mod timer;

pub use range::VariationRange;
pub use report::{Grade, PlyOutcome, PlyReport, PracticeReport};
pub use session::{
    MoveVerdict, PracticeConfig, PracticeMode, PracticeSession, PracticeSide, RecordedError,
    SessionState,
};
pub use timer::{ComputerTimer, DEFAULT_DELAY};
