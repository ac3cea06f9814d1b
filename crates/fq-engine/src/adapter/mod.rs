//! In-process implementations of the collaborator ports.
//!
//! These back the CLI and the test suites. None of them persist anything
//! beyond the life of the process.

pub mod clock;
pub mod curse;
pub mod memory;
pub mod notifier;

pub use clock::{ManualClock, SystemClock};
pub use curse::{CurseConfig, FixedValidator, GraceCurse, NoValidator};
pub use memory::MemoryStore;
pub use notifier::{LogNotifier, NotifierCall};
