//! The scheduling core: a pure, synchronous algorithm library with no I/O.
//!
//! Modules correspond one-to-one with the numbered components C1-C5: a
//! catalog adapter contract, a scorer, a top-K buffer, an enumerator, and a
//! deadline-bound driver tying them together.

pub mod catalog;
pub mod driver;
pub mod enumerator;
pub mod error;
pub mod model;
pub mod scorer;
pub mod topk;

pub use driver::{Outcome, SearchDriver};
pub use error::{CatalogError, CoreError};
pub use model::{
    Break, CourseCode, Crn, DaySet, MeetingTime, PreferredTime, Preferences, ScoredSchedule,
    Section, TimeOfDay,
};
