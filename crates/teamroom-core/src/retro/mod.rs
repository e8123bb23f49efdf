//! Retrospective method recommender.
//!
//! Seven fixed retrospective formats are scored against how the person
//! feels, what they want out of the session and how long they have.

pub mod methods;
pub mod recommend;
pub mod sheet;

pub use methods::{find_method, Feeling, Purpose, RetroMethod, METHODS};
pub use recommend::{recommend, score, Recommendation, TimeBudget};
pub use sheet::render_sheet;
