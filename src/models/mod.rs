pub mod event;

pub use event::{RecordError, StoredRecord, WorkoutEvent, MUSCLE_GROUPS};
