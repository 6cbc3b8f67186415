//! Scheduling and playback engine

pub mod cursor;
pub mod eligibility;
pub mod engine;
pub mod events;
pub mod hold;
pub mod orientation;
pub mod queue;
pub mod refresh;
pub mod scheduler;
pub mod timers;

pub use cursor::{CursorState, PlaybackCursor};
pub use eligibility::is_eligible;
pub use engine::{EngineConfig, EngineHandle, ExitReason, PlaybackEngine};
pub use events::{EngineEvent, RefreshOutcome};
pub use hold::compute_hold_time;
pub use orientation::derive_orientation;
pub use queue::{build_queue, QueueBuilder};
pub use scheduler::{Directive, Scheduler};
