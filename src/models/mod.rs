//! Tournament scheduling domain models.
//!
//! Provides the core data types for representing a tournament day and
//! its schedule.
//!
//! # Domain Mappings
//!
//! | u-tournament | Robotics tournament | Job-shop analogue |
//! |--------------|---------------------|-------------------|
//! | Team | Competing team | Job |
//! | Event | Table run / judging session / ceremony / lunch | Operation |
//! | Resource | Game table / judging room / shared area | Machine |
//! | Schedule | Day plan | Production plan |

mod event;
mod resource;
mod schedule;
mod time;

pub use event::{Event, EventKind, TeamId};
pub use resource::{ResourceId, ResourceKind};
pub use schedule::Schedule;
pub use time::{Minutes, TimeWindow};
