//! Domain model for session scheduling.
//!
//! - [`TimeSlot`]: a dated room booking with precomputed overlap/adjacency relations
//! - [`Session`]: a unit of work with constraint-derived cost data
//! - [`records`]: raw input records as delivered by a data-access collaborator

pub mod records;
mod session;
mod time_range;
mod timeslot;


use std::fmt;

use serde::{Deserialize, Serialize};

pub use session::{
    update_complexities, AdjacencyRequirement, Session, SessionConstraints, TimeRelation,
    TimeRelationRequirement,
};
pub use time_range::{TimeOfDay, TimeRange};
pub use timeslot::{link_timeslots, TimeSlot};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// External identity of a timeslot.
    TimeSlotId
);
opaque_id!(
    /// External identity of a session. Sessions of one group are expected
    /// to run in ascending id order.
    SessionId
);
opaque_id!(
    /// A room.
    LocationId
);
opaque_id!(
    /// A person, such as a key participant or a responsible director.
    PersonId
);
