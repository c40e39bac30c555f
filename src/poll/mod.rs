pub mod availability;
pub mod types;

pub use availability::{
    intensity_tier, upsert_availability, CellAvailability, GroupAvailability, HEATMAP_TIERS,
    LEGEND_TIERS,
};
pub use types::{CellKey, Poll, PollParticipant};
