use serde::{Deserialize, Serialize};

/// One participant's synced cell selection. `schedule` holds "Day-HH:MM"
/// grid-cell keys as they travel over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollParticipant {
    pub email: String,
    pub schedule: Vec<String>,
}

/// A poll document as stored and served
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub url_path: String,
    pub days: Vec<String>,
    pub times: Vec<String>,
    pub participants: Vec<PollParticipant>,
}

/// Identity of one (day, time) grid cell. Kept as a value-typed pair so
/// cell comparisons never depend on a string delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub day: String,
    pub time: String,
}

impl CellKey {
    pub fn new(day: &str, time: &str) -> Self {
        CellKey {
            day: day.to_string(),
            time: time.to_string(),
        }
    }

    /// Parses the "Day-HH:MM" wire form, splitting on the first '-'
    pub fn from_wire(key: &str) -> Option<CellKey> {
        key.split_once('-')
            .map(|(day, time)| CellKey::new(day, time))
    }

    /// Renders the wire form used in participant schedules
    pub fn to_wire(&self) -> String {
        format!("{}-{}", self.day, self.time)
    }
}
