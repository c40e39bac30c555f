use std::collections::{HashMap, HashSet};

use super::types::{CellKey, Poll, PollParticipant};

/// Tier count used by the availability heatmap
pub const HEATMAP_TIERS: u32 = 11;
/// Tier count used by the compact legend
pub const LEGEND_TIERS: u32 = 5;

/// Per-cell participation counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAvailability {
    pub available_count: usize,
    pub total_participants: usize,
}

/// Direction fixed by the first cell of a drag stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragDirection {
    Selecting,
    Deselecting,
}

/// Aggregated group availability for one poll, plus one viewer's tentative
/// cell selection.
///
/// The synced participants are an immutable snapshot of the poll document;
/// only the viewer's own selection mutates here, and it is pushed back via
/// `upsert_availability` once the viewer syncs.
pub struct GroupAvailability {
    participants: HashMap<String, HashSet<CellKey>>,
    current_user: Option<String>,
    selection: HashSet<CellKey>,
    drag: Option<DragDirection>,
}

impl GroupAvailability {
    /// Builds the aggregation from a poll's synced participants, with no
    /// viewer attached
    pub fn from_poll(poll: &Poll) -> Self {
        GroupAvailability {
            participants: participant_sets(poll),
            current_user: None,
            selection: HashSet::new(),
            drag: None,
        }
    }

    /// Builds the aggregation with a viewer. The viewer's tentative
    /// selection starts from their synced cells when they have synced
    /// before.
    pub fn with_current_user(poll: &Poll, email: &str) -> Self {
        let participants = participant_sets(poll);
        let selection = participants.get(email).cloned().unwrap_or_default();
        GroupAvailability {
            participants,
            current_user: Some(email.to_string()),
            selection,
            drag: None,
        }
    }

    /// Flips one cell in the viewer's own selection
    pub fn toggle_cell(&mut self, day: &str, time: &str) {
        let key = CellKey::new(day, time);
        if !self.selection.remove(&key) {
            self.selection.insert(key);
        }
    }

    /// Starts a drag stroke. The first cell's prior membership decides
    /// whether the whole stroke selects or deselects.
    pub fn begin_drag(&mut self, day: &str, time: &str) {
        let key = CellKey::new(day, time);
        let direction = if self.selection.contains(&key) {
            DragDirection::Deselecting
        } else {
            DragDirection::Selecting
        };
        self.drag = Some(direction);
        self.apply_drag(key, direction);
    }

    /// Extends an active stroke over another cell, keeping the stroke's
    /// direction instead of re-toggling
    pub fn drag_over(&mut self, day: &str, time: &str) {
        if let Some(direction) = self.drag {
            self.apply_drag(CellKey::new(day, time), direction);
        }
    }

    /// Ends the stroke (mouse-up)
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    fn apply_drag(&mut self, key: CellKey, direction: DragDirection) {
        match direction {
            DragDirection::Selecting => {
                self.selection.insert(key);
            }
            DragDirection::Deselecting => {
                self.selection.remove(&key);
            }
        }
    }

    /// Counts who is available at one cell. A viewer who has not synced
    /// yet contributes their tentative selection and one extra head to the
    /// total; a viewer already present among the synced participants is
    /// counted once, from the synced data.
    pub fn cell_availability(&self, day: &str, time: &str) -> CellAvailability {
        let key = CellKey::new(day, time);
        let mut available_count = self
            .participants
            .values()
            .filter(|cells| cells.contains(&key))
            .count();
        let mut total_participants = self.participants.len();

        if let Some(email) = &self.current_user {
            if !self.participants.contains_key(email) {
                total_participants += 1;
                if self.selection.contains(&key) {
                    available_count += 1;
                }
            }
        }

        CellAvailability {
            available_count,
            total_participants,
        }
    }

    /// Partitions every known participant (viewer included) into available
    /// and unavailable for one cell, for the hover tooltip. Both lists are
    /// sorted for stable display.
    pub fn available_users_at(&self, day: &str, time: &str) -> (Vec<String>, Vec<String>) {
        let key = CellKey::new(day, time);
        let mut available = Vec::new();
        let mut unavailable = Vec::new();

        for (email, cells) in &self.participants {
            if cells.contains(&key) {
                available.push(email.clone());
            } else {
                unavailable.push(email.clone());
            }
        }

        if let Some(email) = &self.current_user {
            if !self.participants.contains_key(email) {
                if self.selection.contains(&key) {
                    available.push(email.clone());
                } else {
                    unavailable.push(email.clone());
                }
            }
        }

        available.sort();
        unavailable.sort();
        (available, unavailable)
    }

    /// The viewer's current selection
    pub fn selection(&self) -> &HashSet<CellKey> {
        &self.selection
    }

    /// Wire form of the viewer's selection for the availability upsert,
    /// sorted for a stable payload
    pub fn selection_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.selection.iter().map(CellKey::to_wire).collect();
        keys.sort();
        keys
    }
}

fn participant_sets(poll: &Poll) -> HashMap<String, HashSet<CellKey>> {
    let mut participants = HashMap::new();
    for p in &poll.participants {
        let cells: HashSet<CellKey> = p
            .schedule
            .iter()
            .filter_map(|key| CellKey::from_wire(key))
            .collect();
        participants.insert(p.email.clone(), cells);
    }
    participants
}

/// Replaces one participant's synced cell set, inserting a new participant
/// on first sync. Keys are deduplicated, first occurrence wins.
pub fn upsert_availability(poll: &mut Poll, email: &str, selected: Vec<String>) {
    let mut seen = HashSet::new();
    let deduped: Vec<String> = selected
        .into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect();

    match poll.participants.iter_mut().find(|p| p.email == email) {
        Some(participant) => participant.schedule = deduped,
        None => poll.participants.push(PollParticipant {
            email: email.to_string(),
            schedule: deduped,
        }),
    }
}

/// Buckets an availability ratio into a discrete intensity tier:
/// `ceil(ratio * buckets)` clamped to `[0, buckets]`. An empty poll maps
/// to tier 0, the fully transparent sentinel.
pub fn intensity_tier(available_count: usize, total_participants: usize, buckets: u32) -> u32 {
    if total_participants == 0 {
        return 0;
    }
    let ratio = available_count as f64 / total_participants as f64;
    ((ratio * buckets as f64).ceil() as u32).min(buckets)
}
