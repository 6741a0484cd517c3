use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Action Value Objects
// ============================================================================

pub type ActionId = i64;

/// Column width of `action` in the backing table
pub const MAX_ACTION_LEN: usize = 255;

/// A stored sustainability action
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub id: ActionId,
    pub action: String,
    pub date: NaiveDate,
    pub points: i32,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} for {} points", self.action, self.date, self.points)
    }
}

/// Field values for a record that has not been assigned an id yet.
///
/// Also the shape read back from the backup mirror: any `id` present in the
/// file is ignored so that restored rows get fresh ids.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewAction {
    pub action: String,
    pub date: NaiveDate,
    pub points: i32,
}

impl NewAction {
    pub fn with_id(self, id: ActionId) -> Action {
        Action {
            id,
            action: self.action,
            date: self.date,
            points: self.points,
        }
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ActionChanges {
    pub action: Option<String>,
    pub date: Option<NaiveDate>,
    pub points: Option<i32>,
}

impl ActionChanges {
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.date.is_none() && self.points.is_none()
    }

    pub fn apply_to(&self, target: &mut Action) {
        if let Some(action) = &self.action {
            target.action = action.clone();
        }
        if let Some(date) = self.date {
            target.date = date;
        }
        if let Some(points) = self.points {
            target.points = points;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
