//! Pickup Time Slot Model

use serde::{Deserialize, Serialize};

/// A bookable pickup slot for the current service day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// "HH:MM" label, 24-hour clock
    pub time: String,
    pub capacity: u32,
    pub booked: u32,
    /// booked < capacity
    pub available: bool,
}

impl TimeSlot {
    pub fn new(time: impl Into<String>, capacity: u32, booked: u32) -> Self {
        Self {
            time: time.into(),
            capacity,
            booked,
            available: booked < capacity,
        }
    }
}
