//! 取餐时段分配
//!
//! 每个营业日生成 `now + lead` 之后、`close_hour:00` (含) 之前、按 step 对齐的时段。
//! 已预订数量记录在进程内账本中，日期变化时清零；跨实例不共享。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use parking_lot::Mutex;
use rand::Rng;
use shared::error::{AppError, ErrorCode};
use shared::models::TimeSlot;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// How the booked count of a fresh slot is initialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotSeed {
    /// Every slot starts empty
    #[default]
    Zero,
    /// Pseudo-random 0..10, simulating walk-in demand
    Random,
}

impl SlotSeed {
    fn initial_booked(&self) -> u32 {
        match self {
            SlotSeed::Zero => 0,
            SlotSeed::Random => rand::thread_rng().gen_range(0..10),
        }
    }
}

impl FromStr for SlotSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(SlotSeed::Zero),
            "random" => Ok(SlotSeed::Random),
            other => Err(format!("unknown slot seed: {other}")),
        }
    }
}

/// Slot generation parameters
#[derive(Debug, Clone)]
pub struct SlotConfig {
    /// Minimum minutes between now and the first slot (exclusive)
    pub lead_minutes: u32,
    pub step_minutes: u32,
    /// Last slot is `close_hour:00`
    pub close_hour: u32,
    pub capacity: u32,
    pub seed: SlotSeed,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            lead_minutes: 30,
            step_minutes: 15,
            close_hour: 22,
            capacity: 20,
            seed: SlotSeed::Zero,
        }
    }
}

/// Slot errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("Pickup slot {0} is not offered")]
    NotOffered(String),

    #[error("Pickup slot {0} is fully booked")]
    Full(String),
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        match &err {
            SlotError::NotOffered(label) => {
                AppError::with_message(ErrorCode::SlotNotFound, err.to_string())
                    .with_detail("time", label.as_str())
            }
            SlotError::Full(label) => AppError::with_message(ErrorCode::SlotFull, err.to_string())
                .with_detail("time", label.as_str()),
        }
    }
}

fn label(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Step-aligned "HH:MM" labels strictly after `now + lead`, up to and including close
pub fn slot_labels(now: NaiveTime, config: &SlotConfig) -> Vec<String> {
    let step = config.step_minutes;
    if step == 0 {
        return Vec::new();
    }
    let threshold = now.hour() * 60 + now.minute() + config.lead_minutes;
    let close = config.close_hour.min(24) * 60;
    let first = (threshold / step + 1) * step;

    (first..=close).step_by(step as usize).map(label).collect()
}

/// Fresh slots for the rest of the day, booked counts seeded per `config.seed`
pub fn generate_slots(now: NaiveTime, config: &SlotConfig) -> Vec<TimeSlot> {
    slot_labels(now, config)
        .into_iter()
        .map(|time| TimeSlot::new(time, config.capacity, config.seed.initial_booked()))
        .collect()
}

#[derive(Debug, Default)]
struct DayLedger {
    date: Option<NaiveDate>,
    booked: HashMap<String, u32>,
}

impl DayLedger {
    fn roll_to(&mut self, date: NaiveDate) {
        if self.date != Some(date) {
            self.date = Some(date);
            self.booked.clear();
        }
    }

    fn entry(&mut self, time: &str, seed: SlotSeed) -> &mut u32 {
        self.booked
            .entry(time.to_string())
            .or_insert_with(|| seed.initial_booked())
    }
}

/// Books pickup slots against a per-day in-process ledger
#[derive(Debug, Clone)]
pub struct TimeSlotAllocator {
    config: SlotConfig,
    ledger: Arc<Mutex<DayLedger>>,
}

impl TimeSlotAllocator {
    pub fn new(config: SlotConfig) -> Self {
        Self {
            config,
            ledger: Arc::new(Mutex::new(DayLedger::default())),
        }
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Slots still open today, with current booked counts
    pub fn current_slots(&self, now: NaiveDateTime) -> Vec<TimeSlot> {
        let mut ledger = self.ledger.lock();
        ledger.roll_to(now.date());
        slot_labels(now.time(), &self.config)
            .into_iter()
            .map(|time| {
                let booked = *ledger.entry(&time, self.config.seed);
                TimeSlot::new(time, self.config.capacity, booked)
            })
            .collect()
    }

    /// Whether `time` is offered right now and has room
    pub fn is_available(&self, now: NaiveDateTime, time: &str) -> bool {
        self.current_slots(now)
            .iter()
            .any(|slot| slot.time == time && slot.available)
    }

    /// Reserve one place in `time`
    pub fn book(&self, now: NaiveDateTime, time: &str) -> Result<TimeSlot, SlotError> {
        if !slot_labels(now.time(), &self.config).iter().any(|l| l == time) {
            return Err(SlotError::NotOffered(time.to_string()));
        }

        let mut ledger = self.ledger.lock();
        ledger.roll_to(now.date());
        let capacity = self.config.capacity;
        let booked = ledger.entry(time, self.config.seed);
        if *booked >= capacity {
            return Err(SlotError::Full(time.to_string()));
        }
        *booked += 1;
        tracing::debug!(time, booked = *booked, capacity, "Pickup slot booked");
        Ok(TimeSlot::new(time, capacity, *booked))
    }

    /// Give back a place taken by [`book`](Self::book) on the same day
    pub fn release(&self, date: NaiveDate, time: &str) {
        let mut ledger = self.ledger.lock();
        if ledger.date != Some(date) {
            return;
        }
        if let Some(booked) = ledger.booked.get_mut(time) {
            *booked = booked.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests;
