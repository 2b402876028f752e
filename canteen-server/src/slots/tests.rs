use super::*;

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn on(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_time(at(h, m))
}

#[test]
fn test_lead_time_excludes_near_slots() {
    let labels = slot_labels(at(9, 10), &SlotConfig::default());
    assert!(!labels.contains(&"09:15".to_string()));
    assert!(!labels.contains(&"09:30".to_string()));
    assert_eq!(labels.first().map(String::as_str), Some("09:45"));
    assert_eq!(labels.last().map(String::as_str), Some("22:00"));
    assert_eq!(labels.len(), 50);
}

#[test]
fn test_threshold_on_boundary_is_exclusive() {
    // 09:15 + 30 = 09:45 exactly, which is not strictly after
    let labels = slot_labels(at(9, 15), &SlotConfig::default());
    assert_eq!(labels.first().map(String::as_str), Some("10:00"));
}

#[test]
fn test_no_slots_after_close() {
    assert!(slot_labels(at(21, 30), &SlotConfig::default()).is_empty());
    assert!(slot_labels(at(23, 50), &SlotConfig::default()).is_empty());
    assert_eq!(slot_labels(at(21, 29), &SlotConfig::default()), vec!["22:00"]);
}

#[test]
fn test_labels_unique_and_step_aligned() {
    let config = SlotConfig {
        step_minutes: 20,
        ..Default::default()
    };
    let labels = slot_labels(at(7, 3), &config);
    let mut dedup = labels.clone();
    dedup.dedup();
    assert_eq!(labels, dedup);
    for l in &labels {
        let t = NaiveTime::parse_from_str(l, "%H:%M").unwrap();
        assert_eq!((t.hour() * 60 + t.minute()) % 20, 0);
    }
}

#[test]
fn test_generate_zero_seed() {
    let slots = generate_slots(at(20, 0), &SlotConfig::default());
    assert!(slots.iter().all(|s| s.booked == 0 && s.capacity == 20 && s.available));
}

#[test]
fn test_generate_random_seed_in_range() {
    let config = SlotConfig {
        seed: SlotSeed::Random,
        ..Default::default()
    };
    let slots = generate_slots(at(8, 0), &config);
    assert!(!slots.is_empty());
    assert!(slots.iter().all(|s| s.booked < 10));
}

#[test]
fn test_book_until_full() {
    let allocator = TimeSlotAllocator::new(SlotConfig {
        capacity: 2,
        ..Default::default()
    });
    let now = on(1, 11, 0);
    assert!(allocator.is_available(now, "12:00"));
    assert_eq!(allocator.book(now, "12:00").unwrap().booked, 1);
    let slot = allocator.book(now, "12:00").unwrap();
    assert_eq!(slot.booked, 2);
    assert!(!slot.available);
    assert!(!allocator.is_available(now, "12:00"));
    assert_eq!(
        allocator.book(now, "12:00"),
        Err(SlotError::Full("12:00".to_string()))
    );
}

#[test]
fn test_book_unknown_or_past_label() {
    let allocator = TimeSlotAllocator::new(SlotConfig::default());
    let now = on(1, 11, 0);
    assert_eq!(
        allocator.book(now, "11:15"),
        Err(SlotError::NotOffered("11:15".to_string()))
    );
    assert_eq!(
        allocator.book(now, "12:07"),
        Err(SlotError::NotOffered("12:07".to_string()))
    );
    assert_eq!(
        allocator.book(now, "lunch"),
        Err(SlotError::NotOffered("lunch".to_string()))
    );
}

#[test]
fn test_ledger_resets_next_day() {
    let allocator = TimeSlotAllocator::new(SlotConfig {
        capacity: 1,
        ..Default::default()
    });
    allocator.book(on(1, 11, 0), "12:00").unwrap();
    assert!(!allocator.is_available(on(1, 11, 0), "12:00"));
    assert!(allocator.is_available(on(2, 11, 0), "12:00"));
}

#[test]
fn test_release_frees_capacity() {
    let allocator = TimeSlotAllocator::new(SlotConfig {
        capacity: 1,
        ..Default::default()
    });
    let now = on(1, 11, 0);
    allocator.book(now, "12:00").unwrap();
    allocator.release(now.date(), "12:00");
    assert!(allocator.is_available(now, "12:00"));
}

#[test]
fn test_current_slots_reflect_bookings() {
    let allocator = TimeSlotAllocator::new(SlotConfig::default());
    let now = on(1, 21, 0);
    allocator.book(now, "21:45").unwrap();
    let slots = allocator.current_slots(now);
    let labels: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(labels, vec!["21:45", "22:00"]);
    assert_eq!(slots[0].booked, 1);
    assert_eq!(slots[1].booked, 0);
}

#[test]
fn test_slot_error_maps_to_codes() {
    let err: AppError = SlotError::Full("12:00".to_string()).into();
    assert_eq!(err.code, ErrorCode::SlotFull);
    let err: AppError = SlotError::NotOffered("12:00".to_string()).into();
    assert_eq!(err.code, ErrorCode::SlotNotFound);
}

#[test]
fn test_seed_parse() {
    assert_eq!("random".parse::<SlotSeed>(), Ok(SlotSeed::Random));
    assert_eq!("Zero".parse::<SlotSeed>(), Ok(SlotSeed::Zero));
    assert!("lots".parse::<SlotSeed>().is_err());
}
