//! Scheduling scenarios driven tick by tick against the `Scheduler`
//!
//! No timers run here: hold expiries and media-end signals are delivered by
//! hand, so every transition is deterministic.

mod helpers;

use chrono::Duration as ChronoDuration;
use helpers::*;
use kiosk_common::events::OrientationDirective;
use kiosk_common::Orientation;
use kiosk_player::playback::{CursorState, Directive, Scheduler};
use std::time::Duration;
use uuid::Uuid;

const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri"];

fn armed_generation(directives: &[Directive]) -> Option<u64> {
    directives.iter().find_map(|d| match d {
        Directive::ArmHold { generation, .. } => Some(*generation),
        _ => None,
    })
}

fn shown(directives: &[Directive]) -> Vec<(String, Uuid, u64)> {
    directives
        .iter()
        .filter_map(|d| match d {
            Directive::Show { item, play_id, hold_ms } => Some((item.id.clone(), *play_id, *hold_ms)),
            _ => None,
        })
        .collect()
}

fn count_mode_switches(directives: &[Directive]) -> usize {
    directives
        .iter()
        .filter(|d| matches!(d, Directive::ModeSwitched { .. }))
        .count()
}

#[test]
fn test_business_hours_to_evening_switches_exactly_once() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[
        image("A", Some(10.0)),
        recurring(image("B", Some(10.0)), WEEKDAYS, "09:00", "17:00"),
    ]));

    let mut now = wednesday(10, 0);
    let directives = scheduler.tick(&now);
    assert_eq!(scheduler.queue_identity(), vec!["B".to_string()]);
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(0));
    assert_eq!(shown(&directives)[0].0, "B");
    let switches_before = scheduler.mode_switch_count();

    // 1s polling across eight hours
    let end = wednesday(18, 0);
    let mut switch_directives = 0;
    while now < end {
        now += ChronoDuration::seconds(1);
        switch_directives += count_mode_switches(&scheduler.tick(&now));
    }

    assert_eq!(switch_directives, 1);
    assert_eq!(scheduler.mode_switch_count(), switches_before + 1);
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(0));
    assert_eq!(scheduler.active_item().map(|i| i.id.as_str()), Some("A"));
}

#[test]
fn test_switch_happens_at_window_end() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[
        image("A", None),
        recurring(image("B", None), WEEKDAYS, "09:00", "17:00"),
    ]));

    scheduler.tick(&local(2024, 1, 10, 16, 59, 59));
    assert_eq!(scheduler.queue_identity(), vec!["B".to_string()]);

    // End of the daily window is exclusive
    let directives = scheduler.tick(&wednesday(17, 0));
    assert_eq!(count_mode_switches(&directives), 1);
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);
}

#[test]
fn test_mode_switch_cancels_pending_hold_before_starting() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[
        image("A", Some(30.0)),
        recurring(image("B", Some(30.0)), WEEKDAYS, "09:00", "17:00"),
    ]));
    scheduler.tick(&wednesday(16, 59));
    assert!(scheduler.is_hold_armed());

    let directives = scheduler.tick(&wednesday(17, 0));

    assert!(matches!(directives[0], Directive::ModeSwitched { .. }));
    assert!(matches!(directives[1], Directive::CancelHold));
    assert_eq!(
        directives[2],
        Directive::Orientation(OrientationDirective::Unlock)
    );
    assert_eq!(shown(&directives)[0].0, "A");
    assert!(matches!(
        directives.last(),
        Some(Directive::ArmHold { delay, .. }) if *delay == Duration::from_secs(30)
    ));
}

#[test]
fn test_identical_refresh_keeps_cursor() {
    let records = vec![image("A", Some(5.0)), image("B", Some(5.0))];
    let mut scheduler = Scheduler::new(3000);
    assert!(scheduler.replace_playlist(items(&records)));

    let directives = scheduler.tick(&wednesday(10, 0));
    let generation = armed_generation(&directives).unwrap();
    scheduler.on_hold_expired(generation);
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(1));

    // Same payload again: discarded
    assert!(!scheduler.replace_playlist(items(&records)));
    assert!(scheduler.tick(&wednesday(10, 0)).is_empty());
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(1));
    assert_eq!(scheduler.active_item().map(|i| i.id.as_str()), Some("B"));
}

#[test]
fn test_duration_change_is_not_a_mode_switch() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", Some(5.0)), image("B", Some(5.0))]));
    let directives = scheduler.tick(&wednesday(10, 0));
    scheduler.on_hold_expired(armed_generation(&directives).unwrap());

    assert!(scheduler.replace_playlist(items(&[image("A", Some(5.0)), image("B", Some(20.0))])));
    let directives = scheduler.tick(&wednesday(10, 0));

    assert!(directives.is_empty());
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(1));
    // New duration applies from the next playback start of B
    assert_eq!(scheduler.active_item().and_then(|i| i.duration), Some(20.0));
}

#[test]
fn test_single_item_queue_restarts_with_new_play_id() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", Some(4.0))]));

    let first = scheduler.tick(&wednesday(10, 0));
    let (_, first_play, hold) = shown(&first)[0].clone();
    assert_eq!(hold, 4000);

    let generation = armed_generation(&first).unwrap();
    let second = scheduler.on_hold_expired(generation);
    let (id, second_play, _) = shown(&second)[0].clone();

    assert_eq!(id, "A");
    assert_ne!(first_play, second_play);
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(0));

    // The superseded timer is stale now
    assert!(scheduler.on_hold_expired(generation).is_empty());
}

#[test]
fn test_cursor_wraps_through_queue() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", None), image("B", None), image("C", None)]));

    let mut directives = scheduler.tick(&wednesday(10, 0));
    let mut order = vec![shown(&directives)[0].0.clone()];
    for _ in 0..3 {
        directives = scheduler.on_hold_expired(armed_generation(&directives).unwrap());
        order.push(shown(&directives)[0].0.clone());
    }

    assert_eq!(order, vec!["A", "B", "C", "A"]);
    assert_eq!(scheduler.advance_count(), 3);
}

#[test]
fn test_video_advances_on_matching_media_end_only() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[video("V", None), image("I", Some(2.0))]));

    let directives = scheduler.tick(&wednesday(10, 0));
    let (id, play_id, hold) = shown(&directives)[0].clone();
    assert_eq!((id.as_str(), hold), ("V", 0));
    assert!(armed_generation(&directives).is_none());

    assert!(scheduler.on_media_end(Some(Uuid::new_v4())).is_empty());
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(0));

    let directives = scheduler.on_media_end(Some(play_id));
    assert_eq!(shown(&directives)[0].0, "I");

    // Image is governed by its hold timer
    assert!(scheduler.on_media_end(None).is_empty());
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(1));
}

#[test]
fn test_one_time_window_preempts_defaults() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[
        image("A", None),
        one_time(
            image("PROMO", None),
            "2024-01-10T10:00:00+02:00",
            "2024-01-10T10:30:00+02:00",
        ),
    ]));

    scheduler.tick(&wednesday(9, 59));
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);

    scheduler.tick(&wednesday(10, 0));
    assert_eq!(scheduler.queue_identity(), vec!["PROMO".to_string()]);

    scheduler.tick(&wednesday(10, 30));
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);
    assert_eq!(scheduler.mode_switch_count(), 3);
}

#[test]
fn test_malformed_item_never_plays() {
    let mut broken = image("BROKEN", None);
    broken.start_at = Some("2024-01-10T09:00:00+02:00".to_string());

    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", None), broken]));
    scheduler.tick(&wednesday(10, 0));

    assert_eq!(scheduler.malformed_count(), 1);
    assert_eq!(scheduler.playlist().len(), 2);
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);
}

#[test]
fn test_nothing_eligible_clears_display() {
    let mut scheduler = Scheduler::new(3000);
    let mut portrait = recurring(image("B", None), WEEKDAYS, "09:00", "17:00");
    portrait.orientation = Some("portrait".to_string());
    scheduler.replace_playlist(items(&[portrait]));

    let directives = scheduler.tick(&wednesday(10, 0));
    assert_eq!(
        directives[1],
        Directive::Orientation(OrientationDirective::Lock(Orientation::Portrait))
    );

    let directives = scheduler.tick(&wednesday(17, 0));

    assert_eq!(scheduler.cursor_state(), CursorState::Empty);
    assert!(scheduler.active_item().is_none());
    assert!(scheduler.play_id().is_none());
    assert!(directives.contains(&Directive::Clear));
    assert!(directives.contains(&Directive::Orientation(OrientationDirective::Unlock)));
}

#[test]
fn test_weekend_uses_defaults() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[
        image("A", None),
        recurring(image("B", None), WEEKDAYS, "09:00", "17:00"),
    ]));

    // Saturday
    scheduler.tick(&local(2024, 1, 13, 10, 0, 0));
    assert_eq!(scheduler.queue_identity(), vec!["A".to_string()]);
}

#[test]
fn test_sub_millisecond_duration_still_arms_hold() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", Some(0.0004)), image("B", None)]));

    let directives = scheduler.tick(&wednesday(10, 0));
    assert_eq!(shown(&directives)[0].0, "A");
    assert!(matches!(
        directives.last(),
        Some(Directive::ArmHold { delay, .. }) if *delay == Duration::from_millis(1)
    ));

    let directives = scheduler.on_hold_expired(armed_generation(&directives).unwrap());
    assert_eq!(shown(&directives)[0].0, "B");
}

#[test]
fn test_shrinking_queue_restarts_from_head() {
    let mut scheduler = Scheduler::new(3000);
    scheduler.replace_playlist(items(&[image("A", None), image("B", None)]));
    let directives = scheduler.tick(&wednesday(10, 0));
    scheduler.on_hold_expired(armed_generation(&directives).unwrap());
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(1));

    // Dropping B changes the identity, so the cursor never points past the end
    assert!(scheduler.replace_playlist(items(&[image("A", None)])));
    let directives = scheduler.tick(&wednesday(10, 0));

    assert_eq!(count_mode_switches(&directives), 1);
    assert_eq!(scheduler.cursor_state(), CursorState::Playing(0));
    assert_eq!(shown(&directives)[0].0, "A");
}
