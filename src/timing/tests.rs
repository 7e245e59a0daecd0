//! Timing domain: unit tests for the timer deck.

use bevy::prelude::{Entity, TimerMode};
use std::time::Duration;

use super::TimerDeck;

#[test]
fn test_one_shot_fires_once_then_disarms() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    deck.schedule("once", 1.0, TimerMode::Once, 7);

    assert!(deck.tick(Duration::from_secs_f32(0.5)).is_empty());
    assert_eq!(deck.tick(Duration::from_secs_f32(0.6)), vec![7]);
    assert!(deck.is_empty());
    assert!(deck.tick(Duration::from_secs_f32(10.0)).is_empty());
}

#[test]
fn test_repeating_rearms() {
    let mut deck: TimerDeck<&str> = TimerDeck::new();
    deck.schedule("pulse", 1.0, TimerMode::Repeating, "tick");

    assert_eq!(deck.tick(Duration::from_secs_f32(1.0)), vec!["tick"]);
    assert_eq!(deck.tick(Duration::from_secs_f32(1.0)), vec!["tick"]);
    assert_eq!(deck.len(), 1);
}

#[test]
fn test_repeating_catches_up_on_large_delta() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    deck.schedule("pulse", 1.0, TimerMode::Repeating, 1);

    let fired = deck.tick(Duration::from_secs_f32(3.5));
    assert_eq!(fired.len(), 3);
}

#[test]
fn test_same_deadline_fires_in_registration_order() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    deck.schedule("first", 1.0, TimerMode::Once, 1);
    deck.schedule("second", 1.0, TimerMode::Once, 2);
    deck.schedule("third", 1.0, TimerMode::Once, 3);

    assert_eq!(deck.tick(Duration::from_secs_f32(1.0)), vec![1, 2, 3]);
}

#[test]
fn test_cancelled_handle_never_fires() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    let keep = deck.schedule("keep", 1.0, TimerMode::Once, 1);
    let drop = deck.schedule("drop", 1.0, TimerMode::Once, 2);

    assert!(deck.cancel(drop));
    assert!(!deck.cancel(drop), "second cancel reports nothing removed");
    assert!(deck.is_scheduled(keep));
    assert!(!deck.is_scheduled(drop));

    assert_eq!(deck.tick(Duration::from_secs_f32(1.0)), vec![1]);
}

#[test]
fn test_cancel_owned_by_drops_all_entity_timers() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    let victim = Entity::from_bits(1);
    let bystander = Entity::from_bits(2);

    deck.schedule_for(victim, "a", 1.0, TimerMode::Once, 1);
    deck.schedule_for(victim, "b", 2.0, TimerMode::Repeating, 2);
    deck.schedule_for(bystander, "c", 1.0, TimerMode::Once, 3);
    deck.schedule("unowned", 1.0, TimerMode::Once, 4);

    assert_eq!(deck.cancel_owned_by(victim), 2);
    assert_eq!(deck.len(), 2);
    assert_eq!(deck.tick(Duration::from_secs_f32(1.0)), vec![3, 4]);
}

#[test]
fn test_pending_labels_in_registration_order() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    deck.schedule("stall", 120.0, TimerMode::Once, 1);
    deck.schedule("spawn-pulse", 0.8, TimerMode::Repeating, 2);

    assert_eq!(deck.pending_labels(), vec!["stall", "spawn-pulse"]);
}

#[test]
fn test_clear_empties_deck() {
    let mut deck: TimerDeck<u32> = TimerDeck::new();
    deck.schedule("a", 1.0, TimerMode::Once, 1);
    deck.schedule("b", 1.0, TimerMode::Repeating, 2);
    deck.clear();
    assert!(deck.is_empty());
    assert!(deck.tick(Duration::from_secs_f32(5.0)).is_empty());
}
