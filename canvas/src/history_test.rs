use super::*;

#[test]
fn empty_history_has_nothing_to_undo_or_redo() {
    let mut h: History<u32> = History::new(4);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert_eq!(h.undo(&7), None);
    assert_eq!(h.redo(&7), None);
}

#[test]
fn undo_returns_previous_and_enables_redo() {
    let mut h = History::new(4);
    h.record(1);
    assert_eq!(h.undo(&2), Some(1));
    assert!(h.can_redo());
    assert_eq!(h.redo(&1), Some(2));
    assert!(!h.can_redo());
    assert_eq!(h.past.len(), 1);
}

#[test]
fn record_clears_future() {
    let mut h = History::new(4);
    h.record(1);
    h.undo(&2);
    assert!(h.can_redo());
    h.record(1);
    assert!(!h.can_redo());
}

#[test]
fn capacity_evicts_oldest() {
    let mut h = History::new(3);
    for i in 0..5 {
        h.record(i);
    }
    assert_eq!(h.past.len(), 3);
    assert_eq!(h.undo(&5), Some(4));
    assert_eq!(h.undo(&4), Some(3));
    assert_eq!(h.undo(&3), Some(2));
    assert_eq!(h.undo(&2), None);
}

#[test]
fn redo_respects_capacity() {
    let mut h = History::new(2);
    h.record(0);
    h.record(1);
    assert_eq!(h.undo(&2), Some(1));
    h.past.push_back(9);
    assert_eq!(h.redo(&1), Some(2));
    assert_eq!(h.past.len(), 2);
}

#[test]
fn zero_capacity_records_nothing() {
    let mut h = History::new(0);
    h.record(1);
    assert!(!h.can_undo());
}
