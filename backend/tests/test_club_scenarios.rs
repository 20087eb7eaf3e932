//! End-to-end scenarios for the club engine
//!
//! Each test drives a club through a short day and checks the emitted
//! records and the resulting state.

use computer_club_core::{
    ClockTime, ClubConfig, ClubError, ComputerClub, EventKind, InputEvent, Minutes, OutputEvent,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn at(s: &str) -> ClockTime {
    ClockTime::parse(s).unwrap()
}

fn open_club(tables: usize) -> ComputerClub {
    let config = ClubConfig::new(tables, 10, at("08:00"), at("19:00")).unwrap();
    ComputerClub::open(config).unwrap()
}

/// Feed lines and return the records emitted after the echo of each one
fn feed(club: &mut ComputerClub, lines: &[&str]) -> Vec<String> {
    let mut derived = Vec::new();
    for line in lines {
        let before = club.event_log().len();
        club.handle(InputEvent::parse(line).unwrap()).unwrap();
        derived.extend(
            club.event_log().events()[before + 1..]
                .iter()
                .map(|e| e.to_string()),
        );
    }
    derived
}

// ============================================================================
// Opening Hours
// ============================================================================

#[test]
fn test_event_before_opening() {
    let mut club = open_club(1);
    let derived = feed(&mut club, &["07:59 1 client1"]);

    assert_eq!(derived, vec!["07:59 13 NotOpenYet"]);
    assert!(!club.state().contains("client1"));
}

#[test]
fn test_event_after_closing() {
    let mut club = open_club(1);
    let derived = feed(&mut club, &["10:00 1 client1", "19:01 4 client1"]);

    assert_eq!(derived, vec!["19:01 13 NotOpenYet"]);
    assert!(club.state().contains("client1"));
}

// ============================================================================
// Arrival
// ============================================================================

#[test]
fn test_arrival_queues_client() {
    let mut club = open_club(2);
    let derived = feed(&mut club, &["08:48 1 client1", "09:41 1 client2"]);

    assert!(derived.is_empty());
    assert_eq!(
        club.state().queue().collect::<Vec<_>>(),
        vec!["client1", "client2"]
    );
}

#[test]
fn test_duplicate_arrival() {
    let mut club = open_club(2);
    let derived = feed(&mut club, &["08:48 1 client1", "09:41 1 client1"]);

    assert_eq!(derived, vec!["09:41 13 YouShallNotPass"]);
    assert_eq!(club.state().queue_len(), 1);
}

#[test]
fn test_duplicate_arrival_while_seated() {
    let mut club = open_club(2);
    let derived = feed(
        &mut club,
        &["08:48 1 client1", "08:50 2 client1 2", "09:41 1 client1"],
    );

    assert_eq!(derived, vec!["09:41 13 YouShallNotPass"]);
    assert_eq!(club.state().client("client1").unwrap().table(), Some(2));
}

// ============================================================================
// Sitting Down
// ============================================================================

#[test]
fn test_sit_unknown_client() {
    let mut club = open_club(2);
    let derived = feed(&mut club, &["09:00 2 ghost 1"]);

    assert_eq!(derived, vec!["09:00 13 ClientUnknown"]);
    assert_eq!(club.state().free_tables(), 2);
}

#[test]
fn test_sit_busy_table() {
    let mut club = open_club(2);
    let derived = feed(
        &mut club,
        &[
            "09:00 1 client1",
            "09:01 1 client2",
            "09:02 2 client1 1",
            "09:03 2 client2 1",
        ],
    );

    assert_eq!(derived, vec!["09:03 13 PlaceIsBusy"]);
    assert!(club.state().client("client2").unwrap().is_waiting());
}

#[test]
fn test_sit_at_own_table_is_busy() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &["09:00 1 client1", "09:01 2 client1 1", "09:30 2 client1 1"],
    );

    assert_eq!(derived, vec!["09:30 13 PlaceIsBusy"]);
    assert_eq!(
        club.state().client("client1").unwrap().session_start(),
        Some(at("09:01"))
    );
}

#[test]
fn test_change_tables_bills_first_session() {
    let mut club = open_club(2);
    let derived = feed(
        &mut club,
        &["09:00 1 client1", "09:00 2 client1 1", "10:30 2 client1 2"],
    );

    assert!(derived.is_empty());
    let state = club.state();
    assert!(state.table(1).unwrap().is_free());
    assert_eq!(state.table(1).unwrap().revenue(), 20);
    assert_eq!(state.table(1).unwrap().occupied(), Minutes::new(90));
    assert_eq!(state.table(2).unwrap().occupant(), Some("client1"));
    assert_eq!(state.free_tables(), 1);
}

// ============================================================================
// Waiting
// ============================================================================

#[test]
fn test_one_table_busy_wait_is_accepted() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &[
            "08:48 1 client1",
            "09:41 1 client2",
            "09:48 2 client1 1",
            "09:52 3 client2",
        ],
    );

    assert!(derived.is_empty());
    assert!(club.state().client("client2").unwrap().is_waiting());
}

#[test]
fn test_wait_with_free_table() {
    let mut club = open_club(2);
    let derived = feed(
        &mut club,
        &[
            "08:48 1 client1",
            "09:41 1 client2",
            "09:48 2 client1 1",
            "09:52 3 client2",
        ],
    );

    assert_eq!(derived, vec!["09:52 13 ICanWaitNoLonger"]);
    assert!(club.state().client("client2").unwrap().is_waiting());
    assert_eq!(club.state().free_tables(), 1);
}

#[test]
fn test_queue_overflow_forces_client_out() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &[
            "09:00 1 a",
            "09:01 2 a 1",
            "09:02 1 b",
            "09:03 1 c",
            "09:04 3 c",
        ],
    );

    assert_eq!(derived, vec!["09:04 11 c"]);
    assert!(!club.state().contains("c"));
    assert_eq!(club.state().queue().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn test_overflow_checked_before_free_table() {
    // Two tables, both free, three clients waiting: overflow wins
    let mut club = open_club(2);
    let derived = feed(
        &mut club,
        &["09:00 1 a", "09:01 1 b", "09:02 1 c", "09:03 3 a"],
    );

    assert_eq!(derived, vec!["09:03 11 a"]);
    assert_eq!(club.state().queue().collect::<Vec<_>>(), vec!["b", "c"]);
}

#[test]
fn test_overflow_bills_seated_client_without_reseating() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &["09:00 1 a", "09:00 2 a 1", "09:10 1 b", "09:20 1 c", "10:30 3 a"],
    );

    assert_eq!(derived, vec!["10:30 11 a"]);

    let table = club.state().table(1).unwrap();
    assert!(table.is_free());
    assert_eq!(table.revenue(), 20);
    assert_eq!(table.occupied(), Minutes::new(90));
    assert_eq!(table.occupied().to_string(), "01:30");

    assert_eq!(club.state().free_tables(), 1);
    assert_eq!(club.state().queue().collect::<Vec<_>>(), vec!["b", "c"]);
    assert!(club.event_log().events_of_kind(EventKind::ClientSeated).is_empty());
}

#[test]
fn test_wait_unknown_client() {
    let mut club = open_club(1);
    let derived = feed(&mut club, &["09:00 3 ghost"]);

    assert_eq!(derived, vec!["09:00 13 ClientUnknown"]);
}

// ============================================================================
// Leaving
// ============================================================================

#[test]
fn test_leave_unknown_client() {
    let mut club = open_club(1);
    let derived = feed(&mut club, &["09:00 4 ghost"]);

    assert_eq!(derived, vec!["09:00 13 ClientUnknown"]);
    assert_eq!(club.state().num_clients(), 0);
}

#[test]
fn test_leave_seats_head_of_queue() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &[
            "08:48 1 client1",
            "08:48 2 client1 1",
            "09:00 1 client2",
            "09:03 3 client2",
            "10:00 4 client1",
        ],
    );

    assert_eq!(derived, vec!["10:00 12 client2 1"]);

    let state = club.state();
    let table = state.table(1).unwrap();
    assert_eq!(table.revenue(), 20);
    assert_eq!(table.occupied().to_string(), "01:12");
    assert_eq!(table.occupant(), Some("client2"));
    assert_eq!(
        state.client("client2").unwrap().session_start(),
        Some(at("10:00"))
    );
    assert_eq!(state.free_tables(), 0);
    assert!(!state.contains("client1"));
}

#[test]
fn test_leave_with_empty_queue_frees_table() {
    let mut club = open_club(1);
    let derived = feed(
        &mut club,
        &["09:00 1 client1", "09:00 2 client1 1", "09:30 4 client1"],
    );

    assert!(derived.is_empty());
    assert_eq!(club.state().free_tables(), 1);
    assert_eq!(club.state().table(1).unwrap().revenue(), 10);
}

#[test]
fn test_waiting_client_leaves() {
    let mut club = open_club(1);
    let derived = feed(&mut club, &["09:00 1 client1", "09:30 4 client1"]);

    assert!(derived.is_empty());
    assert_eq!(club.state().num_clients(), 0);
    assert_eq!(club.state().queue_len(), 0);
    assert_eq!(club.state().free_tables(), 1);
}

// ============================================================================
// Full Day
// ============================================================================

#[test]
fn test_full_day_records() {
    let config = ClubConfig::new(3, 10, at("09:00"), at("19:00")).unwrap();
    let mut club = ComputerClub::open(config).unwrap();
    let lines = [
        "08:48 1 client1",
        "09:41 1 client1",
        "09:48 1 client2",
        "09:52 3 client1",
        "09:54 2 client1 1",
        "10:25 2 client2 2",
        "10:58 1 client3",
        "10:59 2 client3 3",
        "11:30 1 client4",
        "11:35 2 client4 2",
        "11:45 3 client4",
        "12:33 4 client1",
        "12:43 4 client2",
        "15:52 4 client4",
    ];
    let derived = feed(&mut club, &lines);

    assert_eq!(
        derived,
        vec![
            "08:48 13 NotOpenYet",
            "09:52 13 ICanWaitNoLonger",
            "11:35 13 PlaceIsBusy",
            "12:33 12 client4 1",
        ]
    );

    let report = club.close().unwrap();
    let events = report.events.events();

    assert_eq!(events.first(), Some(&OutputEvent::Opened { time: at("09:00") }));
    assert_eq!(report.events.events_of_kind(EventKind::ClientForcedOut).len(), 1);
    assert_eq!(
        report.events.errors(),
        vec![
            ClubError::NotOpenYet,
            ClubError::ICanWaitNoLonger,
            ClubError::PlaceIsBusy
        ]
    );

    let tables: Vec<String> = report
        .table_summaries()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(tables, vec!["1 70 05:58", "2 30 02:18", "3 90 08:01"]);
    assert_eq!(report.total_revenue(), 190);
}
