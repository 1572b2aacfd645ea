use super::*;
use crate::test_support::{paid_absent, paid_present, unpaid_absent};

fn loaded_store() -> RosterStore {
    let mut store = RosterStore::new();
    store
        .load(vec![
            paid_absent("1", "Ayu"),
            unpaid_absent("2", "Budi"),
            paid_present("3", "Citra"),
        ])
        .expect("load");
    store
}

#[test]
fn starts_empty() {
    let store = RosterStore::new();
    assert!(store.participants().is_empty());
    assert!(store.filtered().is_empty());
    assert!(store.filters().is_empty());
}

#[test]
fn load_replaces_roster_wholesale() {
    let mut store = loaded_store();
    let rows = store.load(vec![unpaid_absent("9", "Zaki")]).expect("reload");
    assert_eq!(rows, 1);
    assert_eq!(store.participants(), &[unpaid_absent("9", "Zaki")]);
}

#[test]
fn load_rejects_duplicate_ids_and_keeps_previous_roster() {
    let mut store = loaded_store();
    let before = store.participants().to_vec();

    let err = store
        .load(vec![paid_absent("7", "Gita"), unpaid_absent("7", "Gita")])
        .expect_err("must fail");

    assert_eq!(err, RosterError::DuplicateId(ParticipantId::from("7")));
    assert_eq!(store.participants(), before.as_slice());
}

#[test]
fn set_payment_status_updates_only_matching_row() {
    let mut store = loaded_store();
    let touched = store.set_payment_status(&ParticipantId::from("2"), PaymentStatus::Paid);

    assert_eq!(touched, 1);
    let row = store.get(&ParticipantId::from("2")).expect("row");
    assert_eq!(row.payment_status, PaymentStatus::Paid);
    assert_eq!(row.name, "Budi");
    assert_eq!(
        row.attendance_status,
        AttendanceStatus::from("Belum Hadir")
    );
}

#[test]
fn set_payment_status_for_missing_id_is_noop() {
    let mut store = loaded_store();
    let before = store.participants().to_vec();

    let touched = store.set_payment_status(&ParticipantId::from("nonexistent"), PaymentStatus::Paid);

    assert_eq!(touched, 0);
    assert_eq!(store.participants(), before.as_slice());
}

#[test]
fn set_attendance_confirmed_marks_present() {
    let mut store = loaded_store();
    assert_eq!(store.set_attendance_confirmed(&ParticipantId::from("1")), 1);
    assert!(store.get(&ParticipantId::from("1")).expect("row").is_present());
    assert_eq!(store.set_attendance_confirmed(&ParticipantId::from("missing")), 0);
}

#[test]
fn selecting_active_filter_again_clears_it() {
    let mut store = loaded_store();

    store.set_filter(FilterChange::Payment(Some(PaymentStatus::Paid)));
    assert_eq!(store.filters().payment, Some(PaymentStatus::Paid));

    store.set_filter(FilterChange::Payment(Some(PaymentStatus::Paid)));
    assert_eq!(store.filters().payment, None);
}

#[test]
fn selecting_other_filter_value_replaces_it() {
    let mut store = loaded_store();

    store.set_filter(FilterChange::Payment(Some(PaymentStatus::Paid)));
    store.set_filter(FilterChange::Payment(Some(PaymentStatus::Unpaid)));
    assert_eq!(store.filters().payment, Some(PaymentStatus::Unpaid));

    store.set_filter(FilterChange::Attendance(Some(AttendanceStatus::Present)));
    store.set_filter(FilterChange::Attendance(None));
    assert_eq!(store.filters().attendance, None);
    assert_eq!(store.filters().payment, Some(PaymentStatus::Unpaid));

    store.clear_filters();
    assert!(store.filters().is_empty());
}

#[test]
fn filtered_view_follows_roster_mutations() {
    let mut store = loaded_store();
    store.set_filter(FilterChange::Attendance(Some(AttendanceStatus::Present)));
    assert_eq!(store.filtered().len(), 1);

    store.set_attendance_confirmed(&ParticipantId::from("1"));
    let names: Vec<&str> = store.filtered().iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["Ayu", "Citra"]);
}

#[test]
fn can_confirm_requires_paid_absent_and_idle() {
    let mut store = loaded_store();
    let ayu = ParticipantId::from("1");

    assert!(store.can_confirm(&ayu));
    assert!(!store.can_confirm(&ParticipantId::from("2")));
    assert!(!store.can_confirm(&ParticipantId::from("3")));
    assert!(!store.can_confirm(&ParticipantId::from("missing")));

    assert!(store.begin_confirm(&ayu));
    assert!(!store.begin_confirm(&ayu));
    assert!(!store.can_confirm(&ayu));

    store.settle_confirm(&ayu);
    assert!(!store.is_confirm_inflight(&ayu));
    assert!(store.can_confirm(&ayu));
}

#[test]
fn reconcile_takes_server_statuses_and_clears_tentative() {
    let mut store = loaded_store();
    let ayu = ParticipantId::from("1");
    store.set_attendance_confirmed(&ayu);
    store.mark_tentative(&ayu);
    assert!(store.is_tentative(&ayu));

    let echoed = Participant::new("1", "Ayu Lestari", PaymentStatus::Paid, "Hadir");
    assert_eq!(store.reconcile(&echoed), 1);

    let row = store.get(&ayu).expect("row");
    assert!(row.is_present());
    assert_eq!(row.name, "Ayu");
    assert!(!store.is_tentative(&ayu));
}

#[test]
fn reload_clears_tentative_but_keeps_inflight_for_remaining_rows() {
    let mut store = loaded_store();
    let ayu = ParticipantId::from("1");
    let citra = ParticipantId::from("3");
    store.begin_confirm(&ayu);
    store.begin_confirm(&citra);
    store.mark_tentative(&ayu);

    store.load(vec![paid_absent("1", "Ayu")]).expect("reload");

    assert!(store.is_confirm_inflight(&ayu));
    assert!(!store.can_confirm(&ayu));
    assert!(!store.is_confirm_inflight(&citra));
    assert!(!store.is_tentative(&ayu));

    store.settle_confirm(&ayu);
    assert!(store.can_confirm(&ayu));
}

#[test]
fn payment_revert_skips_rows_changed_since() {
    let mut store = loaded_store();
    let budi = ParticipantId::from("2");

    store.set_payment_status(&budi, PaymentStatus::Paid);
    let stamp = store.payment_stamp(&budi).expect("stamp");

    store.set_payment_status(&budi, PaymentStatus::Unpaid);
    store.set_payment_status(&budi, PaymentStatus::Paid);
    assert_ne!(store.payment_stamp(&budi), Some(stamp));
    assert_eq!(
        store.revert_payment_status(&budi, stamp, PaymentStatus::Unpaid),
        0
    );
    assert_eq!(
        store.get(&budi).expect("row").payment_status,
        PaymentStatus::Paid
    );

    let latest = store.payment_stamp(&budi).expect("stamp");
    assert_eq!(
        store.revert_payment_status(&budi, latest, PaymentStatus::Unpaid),
        1
    );
    assert_eq!(
        store.get(&budi).expect("row").payment_status,
        PaymentStatus::Unpaid
    );
}

#[test]
fn payment_revert_after_reload_is_skipped() {
    let mut store = loaded_store();
    let budi = ParticipantId::from("2");
    store.set_payment_status(&budi, PaymentStatus::Paid);
    let stamp = store.payment_stamp(&budi).expect("stamp");

    store
        .load(vec![Participant::new("2", "Budi", PaymentStatus::Paid, "Belum Hadir")])
        .expect("reload");

    assert_eq!(store.payment_stamp(&budi), None);
    assert_eq!(
        store.revert_payment_status(&budi, stamp, PaymentStatus::Unpaid),
        0
    );
    assert!(store.get(&budi).expect("row").is_paid());
}
