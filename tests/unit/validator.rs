use super::*;
use wfh_scheduler::db::enums::{RequestKind, WfhDuration, WfhStatus};
use wfh_scheduler::error::AppError;
use wfh_scheduler::services::RequestsService;
use wfh_scheduler::store::WfhStore;

#[test]
fn new_request_is_pending_and_dated_today() {
    let mut store = org();
    let request =
        RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay))
            .unwrap();
    assert_eq!(request.status, WfhStatus::Pending);
    assert_eq!(request.request_date, today());
    assert_eq!(request.manager_id, MANAGER);
    assert_eq!(request.reason_for_applying, "Home office day");
}

#[test]
fn start_date_outside_booking_window_is_refused() {
    let mut store = org();
    let too_late = draft(1, date(2025, 5, 31), None, WfhDuration::FullDay);
    let too_early = draft(1, date(2024, 12, 30), None, WfhDuration::FullDay);
    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &too_late),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &too_early),
        Err(AppError::Validation { .. })
    ));
    assert!(
        RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 5, 30), None, WfhDuration::FullDay))
            .is_ok()
    );
}

#[test]
fn end_date_must_be_after_start_and_in_window() {
    let mut store = org();
    let same_day = draft(1, date(2025, 3, 3), Some(date(2025, 3, 3)), WfhDuration::FullDay);
    let beyond = draft(1, date(2025, 3, 3), Some(date(2025, 6, 2)), WfhDuration::FullDay);
    assert!(RequestsService::create(&mut store, &ctx(), &same_day).is_err());
    assert!(RequestsService::create(&mut store, &ctx(), &beyond).is_err());
    assert_eq!(store.request_count(), 0);
}

#[test]
fn blank_reason_is_refused() {
    let mut store = org();
    let mut blank = draft(1, date(2025, 3, 3), None, WfhDuration::FullDay);
    blank.reason = "  ".to_string();
    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &blank),
        Err(AppError::Validation { .. })
    ));
}

#[test]
fn second_single_day_request_for_same_date_is_a_duplicate() {
    let mut store = org();
    let first = draft(1, date(2025, 3, 3), None, WfhDuration::HalfDayAm);
    RequestsService::create(&mut store, &ctx(), &first).unwrap();

    let again = draft(1, date(2025, 3, 3), None, WfhDuration::HalfDayPm);
    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &again),
        Err(AppError::Duplicate { .. })
    ));

    // Another staff member on the same date is unaffected.
    assert!(RequestsService::create(&mut store, &ctx(), &draft(2, date(2025, 3, 3), None, WfhDuration::FullDay)).is_ok());
}

#[test]
fn recurring_requests_do_not_block_the_duplicate_check() {
    let mut store = org();
    let recurring = draft(1, date(2025, 3, 3), Some(date(2025, 3, 17)), WfhDuration::FullDay);
    RequestsService::create(&mut store, &ctx(), &recurring).unwrap();
    assert!(RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).is_ok());
}

#[test]
fn finalized_requests_do_not_block_the_duplicate_check() {
    let mut store = org();
    let first = RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();
    store
        .update_request_status(first.id, WfhStatus::Rejected, Some("Team offsite"))
        .unwrap();
    assert!(RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).is_ok());
}

#[test]
fn meta_requests_coexist_with_the_day_they_target() {
    let mut store = org();
    RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();

    let mut withdrawal = draft(1, date(2025, 3, 3), None, WfhDuration::FullDay);
    withdrawal.kind = RequestKind::Withdrawal;
    let created = RequestsService::create(&mut store, &ctx(), &withdrawal).unwrap();
    assert_eq!(created.kind, RequestKind::Withdrawal);
}

#[test]
fn cancel_markers_cannot_be_created() {
    let mut store = org();
    let mut cancel = draft(1, date(2025, 3, 3), None, WfhDuration::FullDay);
    cancel.kind = RequestKind::Cancellation;

    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &cancel),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        SchedulesService::submit(&mut store, &ctx(), &cancel),
        Err(AppError::Validation { .. })
    ));
    assert_eq!(store.request_count(), 0);
}

#[test]
fn unknown_staff_is_not_found() {
    let mut store = org();
    assert!(matches!(
        RequestsService::create(&mut store, &ctx(), &draft(4242, date(2025, 3, 3), None, WfhDuration::FullDay)),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn staff_without_manager_address_themselves() {
    let mut store = org();
    let request =
        RequestsService::create(&mut store, &ctx(), &draft(LONER, date(2025, 3, 3), None, WfhDuration::FullDay))
            .unwrap();
    assert_eq!(request.manager_id, LONER);
}

#[test]
fn manager_and_staff_listings() {
    let mut store = org();
    let a = RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 5), None, WfhDuration::FullDay)).unwrap();
    let b = RequestsService::create(&mut store, &ctx(), &draft(2, date(2025, 3, 4), None, WfhDuration::FullDay)).unwrap();
    let c = RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 6), None, WfhDuration::FullDay)).unwrap();
    store.update_request_status(c.id, WfhStatus::Approved, None).unwrap();

    let pending: Vec<i64> = RequestsService::pending_for_manager(&mut store, MANAGER)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(pending, vec![b.id, a.id]);

    let mine: Vec<i64> = RequestsService::requests_for_staff(&mut store, 1)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(mine, vec![c.id, a.id]);
}
