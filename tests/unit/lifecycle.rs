use super::*;
use wfh_scheduler::error::AppError;
use wfh_scheduler::db::models::NewWfhRequest;
use wfh_scheduler::services::RequestsService;
use wfh_scheduler::store::WfhStore;

#[test]
fn approval_moves_pending_entries_to_approved() {
    let mut store = org();
    let ctx = ctx();
    let submission =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 4), None, WfhDuration::HalfDayAm))
            .unwrap();

    let approved =
        LifecycleService::set_status(&mut store, &ctx, submission.request.id, WfhStatus::Approved, None).unwrap();
    assert_eq!(approved.status, WfhStatus::Approved);
    assert_eq!(
        schedule(&store, submission.schedules[0].id).status,
        WfhStatus::Approved
    );
}

#[test]
fn rejection_records_the_reason() {
    let mut store = org();
    let ctx = ctx();
    let submission = SchedulesService::submit(
        &mut store,
        &ctx,
        &draft(1, date(2025, 3, 4), Some(date(2025, 3, 11)), WfhDuration::FullDay),
    )
    .unwrap();

    let rejected = LifecycleService::set_status(
        &mut store,
        &ctx,
        submission.request.id,
        WfhStatus::Rejected,
        Some("Quarter close"),
    )
    .unwrap();
    assert_eq!(rejected.status, WfhStatus::Rejected);
    assert_eq!(rejected.reason_for_rejection.as_deref(), Some("Quarter close"));
    let entries = store.schedules_for_request(submission.request.id).unwrap();
    assert!(entries.iter().all(|s| s.status == WfhStatus::Rejected));
}

#[test]
fn cancellation_skips_capacity_checks() {
    let mut store = org();
    let ctx = ctx();
    approved_day(&mut store, &ctx, 2, date(2025, 3, 4), WfhDuration::FullDay);
    let submission =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 4), None, WfhDuration::FullDay)).unwrap();

    let cancelled =
        LifecycleService::set_status(&mut store, &ctx, submission.request.id, WfhStatus::Cancelled, None).unwrap();
    assert_eq!(cancelled.status, WfhStatus::Cancelled);
    assert_eq!(
        schedule(&store, submission.schedules[0].id).status,
        WfhStatus::Cancelled
    );
}

#[test]
fn capacity_violation_lists_dates_and_changes_nothing() {
    let mut store = org();
    let ctx = ctx();
    approved_day(&mut store, &ctx, 2, date(2025, 3, 3), WfhDuration::FullDay);
    approved_day(&mut store, &ctx, 2, date(2025, 3, 17), WfhDuration::FullDay);
    let submission = SchedulesService::submit(
        &mut store,
        &ctx,
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 24)), WfhDuration::FullDay),
    )
    .unwrap();

    let err = LifecycleService::set_status(&mut store, &ctx, submission.request.id, WfhStatus::Approved, None)
        .unwrap_err();
    match &err {
        AppError::PolicyViolation { dates } => {
            assert_eq!(dates, &vec![date(2025, 3, 3), date(2025, 3, 17)])
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Cannot approve request due to policy violation on date(s) 03-03-2025,17-03-2025"
    );

    let request = store.find_request(submission.request.id).unwrap().unwrap();
    assert_eq!(request.status, WfhStatus::Pending);
    let entries = store.schedules_for_request(submission.request.id).unwrap();
    assert!(entries.iter().all(|s| s.status == WfhStatus::Pending));
}

#[test]
fn past_occurrences_are_not_capacity_checked() {
    let mut store = org();
    let earlier = ctx_on(date(2025, 2, 20));
    approved_day(&mut store, &earlier, 2, date(2025, 2, 24), WfhDuration::FullDay);
    let submission = SchedulesService::submit(
        &mut store,
        &earlier,
        &draft(1, date(2025, 2, 24), Some(date(2025, 3, 3)), WfhDuration::FullDay),
    )
    .unwrap();

    // Reviewed after 2025-02-24 has passed, so only 2025-03-03 is checked.
    let approved =
        LifecycleService::set_status(&mut store, &ctx(), submission.request.id, WfhStatus::Approved, None).unwrap();
    assert_eq!(approved.status, WfhStatus::Approved);
}

#[test]
fn requests_older_than_the_lookback_cannot_be_approved() {
    let mut store = org();
    let request =
        RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 1, 2), None, WfhDuration::FullDay)).unwrap();

    let later = ctx_on(date(2025, 3, 10));
    assert!(matches!(
        LifecycleService::set_status(&mut store, &later, request.id, WfhStatus::Approved, None),
        Err(AppError::Validation { .. })
    ));
    // Rejecting it is still allowed.
    assert!(LifecycleService::set_status(&mut store, &later, request.id, WfhStatus::Rejected, None).is_ok());
}

#[test]
fn only_pending_requests_can_be_finalized() {
    let mut store = org();
    let ctx = ctx();
    let (request, _) = approved_day(&mut store, &ctx, 1, date(2025, 3, 4), WfhDuration::FullDay);

    for target in [WfhStatus::Approved, WfhStatus::Rejected, WfhStatus::Cancelled] {
        assert!(matches!(
            LifecycleService::set_status(&mut store, &ctx, request.id, target, None),
            Err(AppError::Validation { .. })
        ));
    }
}

#[test]
fn sweeper_and_withdrawal_statuses_are_not_public_targets() {
    let mut store = org();
    let ctx = ctx();
    let submission =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 4), None, WfhDuration::FullDay)).unwrap();

    for target in [WfhStatus::Expired, WfhStatus::Withdrawn, WfhStatus::Pending] {
        assert!(matches!(
            LifecycleService::set_status(&mut store, &ctx, submission.request.id, target, None),
            Err(AppError::Validation { .. })
        ));
    }
}

#[test]
fn unknown_request_is_not_found() {
    let mut store = org();
    assert!(matches!(
        LifecycleService::set_status(&mut store, &ctx(), 404, WfhStatus::Approved, None),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn stored_cancel_markers_are_not_resolved() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);
    let marker = store
        .insert_request(&NewWfhRequest {
            staff_id: 1,
            manager_id: MANAGER,
            request_date: today(),
            start_date: date(2025, 3, 3),
            end_date: None,
            kind: RequestKind::Cancellation,
            duration: WfhDuration::FullDay,
            status: WfhStatus::Pending,
            reason_for_applying: "Not needed".to_string(),
        })
        .unwrap();

    for target in [WfhStatus::Approved, WfhStatus::Rejected, WfhStatus::Cancelled] {
        assert!(matches!(
            LifecycleService::set_status(&mut store, &ctx, marker.id, target, None),
            Err(AppError::Validation { .. })
        ));
    }
    assert_eq!(store.find_request(marker.id).unwrap().unwrap().status, WfhStatus::Pending);
    assert_eq!(store.find_request(original.id).unwrap().unwrap().status, WfhStatus::Approved);
    assert_eq!(schedule(&store, entry.id), entry);
}
