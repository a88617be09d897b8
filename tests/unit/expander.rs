use super::*;
use wfh_scheduler::error::AppError;
use wfh_scheduler::services::{RequestsService, SchedulesService};
use wfh_scheduler::store::WfhStore;

#[test]
fn recurring_request_expands_weekly_and_approves_end_to_end() {
    let mut store = org();
    let ctx = ctx();
    let submission = SchedulesService::submit(
        &mut store,
        &ctx,
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 24)), WfhDuration::FullDay),
    )
    .unwrap();

    let dates: Vec<NaiveDate> = submission.schedules.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 3, 3), date(2025, 3, 10), date(2025, 3, 17), date(2025, 3, 24)]
    );
    assert!(submission
        .schedules
        .iter()
        .all(|s| s.status == WfhStatus::Pending && s.request_id == submission.request.id));

    let approved =
        LifecycleService::set_status(&mut store, &ctx, submission.request.id, WfhStatus::Approved, None).unwrap();
    assert_eq!(approved.status, WfhStatus::Approved);
    let entries = store.schedules_for_request(submission.request.id).unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|s| s.status == WfhStatus::Approved));
}

#[test]
fn entries_snapshot_department_and_position() {
    let mut store = org();
    let submission =
        SchedulesService::submit(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::HalfDayPm))
            .unwrap();
    let entry = &submission.schedules[0];
    assert_eq!(entry.dept, "Engineering");
    assert_eq!(entry.position, "Developer");
    assert_eq!(entry.manager_id, MANAGER);
    assert_eq!(entry.duration, WfhDuration::HalfDayPm);
}

#[test]
fn occupied_dates_are_skipped() {
    let mut store = org();
    SchedulesService::submit(&mut store, &ctx(), &draft(1, date(2025, 3, 10), None, WfhDuration::HalfDayAm)).unwrap();

    let submission = SchedulesService::submit(
        &mut store,
        &ctx(),
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 24)), WfhDuration::FullDay),
    )
    .unwrap();
    let dates: Vec<NaiveDate> = submission.schedules.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2025, 3, 3), date(2025, 3, 17), date(2025, 3, 24)]);
}

#[test]
fn submit_leaves_nothing_behind_when_every_date_is_taken() {
    let mut store = org();
    SchedulesService::submit(
        &mut store,
        &ctx(),
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 10)), WfhDuration::FullDay),
    )
    .unwrap();
    assert_eq!(store.request_count(), 1);

    let err = SchedulesService::submit(
        &mut store,
        &ctx(),
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 9)), WfhDuration::FullDay),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::EmptySchedule { .. }));
    assert_eq!(store.request_count(), 1);
    assert_eq!(store.all_schedules().len(), 2);
}

#[test]
fn standalone_expand_deletes_a_request_it_cannot_schedule() {
    let mut store = org();
    SchedulesService::submit(
        &mut store,
        &ctx(),
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 10)), WfhDuration::FullDay),
    )
    .unwrap();
    let orphan =
        RequestsService::create(&mut store, &ctx(), &draft(1, date(2025, 3, 3), None, WfhDuration::HalfDayAm))
            .unwrap();

    let err = SchedulesService::expand(&mut store, orphan.id).unwrap_err();
    assert!(matches!(err, AppError::EmptySchedule { request_id } if request_id == orphan.id));
    assert!(store.find_request(orphan.id).unwrap().is_none());
}

#[test]
fn standalone_expand_creates_entries_for_a_fresh_request() {
    let mut store = org();
    let request = RequestsService::create(
        &mut store,
        &ctx(),
        &draft(2, date(2025, 3, 4), Some(date(2025, 3, 18)), WfhDuration::HalfDayAm),
    )
    .unwrap();

    let entries = SchedulesService::expand(&mut store, request.id).unwrap();
    assert_eq!(entries.len(), 3);

    // A second expansion would see its own entries as conflicts.
    assert!(matches!(
        SchedulesService::expand(&mut store, request.id),
        Err(AppError::Validation { .. })
    ));
    assert!(store.find_request(request.id).unwrap().is_some());
}

#[test]
fn rejected_entries_free_their_date() {
    let mut store = org();
    let ctx = ctx();
    let first =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();
    LifecycleService::set_status(&mut store, &ctx, first.request.id, WfhStatus::Rejected, Some("Release week"))
        .unwrap();

    let second =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();
    assert_eq!(second.schedules.len(), 1);
}

#[test]
fn expanding_unknown_or_meta_requests_fails() {
    let mut store = org();
    assert!(matches!(
        SchedulesService::expand(&mut store, 77),
        Err(AppError::NotFound { .. })
    ));

    let mut withdrawal = draft(1, date(2025, 3, 3), None, WfhDuration::FullDay);
    withdrawal.kind = RequestKind::Withdrawal;
    assert!(matches!(
        SchedulesService::submit(&mut store, &ctx(), &withdrawal),
        Err(AppError::Validation { .. })
    ));
    let meta = RequestsService::create(&mut store, &ctx(), &withdrawal).unwrap();
    assert!(matches!(
        SchedulesService::expand(&mut store, meta.id),
        Err(AppError::Validation { .. })
    ));
}
