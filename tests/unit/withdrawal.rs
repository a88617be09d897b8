use super::*;
use wfh_scheduler::db::models::WithdrawalNote;
use wfh_scheduler::error::AppError;
use wfh_scheduler::store::WfhStore;

#[test]
fn withdrawal_parks_the_original_request() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);

    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();
    assert_eq!(withdrawal.kind, RequestKind::Withdrawal);
    assert_eq!(withdrawal.status, WfhStatus::Pending);
    assert_eq!(withdrawal.start_date, entry.date);
    assert_eq!(withdrawal.duration, entry.duration);

    let parked = schedule(&store, entry.id);
    assert_eq!(parked.request_id, withdrawal.id);
    assert_eq!(parked.parked_request_id(), Some(original.id));
    assert_eq!(parked.status, WfhStatus::Approved);

    assert!(LifecycleService::has_pending_withdrawal(&mut store, 1, date(2025, 3, 3)).unwrap());
    assert!(!LifecycleService::has_pending_withdrawal(&mut store, 1, date(2025, 3, 4)).unwrap());
    let under_original: Vec<i64> = LifecycleService::schedules_parked_under(&mut store, original.id)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(under_original, vec![entry.id]);
    assert!(LifecycleService::schedules_for_request(&mut store, original.id).unwrap().is_empty());
}

#[test]
fn withdrawal_window_boundary_is_fourteen_days() {
    let mut store = org();
    let ctx = ctx();
    let (_, inside) = approved_day(&mut store, &ctx, 1, date(2025, 3, 15), WfhDuration::FullDay);
    let (_, outside) = approved_day(&mut store, &ctx, 1, date(2025, 3, 16), WfhDuration::FullDay);

    assert!(LifecycleService::create_withdrawal(&mut store, &ctx, inside.id, "Trip cancelled").is_ok());
    let before = store.request_count();
    assert!(matches!(
        LifecycleService::create_withdrawal(&mut store, &ctx, outside.id, "Trip cancelled"),
        Err(AppError::OutOfRange { .. })
    ));
    assert_eq!(store.request_count(), before);
    assert_eq!(schedule(&store, outside.id), outside);
}

#[test]
fn rejected_withdrawal_restores_the_entry_exactly() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::HalfDayPm);
    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();

    let rejected =
        LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Rejected, Some("Needed on call"))
            .unwrap();
    assert_eq!(rejected.status, WfhStatus::Rejected);
    assert_eq!(rejected.reason_for_rejection.as_deref(), Some("Needed on call"));

    let restored = schedule(&store, entry.id);
    assert_eq!(restored.request_id, entry.request_id);
    assert_eq!(restored.status, entry.status);
    assert_eq!(restored.reason_for_withdrawing, entry.reason_for_withdrawing);
    assert_eq!(
        store.find_request(original.id).unwrap().unwrap().status,
        WfhStatus::Approved
    );
    assert!(!LifecycleService::has_pending_withdrawal(&mut store, 1, date(2025, 3, 3)).unwrap());
}

#[test]
fn approved_withdrawal_withdraws_entry_and_single_day_request() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);
    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();

    let resolved =
        LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Approved, None).unwrap();
    assert_eq!(resolved.status, WfhStatus::Withdrawn);

    let withdrawn = schedule(&store, entry.id);
    assert_eq!(withdrawn.status, WfhStatus::Withdrawn);
    assert_eq!(withdrawn.request_id, withdrawal.id);
    assert_eq!(
        withdrawn.reason_for_withdrawing,
        Some(WithdrawalNote::Reason("Client visit".to_string()))
    );
    assert_eq!(
        store.find_request(original.id).unwrap().unwrap().status,
        WfhStatus::Withdrawn
    );
}

#[test]
fn approved_withdrawal_keeps_a_recurring_request_approved() {
    let mut store = org();
    let ctx = ctx();
    let submission = SchedulesService::submit(
        &mut store,
        &ctx,
        &draft(1, date(2025, 3, 3), Some(date(2025, 3, 17)), WfhDuration::FullDay),
    )
    .unwrap();
    LifecycleService::set_status(&mut store, &ctx, submission.request.id, WfhStatus::Approved, None).unwrap();

    let target = submission.schedules[1].id;
    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, target, "Moving house").unwrap();
    LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Approved, None).unwrap();

    assert_eq!(
        store.find_request(submission.request.id).unwrap().unwrap().status,
        WfhStatus::Approved
    );
    let remaining = store.schedules_for_request(submission.request.id).unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|s| s.status == WfhStatus::Approved));
    assert_eq!(schedule(&store, target).status, WfhStatus::Withdrawn);
}

#[test]
fn cancelled_withdrawal_restores_the_entry() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);
    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();

    let cancelled =
        LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Cancelled, None).unwrap();
    assert_eq!(cancelled.status, WfhStatus::Cancelled);
    let restored = schedule(&store, entry.id);
    assert_eq!(restored.request_id, original.id);
    assert_eq!(restored.reason_for_withdrawing, None);
}

#[test]
fn entry_with_pending_withdrawal_cannot_be_withdrawn_again() {
    let mut store = org();
    let ctx = ctx();
    let (_, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);
    LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();
    let before = store.request_count();

    assert!(matches!(
        LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit again"),
        Err(AppError::Duplicate { .. })
    ));
    assert_eq!(store.request_count(), before);
}

#[test]
fn only_approved_entries_can_be_withdrawn() {
    let mut store = org();
    let ctx = ctx();
    let submission =
        SchedulesService::submit(&mut store, &ctx, &draft(1, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();

    assert!(matches!(
        LifecycleService::create_withdrawal(&mut store, &ctx, submission.schedules[0].id, "Changed my mind"),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        LifecycleService::create_withdrawal(&mut store, &ctx, 9999, "Changed my mind"),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn storage_failure_during_resolution_rolls_everything_back() {
    let mut store = org();
    let ctx = ctx();
    let (original, entry) = approved_day(&mut store, &ctx, 1, date(2025, 3, 3), WfhDuration::FullDay);
    let withdrawal = LifecycleService::create_withdrawal(&mut store, &ctx, entry.id, "Client visit").unwrap();
    let parked = schedule(&store, entry.id);

    store.fail_next_schedule_save();
    assert!(LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Approved, None).is_err());

    assert_eq!(schedule(&store, entry.id), parked);
    assert_eq!(
        store.find_request(withdrawal.id).unwrap().unwrap().status,
        WfhStatus::Pending
    );
    assert_eq!(
        store.find_request(original.id).unwrap().unwrap().status,
        WfhStatus::Approved
    );

    // The failure was transient; the retry goes through.
    LifecycleService::set_status(&mut store, &ctx, withdrawal.id, WfhStatus::Approved, None).unwrap();
    assert_eq!(schedule(&store, entry.id).status, WfhStatus::Withdrawn);
}
