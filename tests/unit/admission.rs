use super::*;
use wfh_scheduler::error::AppError;
use wfh_scheduler::services::{Admission, AdmissionService};

#[test]
fn team_of_two_without_approvals_admits() {
    let mut store = org();
    let decision =
        AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), WfhDuration::HalfDayAm).unwrap();
    assert_eq!(
        decision,
        Admission::Admitted {
            team_size: 2,
            remote_count: 0
        }
    );
}

#[test]
fn team_of_two_with_one_approval_of_the_same_half_denies() {
    let mut store = org();
    approved_day(&mut store, &ctx(), 2, date(2025, 3, 3), WfhDuration::HalfDayAm);

    let decision =
        AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), WfhDuration::HalfDayAm).unwrap();
    assert_eq!(
        decision,
        Admission::Denied {
            team_size: 2,
            remote_count: 1
        }
    );
}

#[test]
fn opposite_half_day_does_not_count() {
    let mut store = org();
    approved_day(&mut store, &ctx(), 2, date(2025, 3, 3), WfhDuration::HalfDayAm);

    let decision =
        AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), WfhDuration::HalfDayPm).unwrap();
    assert!(decision.is_admitted());
}

#[test]
fn full_day_counts_against_both_halves() {
    let mut store = org();
    approved_day(&mut store, &ctx(), 2, date(2025, 3, 3), WfhDuration::FullDay);

    for duration in [WfhDuration::HalfDayAm, WfhDuration::HalfDayPm, WfhDuration::FullDay] {
        let decision = AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), duration).unwrap();
        assert!(!decision.is_admitted(), "{} should be denied", duration);
    }
}

#[test]
fn pending_entries_do_not_consume_capacity() {
    let mut store = org();
    SchedulesService::submit(&mut store, &ctx(), &draft(2, date(2025, 3, 3), None, WfhDuration::FullDay)).unwrap();

    let decision =
        AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), WfhDuration::FullDay).unwrap();
    assert!(decision.is_admitted());
}

#[test]
fn other_teams_are_not_counted() {
    let mut store = org();
    approved_day(&mut store, &ctx(), 3, date(2025, 3, 3), WfhDuration::FullDay);

    let decision =
        AdmissionService::check(&mut store, &ctx(), 1, date(2025, 3, 3), WfhDuration::FullDay).unwrap();
    assert!(decision.is_admitted());
}

#[test]
fn empty_team_is_admitted() {
    let mut store = org();
    let decision =
        AdmissionService::check(&mut store, &ctx(), LONER, date(2025, 3, 3), WfhDuration::FullDay).unwrap();
    assert_eq!(
        decision,
        Admission::Admitted {
            team_size: 0,
            remote_count: 0
        }
    );
}

#[test]
fn unknown_staff_is_not_found() {
    let mut store = org();
    assert!(matches!(
        AdmissionService::check(&mut store, &ctx(), 4242, date(2025, 3, 3), WfhDuration::FullDay),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn violations_collect_every_denied_date() {
    let mut store = org();
    approved_day(&mut store, &ctx(), 2, date(2025, 3, 3), WfhDuration::FullDay);
    approved_day(&mut store, &ctx(), 2, date(2025, 3, 17), WfhDuration::FullDay);

    let dates = [date(2025, 3, 3), date(2025, 3, 10), date(2025, 3, 17)];
    let violated =
        AdmissionService::violations(&mut store, &ctx(), 1, &dates, WfhDuration::FullDay).unwrap();
    assert_eq!(violated, vec![date(2025, 3, 3), date(2025, 3, 17)]);
}
