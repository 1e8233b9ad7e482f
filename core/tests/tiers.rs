//! Operator tier tests: free search, backlog candidates, departure selection.

use helpdesk_core::{
    config::SlaPolicy,
    routing::sla_drop_applies,
    tier::{OperatorState, OperatorTier, TierSet},
    Job, RequestType, SimError,
};

fn busy_tier(kind: RequestType, departures: &[Option<f64>]) -> OperatorTier {
    let mut tier = OperatorTier::new(kind, departures.len());
    for (index, until) in departures.iter().enumerate() {
        if let Some(until) = until {
            tier.begin_service(index, *until, kind);
        }
    }
    tier
}

#[test]
fn new_tier_is_all_free() {
    let tier = OperatorTier::new(RequestType::Primary, 3);
    assert_eq!(tier.len(), 3);
    assert!(tier.slots().iter().all(|s| s.is_free()));
    assert_eq!(tier.first_free(), Some(0));
    assert_eq!(tier.earliest_departure(), None);
}

/// A busy operator is not free even while its backlog slot is empty.
#[test]
fn free_requires_idle_and_empty_backlog() {
    let mut tier = busy_tier(RequestType::Primary, &[Some(600.0), None]);
    assert_eq!(tier.first_free(), Some(1));

    tier.begin_service(1, 700.0, RequestType::Primary);
    assert_eq!(tier.first_free(), None);

    let (_, queued) = tier.complete(1);
    assert!(queued.is_none());
    assert_eq!(tier.first_free(), Some(1));
}

/// Busy operators only, empty slot only, strictly smallest departure.
#[test]
fn backlog_candidate_picks_earliest_busy_operator_with_empty_slot() {
    let tier = busy_tier(RequestType::Primary, &[Some(100.0), Some(40.0), None, Some(70.0)]);
    assert_eq!(tier.backlog_candidate(), Some((1, 40.0)));
}

#[test]
fn backlog_candidate_skips_occupied_slots() {
    let mut tier = busy_tier(RequestType::Secondary, &[Some(60.0), Some(20.0), Some(10.0)]);
    tier.enqueue(2, Job::new(5.0, RequestType::Secondary, 1.0)).unwrap();
    assert_eq!(tier.backlog_candidate(), Some((1, 20.0)));
}

#[test]
fn backlog_candidate_ties_go_to_lowest_index() {
    let tier = busy_tier(RequestType::Generalist, &[None, Some(50.0), Some(50.0)]);
    assert_eq!(tier.backlog_candidate(), Some((1, 50.0)));
}

#[test]
fn backlog_candidate_none_when_all_idle_or_queued() {
    let idle = OperatorTier::new(RequestType::Primary, 2);
    assert_eq!(idle.backlog_candidate(), None);

    let mut full = busy_tier(RequestType::Primary, &[Some(10.0)]);
    full.enqueue(0, Job::new(1.0, RequestType::Primary, 1.0)).unwrap();
    assert_eq!(full.backlog_candidate(), None);

    let empty = OperatorTier::new(RequestType::Primary, 0);
    assert!(empty.is_empty());
    assert_eq!(empty.backlog_candidate(), None);
}

/// A second enqueue on the same operator is rejected and keeps the first job.
#[test]
fn occupied_backlog_slot_is_never_overwritten() {
    let mut tier = busy_tier(RequestType::Primary, &[Some(600.0)]);
    let first = Job::new(560.0, RequestType::Primary, 5.0);
    tier.enqueue(0, first.clone()).unwrap();

    let err = tier
        .enqueue(0, Job::new(570.0, RequestType::Primary, 9.0))
        .unwrap_err();
    assert!(matches!(err, SimError::BacklogOccupied { operator: 0, .. }), "got {err:?}");
    assert_eq!(tier.slot(0).unwrap().backlog.as_ref(), Some(&first));
}

/// Completing hands back the served type and the queued job, leaving the slot idle.
#[test]
fn complete_returns_served_type_and_queued_job() {
    let mut tier = OperatorTier::new(RequestType::Generalist, 1);
    tier.begin_service(0, 641.0, RequestType::Primary);
    tier.enqueue(0, Job::new(543.0, RequestType::Generalist, 5.0)).unwrap();

    let (served, queued) = tier.complete(0);
    assert_eq!(served, RequestType::Primary);
    assert_eq!(queued.map(|j| j.arrival), Some(543.0));
    assert_eq!(tier.slot(0).unwrap().state, OperatorState::Idle);
    assert!(tier.slot(0).unwrap().is_free());
}

#[test]
fn next_departure_none_when_everyone_idle() {
    let tiers = TierSet::new(2, 2, 2);
    assert_eq!(tiers.next_departure(), None);
}

/// Equal minima: Primary beats Secondary beats Generalist.
#[test]
fn next_departure_tie_break_prefers_primary() {
    let mut tiers = TierSet::new(1, 1, 1);
    tiers.tier_mut(RequestType::Generalist).begin_service(0, 600.0, RequestType::Generalist);
    tiers.tier_mut(RequestType::Secondary).begin_service(0, 600.0, RequestType::Secondary);
    tiers.tier_mut(RequestType::Primary).begin_service(0, 600.0, RequestType::Primary);

    let next = tiers.next_departure().unwrap();
    assert_eq!(next.tier, RequestType::Primary);
    assert_eq!(next.time, 600.0);

    tiers.tier_mut(RequestType::Primary).complete(0);
    assert_eq!(tiers.next_departure().unwrap().tier, RequestType::Secondary);

    tiers.tier_mut(RequestType::Secondary).complete(0);
    assert_eq!(tiers.next_departure().unwrap().tier, RequestType::Generalist);
}

#[test]
fn next_departure_takes_strict_minimum_across_tiers() {
    let mut tiers = TierSet::new(2, 1, 2);
    tiers.tier_mut(RequestType::Primary).begin_service(0, 700.0, RequestType::Primary);
    tiers.tier_mut(RequestType::Primary).begin_service(1, 650.0, RequestType::Primary);
    tiers.tier_mut(RequestType::Secondary).begin_service(0, 680.0, RequestType::Secondary);
    tiers.tier_mut(RequestType::Generalist).begin_service(1, 620.0, RequestType::Secondary);

    let next = tiers.next_departure().unwrap();
    assert_eq!((next.tier, next.operator, next.time), (RequestType::Generalist, 1, 620.0));
}

#[test]
fn next_departure_within_tier_ties_go_to_lowest_index() {
    let mut tiers = TierSet::new(3, 0, 0);
    tiers.tier_mut(RequestType::Primary).begin_service(2, 610.0, RequestType::Primary);
    tiers.tier_mut(RequestType::Primary).begin_service(1, 610.0, RequestType::Primary);
    assert_eq!(tiers.next_departure().unwrap().operator, 1);
}

/// Drop only when the projected wait exceeds the threshold AND the draw is below 0.5.
#[test]
fn sla_drop_rule_boundaries() {
    let policy = SlaPolicy::default();
    assert!(sla_drop_applies(31.0, 0.49, &policy));
    assert!(sla_drop_applies(99.0, 0.0, &policy));
    assert!(!sla_drop_applies(31.0, 0.5, &policy));
    assert!(!sla_drop_applies(31.0, 0.75, &policy));
    assert!(!sla_drop_applies(30.0, 0.0, &policy), "exactly 30 minutes is not an excess");
}

#[test]
fn request_type_names_round_trip_and_reject_unknown() {
    for kind in RequestType::ALL {
        assert_eq!(kind.name().parse::<RequestType>().unwrap(), kind);
    }
    let err = "billing".parse::<RequestType>().unwrap_err();
    assert!(matches!(err, SimError::UnknownRequestType { ref name } if name == "billing"));
}

#[test]
fn overflow_job_is_served_by_generalist_tier() {
    let mut job = Job::new(541.0, RequestType::Secondary, 10.0);
    assert_eq!(job.serving_tier(), RequestType::Secondary);
    job.overflow = true;
    assert_eq!(job.serving_tier(), RequestType::Generalist);
    assert_eq!(Job::new(1.0, RequestType::Generalist, 1.0).serving_tier(), RequestType::Generalist);
}
