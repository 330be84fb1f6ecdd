use super::common::*;
use crate::planner::{Allocation, AllocationEngine, BlockReason, DependencyIndex};

#[test]
fn skill_requirement_blocks_until_target_reaches_level() {
    let mut session = session_at(10);

    assert!(!session.can_increase_skill("101"));
    let lines = session.explain_blocked("101");
    assert_eq!(lines, vec!["Requires Fire Ball Lv.2".to_string()]);

    invest(&mut session, "100", 1);
    assert!(!session.can_increase_skill("101"));
    invest(&mut session, "100", 1);
    assert!(session.can_increase_skill("101"));
    assert!(session.explain_blocked("101").is_empty());
}

#[test]
fn dependent_blocks_decrease_of_its_requirement() {
    let mut session = session_at(10);
    invest(&mut session, "100", 2);
    invest(&mut session, "101", 1);

    assert!(!session.can_decrease_skill("100"));
    assert_eq!(session.decrease_blockers("100"), vec!["101".to_string()]);
    assert!(!session.decrease_skill("100"));
    assert_eq!(session.allocation().skill_level("100"), 2);

    assert!(session.decrease_skill("101"));
    assert!(session.can_decrease_skill("100"));
}

#[test]
fn decrease_is_allowed_while_dependents_stay_satisfied() {
    let mut session = session_at(10);
    invest(&mut session, "100", 3);
    invest(&mut session, "101", 1);

    assert!(session.decrease_skill("100"));
    assert!(!session.can_decrease_skill("100"));
}

#[test]
fn decrease_checks_direct_dependents_only() {
    let mut session = session_at(10);
    invest(&mut session, "100", 2);
    invest(&mut session, "101", 1);
    invest(&mut session, "102", 1);

    assert_eq!(session.decrease_blockers("100"), vec!["101".to_string()]);
    assert_eq!(session.decrease_blockers("101"), vec!["102".to_string()]);
}

#[test]
fn nothing_to_remove_blocks_decrease() {
    let session = session_at(10);
    assert!(!session.can_decrease_skill("100"));
    assert!(session.decrease_blockers("100").is_empty());
}

#[test]
fn level_one_pool_allows_exactly_one_point() {
    let mut session = session_at(1);
    assert_eq!(session.points().skills_cap, 1);

    invest(&mut session, "100", 1);
    for skill in session.skills() {
        assert!(
            !session.can_increase_skill(&skill.id),
            "{} should be blocked by the pool",
            skill.id
        );
    }
    assert_eq!(
        session.explain_blocked("104"),
        vec!["Not enough skill points".to_string()]
    );
}

#[test]
fn level_gate_uses_next_level_threshold_and_clamps() {
    let mut session = session_at(4);
    invest(&mut session, "104", 1);

    assert!(!session.can_increase_skill("104"));
    assert_eq!(
        session.explain_blocked("104"),
        vec!["Requires character level 5".to_string()]
    );

    session.set_level(5);
    invest(&mut session, "104", 2);
    assert_eq!(
        session.explain_blocked("104"),
        vec!["Requires character level 10".to_string()]
    );

    session.set_level(10);
    invest(&mut session, "104", 2);
    assert_eq!(session.allocation().skill_level("104"), 5);
    assert_eq!(
        session.blocked_reasons("104"),
        vec![BlockReason::MaxLevelReached { max_level: 5 }]
    );
}

#[test]
fn name_only_requirement_resolves_to_skill() {
    let mut session = session_at(10);
    invest(&mut session, "100", 2);

    assert_eq!(
        session.explain_blocked("102"),
        vec!["Requires Fire Wall Lv.1".to_string()]
    );
    invest(&mut session, "101", 1);
    invest(&mut session, "102", 1);

    assert!(!session.can_decrease_skill("101"));
}

#[test]
fn job_requirement_gates_on_character_level() {
    let mut session = session_at(14);
    assert_eq!(
        session.explain_blocked("103"),
        vec!["Requires Magician Lv.15".to_string()]
    );
    match session.blocked_reasons("103").as_slice() {
        [BlockReason::JobRequirement { name, level: 15 }] => assert_eq!(name, "Magician"),
        other => panic!("expected job requirement, got {other:?}"),
    }

    session.set_level(15);
    assert!(session.can_increase_skill("103"));
}

#[test]
fn list_encoded_requirements_never_block_increase() {
    let mut session = session_at(10);

    assert!(session.can_increase_skill("105"));
    assert!(session.blocked_reasons("105").is_empty());
    invest(&mut session, "105", 1);
    assert_eq!(session.allocation().skill_level("100"), 0);
}

#[test]
fn list_encoded_dependents_do_not_hold_decrease() {
    let mut session = session_at(10);
    invest(&mut session, "100", 3);
    invest(&mut session, "105", 1);

    assert!(session
        .index()
        .dependents_of("100")
        .contains(&"105".to_string()));
    assert!(session.decrease_blockers("100").is_empty());
    assert!(session.decrease_skill("100"));
    assert_eq!(session.allocation().skill_level("100"), 2);
}

#[test]
fn unresolved_target_falls_back_to_literal_name() {
    let session = session_at(90);

    match session.blocked_reasons("106").as_slice() {
        [BlockReason::SkillRequirement { target, level: 4 }] => {
            assert_eq!(target.id, "999");
            assert_eq!(target.name, "Shadow Step");
            assert!(!target.resolved);
        }
        other => panic!("expected unresolved skill requirement, got {other:?}"),
    }
    assert_eq!(
        session.explain_blocked("106"),
        vec!["Requires Shadow Step Lv.4".to_string()]
    );
}

#[test]
fn explanations_follow_check_order() {
    let mut session = session_at(1);
    invest(&mut session, "100", 1);

    assert_eq!(
        session.explain_blocked("101"),
        vec![
            "Not enough skill points".to_string(),
            "Requires Fire Ball Lv.2".to_string()
        ]
    );
}

#[test]
fn increase_then_decrease_round_trips() {
    let mut session = session_at(20);
    invest(&mut session, "100", 3);
    invest(&mut session, "104", 1);
    let before = session.allocation().clone();

    assert!(session.increase_skill("100"));
    assert!(session.decrease_skill("100"));
    assert_eq!(session.allocation(), &before);
}

#[test]
fn engine_can_be_driven_directly() {
    let catalog = catalog();
    let skills = catalog.skills_for(SPEC);
    let index = DependencyIndex::build(SPEC, skills);
    let allocation = Allocation::new();
    let engine = AllocationEngine::new(skills, &index, &allocation, 10);

    let fire_ball = engine.skill("100").expect("fire ball present");
    assert_eq!(engine.cap(), 11);
    assert_eq!(engine.used(), 0);
    assert!(engine.can_increase_skill(fire_ball));
    assert!(!engine.can_decrease_skill(fire_ball));
}

#[test]
fn dna_ignores_pool_and_requirements() {
    let mut session = session_at(1);
    invest(&mut session, "100", 1);

    assert!(session.increase_dna("900"));
    assert!(session.increase_dna("900"));
    assert!(!session.increase_dna("900"));
    assert_eq!(session.allocation().dna_level("900"), 2);
    assert_eq!(session.points().dna_used, 2);

    assert!(session.decrease_dna("900"));
    assert!(session.decrease_dna("900"));
    assert!(!session.decrease_dna("900"));
    assert!(!session.can_decrease_dna("901"));
}

#[test]
fn only_numeric_gates_block_and_fractions_round_up() {
    let catalog = crate::catalog::Catalog::from_value(&serde_json::json!({
        "groups": [{"id": "g", "name": "G"}],
        "jobs": {"g": [{"id": "j", "name": "J", "specs": [{"id": "s", "name": "S"}]}]},
        "skills": {"s": [
            {"id": "1", "name": "Text Gate", "lvlReq": ["5"]},
            {"id": "2", "name": "Half Gate", "lvlReq": [5.5]}
        ]}
    }));
    let mut session = crate::planner::PlannerSession::new(catalog).with_level(3);

    assert!(session.can_increase_skill("1"));

    session.set_level(5);
    assert_eq!(
        session.explain_blocked("2"),
        vec!["Requires character level 6".to_string()]
    );
    session.set_level(6);
    assert!(session.can_increase_skill("2"));
}
