use crate::catalog::Catalog;
use crate::planner::PlannerSession;
use serde_json::{json, Value};

pub(super) const SPEC: &str = "2101";

/// One race, two jobs. The first job's first subclass carries the skills the
/// engine tests exercise:
///
/// - `100` Fire Ball, no requirements
/// - `101` Fire Wall, requires Fire Ball Lv.2 by id
/// - `102` Meteor, requires Fire Wall Lv.1 by name only
/// - `103` Mana Shield, job requirement "Magician" Lv.15
/// - `104` Inferno, gated by `[1, 5, 5, 10]`, max level 5
/// - `105` Ember, list-encoded `"100:3"`, indexed but never enforced
/// - `106` Phantom, requires an id that is not in this subclass
pub(super) fn catalog_json() -> Value {
    json!({
        "groups": [
            {"id": "xenoa", "name": "Xenoa"},
            {"id": "bartuk", "name": "Bartuk"}
        ],
        "jobs": {
            "xenoa": [
                {"id": "21", "name": "Battle Magician", "specs": [
                    {"id": SPEC, "name": "Elementalist"},
                    {"id": "2102", "name": "Summoner"}
                ]},
                {"id": "22", "name": "Hunter", "specs": [{"id": "2201", "name": "Archer"}]}
            ],
            "bartuk": [
                {"id": "11", "name": "Warrior", "specs": [{"id": "1101", "name": "Berserker"}]}
            ]
        },
        "skills": {
            SPEC: [
                {"id": "100", "name": "Fire Ball", "maxLevel": 10,
                 "info": {"type": "Active", "range": "20m"}},
                {"id": "101", "name": "Fire Wall",
                 "requires": {"required skill": {"id": "100", "name": "Fire Ball", "level": 2}}},
                {"id": "102", "name": "Meteor",
                 "requires": {"required skill": {"name": "fire-wall", "level": 1}}},
                {"id": "103", "name": "Mana Shield",
                 "requires": {"required job": {"name": "Magician", "level": 15}}},
                {"id": "104", "name": "Inferno", "maxLevel": 5, "lvlReq": [1, 5, 5, 10]},
                {"id": "105", "name": "Ember", "req": "100:3"},
                {"id": "106", "name": "Phantom",
                 "requires": {"required skill": {"id": "999", "name": "Shadow Step", "level": 4}}}
            ],
            "2102": [
                {"id": "200", "name": "Summon Imp"}
            ],
            "2201": [
                {"id": "300", "name": "Aimed Shot", "maxLevel": 3}
            ],
            "1101": []
        },
        "dna": {
            SPEC: [
                {"id": "900", "name": "Flame Affinity", "maxLevel": 2},
                {"id": "901", "name": "Arcane Focus"}
            ]
        }
    })
}

pub(super) fn catalog() -> Catalog {
    Catalog::from_value(&catalog_json())
}

pub(super) fn session_at(level: i64) -> PlannerSession {
    PlannerSession::new(catalog()).with_level(level)
}

pub(super) fn invest(session: &mut PlannerSession, id: &str, times: u32) {
    for _ in 0..times {
        assert!(session.increase_skill(id), "increase of {id} should be allowed");
    }
}
