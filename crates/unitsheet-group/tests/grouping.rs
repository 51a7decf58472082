//! Tests for the grouping engine.

use unitsheet_group::{
    DeltaOptions, GroupOptions, GroupingConfig, GroupingEngine, GroupingError, group,
    mint_group_id,
};
use unitsheet_model::{FieldValue, GroupSet, UnitRecord, ids};

fn unit(id: &str, unit_type: &str, area: f64) -> UnitRecord {
    UnitRecord::new(id, 0)
        .with_value(ids::PROJECT, FieldValue::Text("Badya".into()))
        .with_value(ids::UNIT_TYPE, FieldValue::Text(unit_type.into()))
        .with_value(ids::AREA, FieldValue::Number(area))
}

fn ids_of(group: &unitsheet_model::Group) -> Vec<&str> {
    group.unit_ids().collect()
}

#[test]
fn groups_by_unit_type() {
    let records = vec![
        UnitRecord::new("r1", 0).with_value(ids::UNIT_TYPE, FieldValue::Text("Studio".into())),
        UnitRecord::new("r2", 1).with_value(ids::UNIT_TYPE, FieldValue::Text("1BR".into())),
        UnitRecord::new("r3", 2).with_value(ids::UNIT_TYPE, FieldValue::Text("Studio".into())),
    ];
    let groups = group(&records, &[ids::UNIT_TYPE], &GroupOptions::default(), None);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "Studio");
    assert_eq!(ids_of(&groups[0]), vec!["r1", "r3"]);
    assert_eq!(groups[0].stats.total, 2);
    assert_eq!(groups[1].name, "1BR");
    assert_eq!(ids_of(&groups[1]), vec!["r2"]);
}

#[test]
fn grouping_is_deterministic() {
    let records = vec![
        unit("A", "Apartment", 117.0),
        unit("B", "Villa", 250.0),
        unit("C", "Apartment", 100.0),
    ];
    let fields = [ids::UNIT_TYPE, ids::AREA];
    let first = group(&records, &fields, &GroupOptions::default(), None);
    let second = group(&records, &fields, &GroupOptions::default(), None);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].key.value_of(ids::AREA), Some("[100,125)"));
    assert_eq!(ids_of(&first[0]), vec!["A", "C"]);
    assert_eq!(first[0].id, mint_group_id(0, &first[0].key));
}

#[test]
fn project_override_changes_key() {
    let mut config = GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]);
    config.project_overrides.insert(
        "Badya".into(),
        vec![ids::UNIT_TYPE.to_string(), ids::AREA.to_string()],
    );
    let other = UnitRecord::new("Z", 3)
        .with_value(ids::PROJECT, FieldValue::Text("Other".into()))
        .with_value(ids::UNIT_TYPE, FieldValue::Text("Apartment".into()))
        .with_value(ids::AREA, FieldValue::Number(300.0));
    let records = vec![unit("A", "Apartment", 80.0), unit("B", "Apartment", 130.0), other];

    let outcome = GroupingEngine::new(config).run(&records, None);
    let keys: Vec<String> = outcome.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "unit_type=Apartment | area=[75,100)",
            "unit_type=Apartment | area=[125,150)",
            "unit_type=Apartment",
        ]
    );
}

#[test]
fn merge_keeps_identity_and_assets() {
    let options = GroupOptions {
        merge_with_existing: true,
        ..GroupOptions::default()
    };
    let config = GroupingConfig {
        options,
        ..GroupingConfig::with_key_fields(&[ids::UNIT_TYPE])
    };
    let engine = GroupingEngine::new(config);

    let first = engine.run(&[unit("A", "Studio", 50.0)], None);
    let mut previous = first.into_set();
    previous.groups[0] = previous.groups[0].clone().renamed("Sea view studios");
    previous.groups[0].floor_plan_ref = Some("fp-studio".into());

    let second = engine.run(
        &[unit("A", "Studio", 50.0), unit("B", "Studio", 52.0)],
        Some(&previous),
    );
    let group = &second.groups()[0];
    assert_eq!(second.set.generation, 1);
    assert_eq!(group.id, previous.groups[0].id);
    assert_eq!(group.name, "Sea view studios");
    assert_eq!(group.floor_plan_ref.as_deref(), Some("fp-studio"));
    assert_eq!(group.stats.total, 2);
    assert_eq!(group.stats.added, 1);
    assert!(second.new_units.is_empty());
}

#[test]
fn without_merge_ids_are_minted_but_custom_names_can_survive() {
    let config = GroupingConfig {
        options: GroupOptions {
            preserve_names: true,
            ..GroupOptions::default()
        },
        ..GroupingConfig::with_key_fields(&[ids::UNIT_TYPE])
    };
    let engine = GroupingEngine::new(config);
    let mut previous = engine.run(&[unit("A", "Studio", 50.0)], None).into_set();
    previous.groups[0] = previous.groups[0].clone().renamed("Garden studios");

    let next = engine.run(&[unit("A", "Studio", 50.0)], Some(&previous));
    let group = &next.groups()[0];
    assert_ne!(group.id, previous.groups[0].id);
    assert_eq!(group.name, "Garden studios");
    assert!(group.name_is_custom);
    assert_eq!(group.floor_plan_ref, None);
}

#[test]
fn stats_track_moves_edits_and_removals() {
    let engine = GroupingEngine::new(GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]));
    let previous = engine
        .run(
            &[
                unit("A", "Studio", 50.0),
                unit("B", "Studio", 55.0),
                unit("C", "Studio", 60.0),
            ],
            None,
        )
        .into_set();
    assert_eq!(previous.groups[0].stats.added, 0);

    let current = engine.run(
        &[
            unit("A", "Studio", 50.0),
            unit("B", "Studio", 58.0),
            unit("C", "1BR", 60.0),
            unit("D", "Studio", 45.0),
        ],
        Some(&previous),
    );
    let studio = &current.groups()[0];
    assert_eq!(studio.stats.total, 3);
    assert_eq!(studio.stats.added, 1);
    assert_eq!(studio.stats.edited, 1);
    assert_eq!(studio.stats.removed, 1);

    let one_bedroom = &current.groups()[1];
    assert_eq!(one_bedroom.stats.edited, 1);
    assert_eq!(current.new_units, vec!["C"]);
}

#[test]
fn new_units_wait_when_auto_create_is_off() {
    let config = GroupingConfig {
        auto_create_groups: false,
        ..GroupingConfig::with_key_fields(&[ids::UNIT_TYPE])
    };
    let engine = GroupingEngine::new(config);
    let previous = engine.run(&[unit("A", "Studio", 50.0)], None).into_set();

    let outcome = engine.run(
        &[
            unit("A", "Studio", 50.0),
            unit("B", "Duplex", 180.0),
            unit("C", "Duplex", 190.0),
        ],
        Some(&previous),
    );
    assert_eq!(outcome.groups().len(), 1);
    assert_eq!(outcome.new_units, vec!["B", "C"]);
    assert_eq!(outcome.unassigned.len(), 2);

    let studio_id = outcome.groups()[0].id.clone();
    let assigned = engine.assign_to_group(&outcome, &["B"], &studio_id).unwrap();
    assert!(assigned.groups()[0].contains_unit("B"));
    assert_eq!(assigned.groups()[0].stats.added, 1);
    assert!(!assigned.is_pending("B"));
    assert!(assigned.is_pending("C"));

    assert_eq!(
        engine.assign_to_group(&assigned, &["B"], &studio_id).unwrap_err(),
        GroupingError::UnitNotPending("B".into())
    );
    assert_eq!(
        engine.assign_to_group(&assigned, &["C"], "grp-missing").unwrap_err(),
        GroupingError::GroupNotFound("grp-missing".into())
    );

    let created = engine
        .create_group(&assigned, &["C"], Some("Duplex launch"))
        .unwrap();
    let duplex = &created.groups()[1];
    assert_eq!(duplex.name, "Duplex launch");
    assert!(duplex.name_is_custom);
    assert_eq!(duplex.key.value_of(ids::UNIT_TYPE), Some("Duplex"));
    assert!(created.unassigned.is_empty());
}

#[test]
fn group_set_survives_json() {
    let records = vec![unit("A", "Apartment", 117.0), unit("B", "Villa", 250.0)];
    let engine = GroupingEngine::new(GroupingConfig::with_key_fields(&[
        ids::PROJECT,
        ids::UNIT_TYPE,
        ids::AREA,
    ]));
    let set = engine.run(&records, None).into_set();
    let json = serde_json::to_string(&set).unwrap();
    let restored: unitsheet_model::GroupSet = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, set);
}

#[test]
fn empty_previous_set_counts_every_unit_as_added() {
    let engine = GroupingEngine::new(GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]));
    let previous = GroupSet::default();
    let outcome = engine.run(&[unit("A", "Studio", 50.0)], Some(&previous));

    assert_eq!(outcome.new_units, vec!["A"]);
    assert_eq!(outcome.set.generation, 1);
    let stats = outcome.groups()[0].stats;
    assert_eq!((stats.total, stats.added, stats.edited), (1, 1, 0));
}

#[test]
fn generation_saturates_at_the_maximum() {
    let engine = GroupingEngine::new(GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]));
    let previous = GroupSet {
        generation: u64::MAX,
        groups: Vec::new(),
    };
    let outcome = engine.run(&[unit("A", "Studio", 50.0)], Some(&previous));
    assert_eq!(outcome.set.generation, u64::MAX);
    assert_eq!(outcome.groups()[0].id, mint_group_id(u64::MAX, &outcome.groups()[0].key));
}

#[test]
fn blank_and_absent_values_are_not_edits_in_stats() {
    let engine = GroupingEngine::new(GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]));
    let with_blank = unit("A", "Studio", 50.0).with_value(ids::FLOOR, FieldValue::Missing);
    let previous = engine.run(&[with_blank], None).into_set();
    let current = engine
        .run(&[unit("A", "Studio", 50.0)], Some(&previous))
        .into_set();

    assert_eq!(current.groups[0].stats.edited, 0);
    assert!(unitsheet_group::diff(&previous, &current).is_empty());
}

#[test]
fn stats_follow_tracked_fields() {
    let config = GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]);
    let previous = GroupingEngine::new(config.clone())
        .run(&[unit("A", "Studio", 50.0)], None)
        .into_set();
    let records = [unit("A", "Studio", 55.0)];

    let all = GroupingEngine::new(config.clone()).run(&records, Some(&previous));
    assert_eq!(all.groups()[0].stats.edited, 1);

    let options = DeltaOptions::tracking(&[ids::PRICE]);
    let tracked = GroupingEngine::new(config)
        .with_delta_options(options.clone())
        .run(&records, Some(&previous));
    assert_eq!(tracked.groups()[0].stats.edited, 0);
    assert!(unitsheet_group::diff_with(&previous, &tracked.set, &options).is_empty());
}

#[test]
fn known_unit_placed_in_new_group_counts_as_edited() {
    let mut config = GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]);
    config.auto_create_groups = false;
    let engine = GroupingEngine::new(config);
    let previous = engine
        .run(&[unit("A", "Studio", 50.0), unit("B", "Studio", 60.0)], None)
        .into_set();
    let outcome = engine.run(
        &[unit("A", "Duplex", 50.0), unit("B", "Studio", 60.0), unit("C", "Duplex", 90.0)],
        Some(&previous),
    );
    assert_eq!(outcome.new_units, vec!["A", "C"]);

    let created = engine.create_group(&outcome, &["A", "C"], None).unwrap();
    let duplex = &created.groups()[1];
    assert_eq!((duplex.stats.total, duplex.stats.added, duplex.stats.edited), (2, 1, 1));
}
