//! Delta tracking between two grouping runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use unitsheet_model::{DeltaEntry, DeltaKind, Group, GroupKey, GroupSet, UnitRecord};

/// Which record fields count as an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaOptions {
    /// Fields compared between snapshots. `None` compares every field.
    #[serde(default)]
    pub tracked_fields: Option<Vec<String>>,
}

impl DeltaOptions {
    pub fn tracking(fields: &[&str]) -> Self {
        Self {
            tracked_fields: Some(fields.iter().map(|f| (*f).to_string()).collect()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub added: usize,
    pub removed: usize,
    pub edited: usize,
}

impl DeltaSummary {
    pub fn from_entries(entries: &[DeltaEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                DeltaKind::Added => summary.added += 1,
                DeltaKind::Removed => summary.removed += 1,
                DeltaKind::Edited => summary.edited += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.edited
    }
}

/// Unit id to owning group and record. The first group wins if a unit
/// appears twice.
fn index(set: &GroupSet) -> BTreeMap<&str, (&Group, &UnitRecord)> {
    let mut units = BTreeMap::new();
    for group in &set.groups {
        for unit in &group.units {
            units.entry(unit.unit_id.as_str()).or_insert((group, unit));
        }
    }
    units
}

/// Tracked fields whose values differ. `Missing` and absent are equal.
pub(crate) fn changed_fields(
    previous: &UnitRecord,
    current: &UnitRecord,
    options: &DeltaOptions,
) -> Vec<String> {
    let fields: BTreeSet<&str> = match &options.tracked_fields {
        Some(fields) => fields.iter().map(String::as_str).collect(),
        None => previous
            .values
            .keys()
            .chain(current.values.keys())
            .map(String::as_str)
            .collect(),
    };
    fields
        .into_iter()
        .filter(|field| {
            let before = previous.get(field).filter(|value| !value.is_missing());
            let after = current.get(field).filter(|value| !value.is_missing());
            before != after
        })
        .map(str::to_string)
        .collect()
}

/// Whether a unit that exists in both runs counts as edited.
///
/// Shared by [`diff_with`] and the per-group stats.
pub(crate) fn is_edited(
    previous_key: &GroupKey,
    previous: &UnitRecord,
    current_key: &GroupKey,
    current: &UnitRecord,
    options: &DeltaOptions,
) -> bool {
    previous_key != current_key || !changed_fields(previous, current, options).is_empty()
}

/// Compares every tracked field of every unit.
pub fn diff(previous: &GroupSet, current: &GroupSet) -> Vec<DeltaEntry> {
    diff_with(previous, current, &DeltaOptions::default())
}

/// Classifies units as added, removed or edited, sorted by unit id.
///
/// A unit is edited when a tracked field differs or when it moved to a
/// group with a different key. This departs from comparing owning group
/// ids: a unit whose group id changed but whose key did not is not edited,
/// since ids are only stable when groups are merged with the previous run.
pub fn diff_with(previous: &GroupSet, current: &GroupSet, options: &DeltaOptions) -> Vec<DeltaEntry> {
    let before = index(previous);
    let after = index(current);
    let ids: BTreeSet<&str> = before.keys().chain(after.keys()).copied().collect();

    let mut entries = Vec::new();
    for id in ids {
        let entry = match (before.get(id), after.get(id)) {
            (None, Some((group, _))) => DeltaEntry {
                unit_id: id.to_string(),
                kind: DeltaKind::Added,
                previous_group_id: None,
                new_group_id: Some(group.id.clone()),
                changed_fields: Vec::new(),
            },
            (Some((group, _)), None) => DeltaEntry {
                unit_id: id.to_string(),
                kind: DeltaKind::Removed,
                previous_group_id: Some(group.id.clone()),
                new_group_id: None,
                changed_fields: Vec::new(),
            },
            (Some((old_group, old_unit)), Some((new_group, new_unit))) => {
                let changed = changed_fields(old_unit, new_unit, options);
                if changed.is_empty() && old_group.key == new_group.key {
                    continue;
                }
                DeltaEntry {
                    unit_id: id.to_string(),
                    kind: DeltaKind::Edited,
                    previous_group_id: Some(old_group.id.clone()),
                    new_group_id: Some(new_group.id.clone()),
                    changed_fields: changed,
                }
            }
            (None, None) => continue,
        };
        entries.push(entry);
    }

    debug!(
        entries = entries.len(),
        generation = current.generation,
        "computed delta"
    );
    entries
}
