//! Grouping engine: partitions unit records by composite key.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use unitsheet_model::{Group, GroupKey, GroupSet, GroupStats, UnitRecord};

use crate::config::{GroupOptions, GroupingConfig};
use crate::delta::{DeltaOptions, is_edited};
use crate::error::GroupingError;
use crate::key::{composite_key, synthesize_name};

/// Deterministic group id for a key minted in a given run.
pub fn mint_group_id(generation: u64, key: &GroupKey) -> String {
    let digest = Sha256::digest(format!("{generation}\n{key}").as_bytes());
    let hex = hex::encode(digest);
    format!("grp-{}", &hex[..12])
}

/// Result of one grouping run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupingOutcome {
    pub set: GroupSet,
    /// Units whose key did not exist in the previous run. Empty on a first run.
    pub new_units: Vec<String>,
    /// New units waiting for a manual group, when auto-creation is off.
    pub unassigned: Vec<UnitRecord>,
    /// Previous key and record of every unit known before this run.
    #[serde(skip)]
    previous_units: BTreeMap<String, (GroupKey, UnitRecord)>,
}

impl GroupingOutcome {
    pub fn groups(&self) -> &[Group] {
        &self.set.groups
    }

    pub fn into_set(self) -> GroupSet {
        self.set
    }

    pub fn is_pending(&self, unit_id: &str) -> bool {
        self.unassigned.iter().any(|unit| unit.unit_id == unit_id)
    }

    /// Removes the selected units from `unassigned`, in selection order.
    fn take_pending(&mut self, unit_ids: &[&str]) -> Result<Vec<UnitRecord>, GroupingError> {
        if unit_ids.is_empty() {
            return Err(GroupingError::EmptySelection);
        }
        if let Some(missing) = unit_ids.iter().find(|id| !self.is_pending(id)) {
            return Err(GroupingError::UnitNotPending((*missing).to_string()));
        }
        let mut taken = Vec::with_capacity(unit_ids.len());
        for id in unit_ids {
            if let Some(pos) = self.unassigned.iter().position(|unit| unit.unit_id == *id) {
                taken.push(self.unassigned.remove(pos));
            }
        }
        Ok(taken)
    }

    /// Counts manually placed units as added, or as edited by the same
    /// rule the delta uses.
    fn count_placed(
        &self,
        stats: &mut GroupStats,
        units: &[UnitRecord],
        key: &GroupKey,
        options: &DeltaOptions,
    ) {
        for unit in units {
            stats.total += 1;
            match self.previous_units.get(&unit.unit_id) {
                None => stats.added += 1,
                Some((prev_key, prev_unit)) => {
                    if is_edited(prev_key, prev_unit, key, unit, options) {
                        stats.edited += 1;
                    }
                }
            }
        }
    }
}

/// Where each unit lived in the previous run.
struct PreviousIndex<'a> {
    present: bool,
    units: HashMap<&'a str, (&'a GroupKey, &'a UnitRecord)>,
}

impl<'a> PreviousIndex<'a> {
    fn new(previous: Option<&'a GroupSet>) -> Self {
        let mut units = HashMap::new();
        for group in previous.into_iter().flat_map(|set| &set.groups) {
            for unit in &group.units {
                units
                    .entry(unit.unit_id.as_str())
                    .or_insert((&group.key, unit));
            }
        }
        Self {
            present: previous.is_some(),
            units,
        }
    }

    /// Stats relative to the previous run.
    ///
    /// Added: unit ids unknown before. Edited: known units whose values or
    /// key changed. Removed: units of the prior group with this key that
    /// are no longer in it.
    fn stats(
        &self,
        key: &GroupKey,
        units: &[UnitRecord],
        prior: Option<&Group>,
        options: &DeltaOptions,
    ) -> GroupStats {
        let mut stats = GroupStats {
            total: units.len(),
            ..GroupStats::default()
        };
        if !self.present {
            return stats;
        }
        for unit in units {
            match self.units.get(unit.unit_id.as_str()) {
                None => stats.added += 1,
                Some((prev_key, prev_unit)) => {
                    if is_edited(prev_key, prev_unit, key, unit, options) {
                        stats.edited += 1;
                    }
                }
            }
        }
        if let Some(prior) = prior {
            stats.removed = prior
                .unit_ids()
                .filter(|id| !units.iter().any(|unit| unit.unit_id == *id))
                .count();
        }
        stats
    }
}

pub struct GroupingEngine {
    config: GroupingConfig,
    delta: DeltaOptions,
}

impl GroupingEngine {
    pub fn new(config: GroupingConfig) -> Self {
        Self {
            config,
            delta: DeltaOptions::default(),
        }
    }

    /// Fields that count as an edit in group stats. Pass the options given
    /// to [`crate::diff_with`] so stats and delta entries agree.
    #[must_use]
    pub fn with_delta_options(mut self, delta: DeltaOptions) -> Self {
        self.delta = delta;
        self
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Groups `records`, comparing against the previous run when given.
    ///
    /// Groups are listed in order of their first unit. The run is
    /// deterministic: the same records and previous set always produce the
    /// same groups, ids and names.
    pub fn run(&self, records: &[UnitRecord], previous: Option<&GroupSet>) -> GroupingOutcome {
        let generation = previous.map_or(0, |set| set.generation.saturating_add(1));
        let options = &self.config.options;

        let mut order: Vec<GroupKey> = Vec::new();
        let mut partitions: HashMap<GroupKey, Vec<UnitRecord>> = HashMap::new();
        for record in records {
            let fields = self.config.fields_for(record.project().as_deref());
            let key = composite_key(record, &fields, options);
            match partitions.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().push(record.clone()),
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(vec![record.clone()]);
                }
            }
        }

        let index = PreviousIndex::new(previous);
        let mut groups = Vec::with_capacity(order.len());
        let mut new_units = Vec::new();
        let mut unassigned = Vec::new();
        for key in order {
            let units = partitions.remove(&key).unwrap_or_default();
            let prior = previous.and_then(|set| set.find_by_key(&key));
            if previous.is_some() && prior.is_none() {
                new_units.extend(units.iter().map(|unit| unit.unit_id.clone()));
                if !self.config.auto_create_groups {
                    unassigned.extend(units);
                    continue;
                }
            }
            let stats = index.stats(&key, &units, prior, &self.delta);
            groups.push(build_group(key, units, prior, stats, generation, options));
        }

        debug!(
            generation,
            groups = groups.len(),
            new_units = new_units.len(),
            unassigned = unassigned.len(),
            "grouped units"
        );
        GroupingOutcome {
            set: GroupSet { generation, groups },
            new_units,
            unassigned,
            previous_units: index
                .units
                .iter()
                .map(|(id, (key, unit))| ((*id).to_string(), ((*key).clone(), (*unit).clone())))
                .collect(),
        }
    }

    /// Moves pending new units into an existing group.
    pub fn assign_to_group(
        &self,
        outcome: &GroupingOutcome,
        unit_ids: &[&str],
        group_id: &str,
    ) -> Result<GroupingOutcome, GroupingError> {
        let Some(target) = outcome.set.find_by_id(group_id) else {
            return Err(GroupingError::GroupNotFound(group_id.to_string()));
        };
        let key = target.key.clone();
        let mut next = outcome.clone();
        let units = next.take_pending(unit_ids)?;
        let mut stats = GroupStats::default();
        next.count_placed(&mut stats, &units, &key, &self.delta);

        if let Some(group) = next.set.groups.iter_mut().find(|g| g.id == group_id) {
            group.units.extend(units);
            group.stats.total += stats.total;
            group.stats.added += stats.added;
            group.stats.edited += stats.edited;
        }
        debug!(group_id, units = unit_ids.len(), "assigned units to group");
        Ok(next)
    }

    /// Creates a group for pending new units, keyed on the first of them.
    ///
    /// A non-empty `name` is kept as a custom name.
    pub fn create_group(
        &self,
        outcome: &GroupingOutcome,
        unit_ids: &[&str],
        name: Option<&str>,
    ) -> Result<GroupingOutcome, GroupingError> {
        let mut next = outcome.clone();
        let units = next.take_pending(unit_ids)?;
        let Some(first) = units.first() else {
            return Err(GroupingError::EmptySelection);
        };
        let fields = self.config.fields_for(first.project().as_deref());
        let key = composite_key(first, &fields, &self.config.options);
        if let Some(existing) = next.set.find_by_key(&key) {
            return Err(GroupingError::GroupExists {
                id: existing.id.clone(),
                key: key.to_string(),
            });
        }

        let custom = name.map(str::trim).filter(|name| !name.is_empty());
        let mut stats = GroupStats::default();
        next.count_placed(&mut stats, &units, &key, &self.delta);
        let group = Group {
            id: mint_group_id(next.set.generation, &key),
            name: custom.map_or_else(|| synthesize_name(&key, Some(first)), str::to_string),
            name_is_custom: custom.is_some(),
            key,
            floor_plan_ref: None,
            render_image_refs: Vec::new(),
            units,
            stats,
        };
        debug!(group_id = %group.id, units = group.units.len(), "created group");
        next.set.groups.push(group);
        Ok(next)
    }
}

fn build_group(
    key: GroupKey,
    units: Vec<UnitRecord>,
    prior: Option<&Group>,
    stats: GroupStats,
    generation: u64,
    options: &GroupOptions,
) -> Group {
    let merged = prior.filter(|_| options.merge_with_existing);
    let (id, floor_plan_ref, render_image_refs) = match merged {
        Some(prior) => (
            prior.id.clone(),
            prior.floor_plan_ref.clone(),
            prior.render_image_refs.clone(),
        ),
        None => (mint_group_id(generation, &key), None, Vec::new()),
    };
    let (name, name_is_custom) = match (merged, prior) {
        (Some(prior), _) => (prior.name.clone(), prior.name_is_custom),
        (None, Some(prior)) if options.preserve_names && prior.name_is_custom => {
            (prior.name.clone(), true)
        }
        _ => (synthesize_name(&key, units.first()), false),
    };
    Group {
        id,
        name,
        name_is_custom,
        key,
        floor_plan_ref,
        render_image_refs,
        units,
        stats,
    }
}

/// Groups records by `key_fields` in one call.
///
/// Shorthand for a [`GroupingEngine`] without project overrides and with
/// automatic group creation.
pub fn group(
    records: &[UnitRecord],
    key_fields: &[&str],
    options: &GroupOptions,
    previous: Option<&GroupSet>,
) -> Vec<Group> {
    let config = GroupingConfig {
        options: options.clone(),
        ..GroupingConfig::with_key_fields(key_fields)
    };
    GroupingEngine::new(config)
        .run(records, previous)
        .into_set()
        .groups
}
