//! Floor-plan and render-image assignment.
//!
//! [`AssignmentBook`] is an immutable snapshot of per-unit assets. Manual
//! choices always win: auto-assignment only fills slots that no person
//! decided, and an asset a person removed is never auto-assigned back.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use unitsheet_model::{
    AssetAssignment, AssetCatalog, AssetKind, Group, RenderImage, RenderView, UnitRecord,
};

use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    Manual,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedAsset {
    pub asset_id: String,
    pub source: AssignmentSource,
}

impl AssignedAsset {
    fn manual(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            source: AssignmentSource::Manual,
        }
    }

    fn auto(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            source: AssignmentSource::Auto,
        }
    }

    fn is_manual(&self) -> bool {
        self.source == AssignmentSource::Manual
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAssets {
    pub floor_plan: Option<AssignedAsset>,
    pub renders: Vec<AssignedAsset>,
    /// Assets a person removed; auto-assignment skips them.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub suppressed: BTreeSet<String>,
}

/// Counts shown next to the assignment screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub units: usize,
    pub with_floor_plan: usize,
    pub without_floor_plan: usize,
    pub with_renders: usize,
    pub manual: usize,
    pub auto: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentBook {
    catalog: AssetCatalog,
    units: BTreeMap<String, UnitAssets>,
}

fn same_type(catalog_type: &str, unit_type: &str) -> bool {
    catalog_type.trim().eq_ignore_ascii_case(unit_type.trim())
}

fn first_render<'a>(
    catalog: &'a AssetCatalog,
    unit: &UnitRecord,
    unit_type: &str,
    view: RenderView,
    suppressed: &BTreeSet<String>,
) -> Option<&'a RenderImage> {
    catalog.render_images.iter().find(|image| {
        image.view == view
            && same_type(&image.unit_type, unit_type)
            && image.matches_area(unit.area())
            && !suppressed.contains(&image.id)
    })
}

impl AssignmentBook {
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            units: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn unit(&self, unit_id: &str) -> Option<&UnitAssets> {
        self.units.get(unit_id)
    }

    /// Matches units against the catalog by unit type and area.
    ///
    /// Floor plan: the first plan whose type matches and whose inclusive
    /// area range holds the unit's area. Renders: the first matching
    /// interior and the first matching exterior. Slots holding a manual
    /// choice are left alone; earlier auto choices are recomputed.
    #[must_use]
    pub fn auto_assign(&self, units: &[UnitRecord]) -> Self {
        let mut next = self.clone();
        let mut matched = 0usize;
        for unit in units {
            let assets = next.units.entry(unit.unit_id.clone()).or_default();
            let Some(unit_type) = unit.unit_type() else {
                continue;
            };

            if !assets.floor_plan.as_ref().is_some_and(AssignedAsset::is_manual) {
                assets.floor_plan = unit.area().and_then(|area| {
                    self.catalog
                        .floor_plans
                        .iter()
                        .find(|plan| {
                            same_type(&plan.unit_type, &unit_type)
                                && plan.area_range().contains(area)
                                && !assets.suppressed.contains(&plan.id)
                        })
                        .map(|plan| AssignedAsset::auto(&plan.id))
                });
                matched += usize::from(assets.floor_plan.is_some());
            }

            assets.renders.retain(AssignedAsset::is_manual);
            for view in [RenderView::Interior, RenderView::Exterior] {
                let has_manual_view = assets.renders.iter().any(|render| {
                    self.catalog
                        .render_image(&render.asset_id)
                        .is_some_and(|image| image.view == view)
                });
                if has_manual_view {
                    continue;
                }
                if let Some(image) =
                    first_render(&self.catalog, unit, &unit_type, view, &assets.suppressed)
                {
                    assets.renders.push(AssignedAsset::auto(&image.id));
                }
            }
        }
        debug!(units = units.len(), floor_plans = matched, "auto-assigned assets");
        next
    }

    /// Assigns an asset to units as a manual choice.
    ///
    /// A floor plan replaces the unit's plan; a render is added once.
    pub fn assign(&self, unit_ids: &[&str], asset_id: &str) -> Result<Self, AssetError> {
        if unit_ids.is_empty() {
            return Err(AssetError::EmptySelection);
        }
        let kind = self
            .catalog
            .kind_of(asset_id)
            .ok_or_else(|| AssetError::AssetNotFound(asset_id.to_string()))?;
        let mut next = self.clone();
        for unit_id in unit_ids {
            let assets = next.units.entry((*unit_id).to_string()).or_default();
            assets.suppressed.remove(asset_id);
            match kind {
                AssetKind::FloorPlan => assets.floor_plan = Some(AssignedAsset::manual(asset_id)),
                AssetKind::Render(_) => {
                    match assets.renders.iter_mut().find(|r| r.asset_id == asset_id) {
                        Some(existing) => existing.source = AssignmentSource::Manual,
                        None => assets.renders.push(AssignedAsset::manual(asset_id)),
                    }
                }
            }
        }
        Ok(next)
    }

    pub fn assign_group(&self, group: &Group, asset_id: &str) -> Result<Self, AssetError> {
        let unit_ids: Vec<&str> = group.unit_ids().collect();
        self.assign(&unit_ids, asset_id)
    }

    /// Removes an asset from a unit and keeps auto-assignment from
    /// restoring it.
    pub fn unassign(&self, unit_id: &str, asset_id: &str) -> Result<Self, AssetError> {
        let not_assigned = || AssetError::NotAssigned {
            unit_id: unit_id.to_string(),
            asset_id: asset_id.to_string(),
        };
        let mut next = self.clone();
        let assets = next.units.get_mut(unit_id).ok_or_else(not_assigned)?;
        let had_plan = assets
            .floor_plan
            .as_ref()
            .is_some_and(|plan| plan.asset_id == asset_id);
        let renders_before = assets.renders.len();
        assets.renders.retain(|render| render.asset_id != asset_id);
        if !had_plan && assets.renders.len() == renders_before {
            return Err(not_assigned());
        }
        if had_plan {
            assets.floor_plan = None;
        }
        assets.suppressed.insert(asset_id.to_string());
        Ok(next)
    }

    pub fn assignment(&self, unit_id: &str) -> Option<AssetAssignment> {
        self.units.get(unit_id).map(|assets| AssetAssignment {
            unit_id: unit_id.to_string(),
            floor_plan_id: assets.floor_plan.as_ref().map(|plan| plan.asset_id.clone()),
            render_image_ids: assets
                .renders
                .iter()
                .map(|render| render.asset_id.clone())
                .collect(),
        })
    }

    /// Assignments of every known unit, sorted by unit id.
    pub fn to_assignments(&self) -> Vec<AssetAssignment> {
        self.units
            .keys()
            .filter_map(|unit_id| self.assignment(unit_id))
            .collect()
    }

    pub fn stats(&self) -> AssignmentStats {
        let mut stats = AssignmentStats {
            units: self.units.len(),
            ..AssignmentStats::default()
        };
        for assets in self.units.values() {
            if assets.floor_plan.is_some() {
                stats.with_floor_plan += 1;
            } else {
                stats.without_floor_plan += 1;
            }
            if !assets.renders.is_empty() {
                stats.with_renders += 1;
            }
            for asset in assets.floor_plan.iter().chain(&assets.renders) {
                match asset.source {
                    AssignmentSource::Manual => stats.manual += 1,
                    AssignmentSource::Auto => stats.auto += 1,
                }
            }
        }
        stats
    }

    /// Copies unit assets onto their groups.
    ///
    /// A group gets a floor plan when all of its units share the same one,
    /// and the union of its units' renders in unit order. Groups whose
    /// units carry no assets keep their existing references.
    pub fn apply_to_groups(&self, groups: &[Group]) -> Vec<Group> {
        groups
            .iter()
            .map(|group| {
                let mut group = group.clone();
                let plans: BTreeSet<&str> = group
                    .units
                    .iter()
                    .map(|unit| {
                        self.units
                            .get(&unit.unit_id)
                            .and_then(|assets| assets.floor_plan.as_ref())
                            .map_or("", |plan| plan.asset_id.as_str())
                    })
                    .collect();
                if plans.len() == 1
                    && let Some(plan) = plans.first().filter(|plan| !plan.is_empty())
                {
                    group.floor_plan_ref = Some((*plan).to_string());
                }
                for unit in &group.units {
                    let Some(assets) = self.units.get(&unit.unit_id) else {
                        continue;
                    };
                    for render in &assets.renders {
                        if !group.render_image_refs.contains(&render.asset_id) {
                            group.render_image_refs.push(render.asset_id.clone());
                        }
                    }
                }
                group
            })
            .collect()
    }
}
