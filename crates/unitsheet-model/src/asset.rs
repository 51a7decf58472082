//! Floor-plan and render-image catalog types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Inclusive area range in square metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaRange {
    pub min: f64,
    pub max: f64,
}

impl AreaRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ModelError> {
        if min > max {
            return Err(ModelError::InvalidAreaRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, area: f64) -> bool {
        area >= self.min && area <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub unit_type: String,
    pub area_min: f64,
    pub area_max: f64,
}

impl FloorPlan {
    pub fn area_range(&self) -> AreaRange {
        AreaRange {
            min: self.area_min,
            max: self.area_max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderView {
    Interior,
    Exterior,
}

impl fmt::Display for RenderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderView::Interior => f.write_str("interior"),
            RenderView::Exterior => f.write_str("exterior"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderImage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub unit_type: String,
    pub view: RenderView,
    /// Renders without an area range apply to every area of their type.
    #[serde(default)]
    pub area_min: Option<f64>,
    #[serde(default)]
    pub area_max: Option<f64>,
}

impl RenderImage {
    pub fn matches_area(&self, area: Option<f64>) -> bool {
        match (self.area_min, self.area_max, area) {
            (None, None, _) => true,
            (_, _, None) => false,
            (min, max, Some(area)) => {
                min.is_none_or(|min| area >= min) && max.is_none_or(|max| area <= max)
            }
        }
    }
}

/// Floor plans and render images available for assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    pub floor_plans: Vec<FloorPlan>,
    #[serde(default)]
    pub render_images: Vec<RenderImage>,
}

impl AssetCatalog {
    pub fn floor_plan(&self, id: &str) -> Option<&FloorPlan> {
        self.floor_plans.iter().find(|plan| plan.id == id)
    }

    pub fn render_image(&self, id: &str) -> Option<&RenderImage> {
        self.render_images.iter().find(|image| image.id == id)
    }

    pub fn kind_of(&self, id: &str) -> Option<AssetKind> {
        if self.floor_plan(id).is_some() {
            Some(AssetKind::FloorPlan)
        } else {
            self.render_image(id).map(|image| AssetKind::Render(image.view))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    FloorPlan,
    Render(RenderView),
}

/// Resolved assets of one unit, as handed to the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAssignment {
    pub unit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan_id: Option<String>,
    #[serde(default)]
    pub render_image_ids: Vec<String>,
}
