//! Built-in real-estate unit schema.

use unitsheet_model::{FieldType, Importance, SystemField, ids};

use crate::registry::FieldRegistry;

const CATEGORIES: &[&str] = &[
    "Apartment",
    "Duplex",
    "Penthouse",
    "Townhouse",
    "Twin House",
    "Villa",
    "Chalet",
    "Office",
    "Retail",
    "Clinic",
];

const FINISHING: &[&str] = &[
    "Core & Shell",
    "Semi Finished",
    "Fully Finished",
    "Furnished",
];

const STATUSES: &[&str] = &["Available", "Reserved", "Sold", "Blocked"];

fn field(
    id: &str,
    display_name: &str,
    importance: Importance,
    data_type: FieldType,
    aliases: &[&str],
) -> SystemField {
    SystemField {
        id: id.to_string(),
        display_name: display_name.to_string(),
        importance,
        data_type,
        aliases: aliases.iter().map(|alias| (*alias).to_string()).collect(),
    }
}

fn enumeration(values: &[&str]) -> FieldType {
    FieldType::Enum {
        values: values.iter().map(|value| (*value).to_string()).collect(),
    }
}

pub fn builtin_fields() -> Vec<SystemField> {
    use Importance::{Important, Mandatory, Optional};

    vec![
        field(
            ids::UNIT_CODE,
            "Unit Code",
            Mandatory,
            FieldType::Text,
            &["unit no", "unit number", "unit id", "code", "unit"],
        ),
        field(
            ids::PROJECT,
            "Project",
            Mandatory,
            FieldType::Text,
            &["project name", "compound", "development"],
        ),
        field(
            ids::UNIT_TYPE,
            "Unit Type",
            Mandatory,
            FieldType::Text,
            &["type", "layout", "model"],
        ),
        field(
            ids::AREA,
            "Net BUA (m²)",
            Mandatory,
            FieldType::Number,
            &["net bua", "bua", "built up area", "area", "size", "sqm"],
        ),
        field(
            ids::DEVELOPER,
            "Developer",
            Important,
            FieldType::Text,
            &["developer name", "builder"],
        ),
        field(ids::PHASE, "Phase", Important, FieldType::Text, &["stage", "zone"]),
        field(
            ids::CATEGORY,
            "Property Type",
            Important,
            enumeration(CATEGORIES),
            &["property type", "category", "unit category"],
        ),
        field(
            ids::BEDROOMS,
            "Bedrooms",
            Important,
            FieldType::Number,
            &["beds", "bedroom", "no of bedrooms", "rooms"],
        ),
        field(
            ids::FLOOR,
            "Floor",
            Important,
            FieldType::Number,
            &["floor no", "level", "floor number"],
        ),
        field(
            ids::PRICE,
            "Price",
            Important,
            FieldType::Number,
            &["total price", "unit price", "selling price"],
        ),
        field(
            ids::BUILDING,
            "Building",
            Optional,
            FieldType::Text,
            &["building no", "block", "tower"],
        ),
        field(
            ids::BATHROOMS,
            "Bathrooms",
            Optional,
            FieldType::Number,
            &["baths", "bathroom"],
        ),
        field(
            ids::GARDEN_AREA,
            "Garden Area (m²)",
            Optional,
            FieldType::Number,
            &["garden", "garden area"],
        ),
        field(
            ids::ROOF_AREA,
            "Roof Area (m²)",
            Optional,
            FieldType::Number,
            &["roof", "roof area", "terrace"],
        ),
        field(
            ids::FLOOR_PLAN,
            "Floor Plan",
            Optional,
            FieldType::Text,
            &["plan", "floor plan code"],
        ),
        field(
            ids::FINISHING,
            "Finishing",
            Optional,
            enumeration(FINISHING),
            &["finishing type", "finish"],
        ),
        field(ids::VIEW, "View", Optional, FieldType::Text, &["unit view"]),
        field(
            ids::DELIVERY_DATE,
            "Delivery Date",
            Optional,
            FieldType::Text,
            &["delivery", "handover", "handover date"],
        ),
        field(
            ids::STATUS,
            "Status",
            Optional,
            enumeration(STATUSES),
            &["availability", "unit status"],
        ),
    ]
}

impl FieldRegistry {
    /// Registry holding the built-in unit schema.
    pub fn builtin() -> Self {
        let fields = builtin_fields();
        let index = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.id.clone(), idx))
            .collect();
        Self::from_parts(fields, index)
    }
}
