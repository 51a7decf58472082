//! Fuzzy column-to-field suggestion engine.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Serialize};
use tracing::debug;

use unitsheet_model::{ColumnHint, FieldType, SystemField, ids};

use crate::utils::normalize_text;

/// Score for an exact normalized match against an alias.
const ALIAS_EXACT_SCORE: f64 = 0.98;
const TEXT_ON_NUMERIC_PENALTY: f64 = 0.85;
const NUMBER_ON_TEXT_PENALTY: f64 = 0.8;
const UNIQUE_CODE_BOOST: f64 = 1.05;
const UNIQUE_CODE_RATIO_MIN: f64 = 0.95;

/// Confidence level categories for suggestion quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "strong match",
            Self::Medium => "plausible, review before use",
            Self::Low => "weak match, verify the column",
        }
    }
}

/// Boundaries between confidence levels.
///
/// Below `low` a candidate is not suggested at all.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.85,
            low: 0.75,
        }
    }
}

impl ConfidenceThresholds {
    #[must_use]
    pub fn categorize(&self, confidence: f32) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }
}

/// A suggested column-to-field binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub source_column: String,
    pub field_id: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
}

#[derive(Debug, Clone, Default)]
pub struct MappingResult {
    /// One-to-one suggestions, strongest first.
    pub mappings: Vec<MappingSuggestion>,
    /// Columns without a suggestion above the minimum confidence.
    pub unmapped_columns: Vec<String>,
}

impl MappingResult {
    #[must_use]
    pub fn count_by_level(&self, thresholds: &ConfidenceThresholds) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for mapping in &self.mappings {
            if let Some(level) = thresholds.categorize(mapping.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn suggestion_for(&self, field_id: &str) -> Option<&MappingSuggestion> {
        self.mappings.iter().find(|m| m.field_id == field_id)
    }
}

/// Suggests which sheet column feeds which system field.
///
/// Scores are Jaro-Winkler similarities between the normalized column name
/// and the field id, display name and aliases, adjusted by column hints.
/// Matching is one-to-one: each column and each field is used at most once.
pub struct MappingEngine {
    fields: Vec<SystemField>,
    min_confidence: f32,
    column_hints: BTreeMap<String, ColumnHint>,
    field_patterns: Vec<Vec<String>>,
}

struct Candidate {
    column: String,
    field_idx: usize,
    confidence: f32,
}

impl MappingEngine {
    pub fn new(
        fields: Vec<SystemField>,
        min_confidence: f32,
        column_hints: BTreeMap<String, ColumnHint>,
    ) -> Self {
        let field_patterns = fields.iter().map(field_patterns).collect();
        Self {
            fields,
            min_confidence,
            column_hints,
            field_patterns,
        }
    }

    pub fn suggest(&self, columns: &[String]) -> MappingResult {
        let mut candidates = Vec::new();
        for column in columns {
            let normalized = normalize_text(column);
            if normalized.is_empty() {
                continue;
            }
            let hint = self.column_hints.get(column);
            for (field_idx, field) in self.fields.iter().enumerate() {
                let confidence =
                    self.score(&normalized, field, &self.field_patterns[field_idx], hint);
                candidates.push(Candidate {
                    column: column.clone(),
                    field_idx,
                    confidence,
                });
            }
        }

        // Stable order for equal scores: column order, then field order.
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let mut assigned_fields = BTreeSet::new();
        let mut assigned_columns = BTreeSet::new();
        let mut mappings = Vec::new();
        for candidate in candidates {
            if candidate.confidence < self.min_confidence {
                break;
            }
            if assigned_fields.contains(&candidate.field_idx)
                || assigned_columns.contains(&candidate.column)
            {
                continue;
            }
            assigned_fields.insert(candidate.field_idx);
            assigned_columns.insert(candidate.column.clone());
            mappings.push(MappingSuggestion {
                source_column: candidate.column,
                field_id: self.fields[candidate.field_idx].id.clone(),
                confidence: candidate.confidence,
            });
        }

        let unmapped_columns: Vec<String> = columns
            .iter()
            .filter(|column| !assigned_columns.contains(*column))
            .cloned()
            .collect();
        debug!(
            suggested = mappings.len(),
            unmapped = unmapped_columns.len(),
            "column suggestions"
        );
        MappingResult {
            mappings,
            unmapped_columns,
        }
    }

    fn score(
        &self,
        normalized: &str,
        field: &SystemField,
        patterns: &[String],
        hint: Option<&ColumnHint>,
    ) -> f32 {
        let alias_count = field.aliases.len();
        let mut best = 0.0f64;
        for (idx, pattern) in patterns.iter().enumerate() {
            let is_alias = idx >= patterns.len() - alias_count;
            let score = if pattern == normalized {
                if is_alias { ALIAS_EXACT_SCORE } else { 1.0 }
            } else {
                jaro_winkler::similarity(normalized.chars(), pattern.chars())
            };
            best = best.max(score);
        }

        if let Some(hint) = hint
            && best < 1.0
        {
            let numeric_field = matches!(field.data_type, FieldType::Number);
            if hint.is_numeric && !numeric_field {
                best *= TEXT_ON_NUMERIC_PENALTY;
            } else if !hint.is_numeric && numeric_field && hint.null_ratio < 1.0 {
                best *= NUMBER_ON_TEXT_PENALTY;
            }
            if field.id == ids::UNIT_CODE && hint.unique_ratio >= UNIQUE_CODE_RATIO_MIN {
                best = (best * UNIQUE_CODE_BOOST).min(0.99);
            }
        }
        best as f32
    }
}

/// Normalized spellings of a field: id, display name, then aliases.
fn field_patterns(field: &SystemField) -> Vec<String> {
    let mut patterns = vec![normalize_text(&field.id), normalize_text(&field.display_name)];
    patterns.extend(field.aliases.iter().map(|alias| normalize_text(alias)));
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitsheet_model::Importance;

    fn number_field(id: &str, name: &str) -> SystemField {
        SystemField::new(id, name, Importance::Important, FieldType::Number).unwrap()
    }

    #[test]
    fn thresholds_categorize() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(0.99), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(0.9), Some(ConfidenceLevel::Medium));
        assert_eq!(thresholds.categorize(0.8), Some(ConfidenceLevel::Low));
        assert_eq!(thresholds.categorize(0.1), None);
    }

    #[test]
    fn exact_display_name_scores_one() {
        let field = number_field("area", "Net BUA (m²)");
        let engine = MappingEngine::new(vec![field.clone()], 0.5, BTreeMap::new());
        let score = engine.score("net bua", &field, &field_patterns(&field), None);
        assert!((score - 1.0).abs() < f32::EPSILON);
    }
}
