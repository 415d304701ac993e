use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::keys::to_key;
use crate::model::{Categories, SnapshotData};

/// One entity's categories, raw and as fractions of the entity's own total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedUsage {
    /// Entity name as spelled in the snapshot.
    pub entity: String,
    /// Sum of the denominator category's counts.
    pub total: f64,
    pub raw: Categories,
    pub shares: Categories,
}

impl NormalizedUsage {
    /// `(label, share)` pairs of one category above `min_share`, largest first.
    pub fn ranked(&self, category: &str, min_share: f64) -> Result<Vec<(String, f64)>> {
        let map = self.shares.get(category).and_then(Value::as_object).ok_or_else(|| Error::MissingCategory {
            entity: self.entity.clone(),
            category: category.to_string(),
        })?;
        let mut rows: Vec<(String, f64)> = map
            .iter()
            .filter_map(|(label, v)| v.as_f64().map(|share| (label.clone(), share)))
            .filter(|(_, share)| *share > min_share)
            .collect();
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
        Ok(rows)
    }

    /// Names of the categories that hold label->count maps.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().filter(|(_, v)| v.is_object()).map(|(k, _)| k.as_str())
    }
}

/// Divide every numeric leaf of every nested category by the entity's
/// `denominator` total. Scalar categories and non-numeric leaves are copied as-is.
///
/// The entity is looked up by exact name first, then by canonical key.
pub fn normalize(raw: &SnapshotData, entity: &str, denominator: &str) -> Result<NormalizedUsage> {
    let (name, categories) = find_entity(raw, entity).ok_or_else(|| Error::UnknownEntity { name: entity.to_string() })?;
    let total = denominator_total(name, categories, denominator)?;

    let mut shares = categories.clone();
    for value in shares.values_mut() {
        if let Value::Object(map) = value {
            for leaf in map.values_mut() {
                if let Some(count) = leaf.as_f64() {
                    *leaf = Value::from(count / total);
                }
            }
        }
    }

    Ok(NormalizedUsage { entity: name.to_string(), total, raw: categories.clone(), shares })
}

fn find_entity<'a>(raw: &'a SnapshotData, entity: &str) -> Option<(&'a String, &'a Categories)> {
    if let Some(found) = raw.data.get_key_value(entity) {
        return Some(found);
    }
    let key = to_key(entity);
    if key.is_empty() {
        return None;
    }
    raw.data.iter().find(|(name, _)| to_key(name) == key)
}

fn denominator_total(entity: &str, categories: &Categories, denominator: &str) -> Result<f64> {
    let map = categories.get(denominator).and_then(Value::as_object).ok_or_else(|| Error::MissingCategory {
        entity: entity.to_string(),
        category: denominator.to_string(),
    })?;
    let total: f64 = map.values().filter_map(Value::as_f64).sum();
    if total > 0.0 {
        Ok(total)
    } else {
        Err(Error::EmptyDenominator { entity: entity.to_string(), category: denominator.to_string() })
    }
}
