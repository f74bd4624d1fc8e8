//! Composite Weight Tables
//!
//! Every skill check in the engine reduces a player to one 0-100 composite:
//! a weighted average over a handful of the 25 base attributes. The tables
//! live here, in one place, and are validated once when the config loads.

use crate::error::ConfigError;
use crate::models::{Attribute, ShotType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowed drift of a table's total from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Attribute -> weight. Serialized as a plain map (`{"height": 0.35, ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Attribute, f32>);

impl WeightTable {
    pub fn new(entries: &[(Attribute, f32)]) -> Self {
        Self(entries.iter().copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f32)> + '_ {
        self.0.iter().map(|(a, w)| (*a, *w))
    }

    pub fn weight(&self, attribute: Attribute) -> f32 {
        self.0.get(&attribute).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self, table: &str) -> Result<(), ConfigError> {
        for (attribute, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    table: table.to_string(),
                    attribute: attribute.to_string(),
                    weight,
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { table: table.to_string(), sum });
        }
        Ok(())
    }
}

/// All composite tables used by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompositeWeights {
    pub three_point: WeightTable,
    pub midrange: WeightTable,
    pub rim: WeightTable,
    /// Perimeter/close-out defense; drives contest distance and FG defense.
    pub contest: WeightTable,
    pub block: WeightTable,
    pub ball_handling: WeightTable,
    /// Defender side of the turnover check and steal credit.
    pub steal: WeightTable,
    pub rebounding: WeightTable,
    pub free_throw: WeightTable,
    pub passing: WeightTable,
    pub jump_ball: WeightTable,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        use Attribute::*;
        Self {
            three_point: WeightTable::new(&[
                (FormTechnique, 0.30),
                (ThrowAccuracy, 0.25),
                (Finesse, 0.15),
                (HandEyeCoordination, 0.15),
                (Balance, 0.10),
                (Composure, 0.05),
            ]),
            midrange: WeightTable::new(&[
                (FormTechnique, 0.25),
                (ThrowAccuracy, 0.25),
                (Finesse, 0.20),
                (HandEyeCoordination, 0.15),
                (Balance, 0.10),
                (Composure, 0.05),
            ]),
            rim: WeightTable::new(&[
                (Finesse, 0.20),
                (Jumping, 0.20),
                (Height, 0.20),
                (CoreStrength, 0.10),
                (Agility, 0.10),
                (HandEyeCoordination, 0.10),
                (Balance, 0.10),
            ]),
            contest: WeightTable::new(&[
                (Agility, 0.20),
                (Reactions, 0.20),
                (Height, 0.15),
                (Jumping, 0.10),
                (Awareness, 0.20),
                (Determination, 0.15),
            ]),
            block: WeightTable::new(&[
                (Height, 0.35),
                (Jumping, 0.30),
                (Reactions, 0.20),
                (Awareness, 0.15),
            ]),
            ball_handling: WeightTable::new(&[
                (HandEyeCoordination, 0.25),
                (Agility, 0.15),
                (Composure, 0.20),
                (Awareness, 0.15),
                (Deception, 0.15),
                (Balance, 0.10),
            ]),
            steal: WeightTable::new(&[
                (Reactions, 0.30),
                (Agility, 0.20),
                (Awareness, 0.25),
                (HandEyeCoordination, 0.15),
                (Acceleration, 0.10),
            ]),
            rebounding: WeightTable::new(&[
                (Height, 0.25),
                (Jumping, 0.25),
                (CoreStrength, 0.15),
                (GripStrength, 0.10),
                (Awareness, 0.15),
                (Determination, 0.10),
            ]),
            free_throw: WeightTable::new(&[
                (FormTechnique, 0.35),
                (ThrowAccuracy, 0.25),
                (Composure, 0.25),
                (Consistency, 0.15),
            ]),
            passing: WeightTable::new(&[
                (ThrowAccuracy, 0.25),
                (Creativity, 0.25),
                (Teamwork, 0.25),
                (Awareness, 0.25),
            ]),
            jump_ball: WeightTable::new(&[(Height, 0.50), (Jumping, 0.40), (Reactions, 0.10)]),
        }
    }
}

impl CompositeWeights {
    /// Shooting table for a shot type.
    pub fn shot(&self, shot_type: ShotType) -> &WeightTable {
        match shot_type {
            ShotType::ThreePoint => &self.three_point,
            ShotType::Midrange => &self.midrange,
            ShotType::Rim => &self.rim,
        }
    }

    pub fn tables(&self) -> [(&'static str, &WeightTable); 11] {
        [
            ("three_point", &self.three_point),
            ("midrange", &self.midrange),
            ("rim", &self.rim),
            ("contest", &self.contest),
            ("block", &self.block),
            ("ball_handling", &self.ball_handling),
            ("steal", &self.steal),
            ("rebounding", &self.rebounding),
            ("free_throw", &self.free_throw),
            ("passing", &self.passing),
            ("jump_ball", &self.jump_ball),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, table) in self.tables() {
            table.validate(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_sum_to_one() {
        let weights = CompositeWeights::default();
        for (name, table) in weights.tables() {
            assert!((table.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE, "{} sums to {}", name, table.sum());
        }
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_bad_sum_is_reported() {
        let table = WeightTable::new(&[(Attribute::Height, 0.6), (Attribute::Jumping, 0.6)]);
        match table.validate("block") {
            Err(ConfigError::WeightSum { table, sum }) => {
                assert_eq!(table, "block");
                assert!((sum - 1.2).abs() < 1e-5);
            }
            other => panic!("expected WeightSum, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_weight_is_reported() {
        let table = WeightTable::new(&[(Attribute::Height, 1.2), (Attribute::Jumping, -0.2)]);
        assert!(matches!(table.validate("t"), Err(ConfigError::InvalidWeight { .. })));
    }

    #[test]
    fn test_table_serializes_as_attribute_map() {
        let table = WeightTable::new(&[(Attribute::Height, 0.5), (Attribute::Jumping, 0.5)]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"jumping":0.5,"height":0.5}"#);

        let back: WeightTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
