use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player data for the game simulation engine.
///
/// Base attributes are immutable for the duration of a game; everything that
/// changes while the game runs (stamina, fouls, minutes) lives in
/// `engine::game_state::PlayerGameState`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// Missing attributes fall back to 50 at deserialization time.
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position, attributes: PlayerAttributes) -> Self {
        Self { name: name.into(), position, attributes }
    }

    /// Player with every attribute set to `value`.
    pub fn uniform(name: impl Into<String>, position: Position, value: f32) -> Self {
        Self::new(name, position, PlayerAttributes::uniform(value))
    }

    #[inline]
    pub fn attr(&self, attribute: Attribute) -> f32 {
        self.attributes.get(attribute)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

/// Coarse position buckets used for substitution matching and rebound
/// weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionGroup {
    Guard,
    Wing,
    Big,
}

impl Position {
    pub fn group(&self) -> PositionGroup {
        match self {
            Position::PG | Position::SG => PositionGroup::Guard,
            Position::SF => PositionGroup::Wing,
            Position::PF | Position::C => PositionGroup::Big,
        }
    }

    pub fn is_guard(&self) -> bool {
        self.group() == PositionGroup::Guard
    }

    pub fn is_big(&self) -> bool {
        self.group() == PositionGroup::Big
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCategory {
    Physical,
    Mental,
    Technical,
}

/// The 25 named ratings every player carries.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    // Physical
    GripStrength,
    ArmStrength,
    CoreStrength,
    Agility,
    Acceleration,
    TopSpeed,
    Jumping,
    Reactions,
    Stamina,
    Balance,
    Height,
    Durability,
    // Mental
    Awareness,
    Creativity,
    Determination,
    Bravery,
    Consistency,
    Composure,
    Patience,
    // Technical
    HandEyeCoordination,
    ThrowAccuracy,
    FormTechnique,
    Finesse,
    Deception,
    Teamwork,
}

impl Attribute {
    pub const ALL: [Attribute; 25] = [
        Attribute::GripStrength,
        Attribute::ArmStrength,
        Attribute::CoreStrength,
        Attribute::Agility,
        Attribute::Acceleration,
        Attribute::TopSpeed,
        Attribute::Jumping,
        Attribute::Reactions,
        Attribute::Stamina,
        Attribute::Balance,
        Attribute::Height,
        Attribute::Durability,
        Attribute::Awareness,
        Attribute::Creativity,
        Attribute::Determination,
        Attribute::Bravery,
        Attribute::Consistency,
        Attribute::Composure,
        Attribute::Patience,
        Attribute::HandEyeCoordination,
        Attribute::ThrowAccuracy,
        Attribute::FormTechnique,
        Attribute::Finesse,
        Attribute::Deception,
        Attribute::Teamwork,
    ];

    pub fn category(&self) -> AttributeCategory {
        use Attribute::*;
        match self {
            GripStrength | ArmStrength | CoreStrength | Agility | Acceleration | TopSpeed
            | Jumping | Reactions | Stamina | Balance | Height | Durability => {
                AttributeCategory::Physical
            }
            Awareness | Creativity | Determination | Bravery | Consistency | Composure
            | Patience => AttributeCategory::Mental,
            HandEyeCoordination | ThrowAccuracy | FormTechnique | Finesse | Deception
            | Teamwork => AttributeCategory::Technical,
        }
    }

    pub fn name(&self) -> &'static str {
        use Attribute::*;
        match self {
            GripStrength => "grip_strength",
            ArmStrength => "arm_strength",
            CoreStrength => "core_strength",
            Agility => "agility",
            Acceleration => "acceleration",
            TopSpeed => "top_speed",
            Jumping => "jumping",
            Reactions => "reactions",
            Stamina => "stamina",
            Balance => "balance",
            Height => "height",
            Durability => "durability",
            Awareness => "awareness",
            Creativity => "creativity",
            Determination => "determination",
            Bravery => "bravery",
            Consistency => "consistency",
            Composure => "composure",
            Patience => "patience",
            HandEyeCoordination => "hand_eye_coordination",
            ThrowAccuracy => "throw_accuracy",
            FormTechnique => "form_technique",
            Finesse => "finesse",
            Deception => "deception",
            Teamwork => "teamwork",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const DEFAULT_ATTRIBUTE: f32 = 50.0;
pub const ATTRIBUTE_MIN: f32 = 0.0;
pub const ATTRIBUTE_MAX: f32 = 100.0;

/// Fixed-shape attribute record (0-100 scale).
///
/// `#[serde(default)]` fills any absent rating with 50, so the default is
/// applied exactly once, when the record is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerAttributes {
    // Physical (12)
    pub grip_strength: f32,
    pub arm_strength: f32,
    pub core_strength: f32,
    pub agility: f32,
    pub acceleration: f32,
    pub top_speed: f32,
    pub jumping: f32,
    pub reactions: f32,
    pub stamina: f32,
    pub balance: f32,
    pub height: f32,
    pub durability: f32,
    // Mental (7)
    pub awareness: f32,
    pub creativity: f32,
    pub determination: f32,
    pub bravery: f32,
    pub consistency: f32,
    pub composure: f32,
    pub patience: f32,
    // Technical (6)
    pub hand_eye_coordination: f32,
    pub throw_accuracy: f32,
    pub form_technique: f32,
    pub finesse: f32,
    pub deception: f32,
    pub teamwork: f32,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(DEFAULT_ATTRIBUTE)
    }
}

impl PlayerAttributes {
    pub fn uniform(value: f32) -> Self {
        Self {
            grip_strength: value,
            arm_strength: value,
            core_strength: value,
            agility: value,
            acceleration: value,
            top_speed: value,
            jumping: value,
            reactions: value,
            stamina: value,
            balance: value,
            height: value,
            durability: value,
            awareness: value,
            creativity: value,
            determination: value,
            bravery: value,
            consistency: value,
            composure: value,
            patience: value,
            hand_eye_coordination: value,
            throw_accuracy: value,
            form_technique: value,
            finesse: value,
            deception: value,
            teamwork: value,
        }
    }

    /// Rating for `attribute`, clamped to 0-100. Non-finite values read as 50.
    pub fn get(&self, attribute: Attribute) -> f32 {
        let raw = *self.slot(attribute);
        if raw.is_finite() {
            raw.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
        } else {
            DEFAULT_ATTRIBUTE
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: f32) {
        *self.slot_mut(attribute) = value;
    }

    /// Builder-style setter.
    pub fn with(mut self, attribute: Attribute, value: f32) -> Self {
        self.set(attribute, value);
        self
    }

    fn slot(&self, attribute: Attribute) -> &f32 {
        use Attribute::*;
        match attribute {
            GripStrength => &self.grip_strength,
            ArmStrength => &self.arm_strength,
            CoreStrength => &self.core_strength,
            Agility => &self.agility,
            Acceleration => &self.acceleration,
            TopSpeed => &self.top_speed,
            Jumping => &self.jumping,
            Reactions => &self.reactions,
            Stamina => &self.stamina,
            Balance => &self.balance,
            Height => &self.height,
            Durability => &self.durability,
            Awareness => &self.awareness,
            Creativity => &self.creativity,
            Determination => &self.determination,
            Bravery => &self.bravery,
            Consistency => &self.consistency,
            Composure => &self.composure,
            Patience => &self.patience,
            HandEyeCoordination => &self.hand_eye_coordination,
            ThrowAccuracy => &self.throw_accuracy,
            FormTechnique => &self.form_technique,
            Finesse => &self.finesse,
            Deception => &self.deception,
            Teamwork => &self.teamwork,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut f32 {
        use Attribute::*;
        match attribute {
            GripStrength => &mut self.grip_strength,
            ArmStrength => &mut self.arm_strength,
            CoreStrength => &mut self.core_strength,
            Agility => &mut self.agility,
            Acceleration => &mut self.acceleration,
            TopSpeed => &mut self.top_speed,
            Jumping => &mut self.jumping,
            Reactions => &mut self.reactions,
            Stamina => &mut self.stamina,
            Balance => &mut self.balance,
            Height => &mut self.height,
            Durability => &mut self.durability,
            Awareness => &mut self.awareness,
            Creativity => &mut self.creativity,
            Determination => &mut self.determination,
            Bravery => &mut self.bravery,
            Consistency => &mut self.consistency,
            Composure => &mut self.composure,
            Patience => &mut self.patience,
            HandEyeCoordination => &mut self.hand_eye_coordination,
            ThrowAccuracy => &mut self.throw_accuracy,
            FormTechnique => &mut self.form_technique,
            Finesse => &mut self.finesse,
            Deception => &mut self.deception,
            Teamwork => &mut self.teamwork,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attributes_default_to_50() {
        let player: Player = serde_json::from_str(
            r#"{"name": "Rookie", "position": "SF", "attributes": {"height": 80}}"#,
        )
        .unwrap();

        assert_eq!(player.attr(Attribute::Height), 80.0);
        for attr in Attribute::ALL.iter().filter(|a| **a != Attribute::Height) {
            assert_eq!(player.attr(*attr), 50.0, "{} should default to 50", attr);
        }
    }

    #[test]
    fn test_absent_attribute_block_defaults() {
        let player: Player =
            serde_json::from_str(r#"{"name": "Walk-on", "position": "PG"}"#).unwrap();
        assert_eq!(player.attributes, PlayerAttributes::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped_on_read() {
        let attrs = PlayerAttributes::default()
            .with(Attribute::Jumping, 140.0)
            .with(Attribute::Agility, -5.0)
            .with(Attribute::Finesse, f32::NAN);

        assert_eq!(attrs.get(Attribute::Jumping), 100.0);
        assert_eq!(attrs.get(Attribute::Agility), 0.0);
        assert_eq!(attrs.get(Attribute::Finesse), 50.0);
    }

    #[test]
    fn test_attribute_categories_cover_25() {
        let physical = Attribute::ALL
            .iter()
            .filter(|a| a.category() == AttributeCategory::Physical)
            .count();
        let mental =
            Attribute::ALL.iter().filter(|a| a.category() == AttributeCategory::Mental).count();
        let technical = Attribute::ALL
            .iter()
            .filter(|a| a.category() == AttributeCategory::Technical)
            .count();

        assert_eq!((physical, mental, technical), (12, 7, 6));
    }

    #[test]
    fn test_attribute_serde_names_match_field_names() {
        for attr in Attribute::ALL {
            let json = serde_json::to_string(&attr).unwrap();
            assert_eq!(json, format!("\"{}\"", attr.name()));
        }
    }
}
