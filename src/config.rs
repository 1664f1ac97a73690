use serde::{Deserialize, Serialize};

use crate::animation::{Entrance, Transition};
use crate::error::ConfigError;
use crate::grid::GridLayout;
use crate::sensor::Sensors;

/// Tunables of a [`ReorderGrid`](crate::ReorderGrid). Every field has a default, so a TOML file
/// only needs to name what it changes.
///
/// ```
/// use egui_dnd_grid::GridConfig;
///
/// let config = GridConfig::from_toml_str("gap = 12.0\n[sensors.mouse.activation]\nkind = \"distance\"\ndistance = 5.0").unwrap();
/// assert_eq!(config.gap, 12.0);
/// assert_eq!(config.min_column_width, 350.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub min_column_width: f32,
    pub gap: f32,
    /// Height assumed for a card until it has been drawn once.
    pub estimated_item_height: f32,
    /// Margin between the grid background and the cards.
    pub margin: f32,
    /// How neighbours slide out of the way while sorting.
    pub transition: Transition,
    /// How the overlay settles into its slot after a drop.
    pub drop_animation: Transition,
    pub entrance: Entrance,
    pub sensors: Sensors,
    /// Scale the overlay to the size of the slot it is over.
    pub adjust_scale: bool,
    pub cancel_on_escape: bool,
    /// Opacity of the card left behind in the grid while its overlay is dragged around.
    pub placeholder_opacity: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_column_width: 350.0,
            gap: 24.0,
            estimated_item_height: 160.0,
            margin: 4.0,
            transition: Transition::default(),
            drop_animation: Transition::default(),
            entrance: Entrance::default(),
            sensors: Sensors::default(),
            adjust_scale: true,
            cancel_on_escape: true,
            placeholder_opacity: 0.4,
        }
    }
}

impl GridConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_column_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_column_width must be positive, got {}",
                self.min_column_width
            )));
        }
        if self.gap < 0.0 || self.margin < 0.0 {
            return Err(ConfigError::Invalid("gap and margin must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&self.placeholder_opacity) {
            return Err(ConfigError::Invalid(format!(
                "placeholder_opacity must be within 0..=1, got {}",
                self.placeholder_opacity
            )));
        }
        Ok(())
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            min_column_width: self.min_column_width,
            gap: self.gap,
        }
    }
}
