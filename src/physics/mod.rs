//! Drop physics: bouncing fall trajectories for animating pieces.
//!
//! Heights are measured in cell units. The board bottom is 0.0, a piece in
//! row `r` rests at `r`, and the board top edge is `ROWS`.

mod mass_fall;
mod restitution;
mod trajectory;

pub use mass_fall::{simulate_mass_fall, MassFall};
pub use restitution::RestitutionModel;
pub use trajectory::{simulate_fall, Trajectory};

use crate::error::ConfigError;
use crate::game::ROWS;

/// Physics parameters, loadable from the `[physics]` TOML section.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Integration step in seconds
    pub time_step: f64,
    /// Downward acceleration in cells per second squared
    pub gravity: f64,
    /// Impacts before a piece comes to rest
    pub bounce_count: u32,
    pub max_restitution: f64,
    pub min_restitution: f64,
    /// Release height at which the restitution reaches its maximum
    pub reference_height: f64,
    /// How far above the board top pieces are released
    pub release_margin: f64,
    /// Distance from the board bottom down to the floor the pieces land on
    /// when the board is cleared
    pub clear_floor_gap: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            time_step: 0.01,
            gravity: 40.0,
            bounce_count: 4,
            max_restitution: 0.55,
            min_restitution: 0.15,
            reference_height: 7.5,
            release_margin: 1.5,
            clear_floor_gap: 2.0,
        }
    }
}

impl PhysicsConfig {
    /// Validate physics values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::Validation(
                "physics.time_step must be > 0".into(),
            ));
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::Validation(
                "physics.gravity must be > 0".into(),
            ));
        }
        if self.bounce_count == 0 {
            return Err(ConfigError::Validation(
                "physics.bounce_count must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_restitution) {
            return Err(ConfigError::Validation(
                "physics.max_restitution must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_restitution) {
            return Err(ConfigError::Validation(
                "physics.min_restitution must be in [0, 1]".into(),
            ));
        }
        if self.min_restitution > self.max_restitution {
            return Err(ConfigError::Validation(
                "physics.min_restitution must be <= physics.max_restitution".into(),
            ));
        }
        if !self.reference_height.is_finite() || self.reference_height <= 0.0 {
            return Err(ConfigError::Validation(
                "physics.reference_height must be > 0".into(),
            ));
        }
        if !self.release_margin.is_finite() || self.release_margin < 0.0 {
            return Err(ConfigError::Validation(
                "physics.release_margin must be >= 0".into(),
            ));
        }
        if !self.clear_floor_gap.is_finite() || self.clear_floor_gap <= 0.0 {
            return Err(ConfigError::Validation(
                "physics.clear_floor_gap must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Validate and freeze into a model that can generate trajectories.
    pub fn build(&self) -> Result<FallModel, ConfigError> {
        self.validate()?;
        Ok(FallModel::from_validated(self.clone()))
    }
}

/// Validated physics parameters. Only obtainable through
/// [`PhysicsConfig::build`], so every trajectory it produces terminates.
#[derive(Debug, Clone)]
pub struct FallModel {
    config: PhysicsConfig,
    restitution: RestitutionModel,
}

impl FallModel {
    fn from_validated(config: PhysicsConfig) -> Self {
        FallModel {
            restitution: RestitutionModel {
                max: config.max_restitution,
                min: config.min_restitution,
                reference_height: config.reference_height,
            },
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn restitution(&self) -> &RestitutionModel {
        &self.restitution
    }

    /// Height of the board's top edge.
    pub fn board_top(&self) -> f64 {
        ROWS as f64
    }

    /// Height where a dropped piece is released.
    pub fn release_height(&self) -> f64 {
        self.board_top() + self.config.release_margin
    }

    /// Trajectory of a piece dropped into a column already holding
    /// `pieces_in_column` pieces.
    pub fn drop_trajectory(&self, pieces_in_column: usize) -> Trajectory {
        let release = self.release_height();
        let rest = (pieces_in_column.min(ROWS)) as f64;
        self.trajectory(release, rest, self.restitution.coefficient(release, pieces_in_column))
    }

    /// Trajectory of a piece at `row` falling to the floor when the board is
    /// cleared. The floor is height 0 and the board bottom sits at
    /// `clear_floor_gap`.
    pub fn clear_trajectory(&self, row: usize) -> Trajectory {
        let release = self.config.clear_floor_gap + row as f64;
        self.trajectory(release, 0.0, self.restitution.coefficient(release, row))
    }

    fn trajectory(&self, release: f64, rest: f64, restitution: f64) -> Trajectory {
        Trajectory::new(
            release,
            rest,
            self.config.bounce_count,
            restitution,
            self.config.time_step,
            self.config.gravity,
        )
    }
}

impl Default for FallModel {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        debug_assert!(config.validate().is_ok(), "default physics must validate");
        FallModel::from_validated(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_physics_is_valid() {
        PhysicsConfig::default()
            .validate()
            .expect("default physics should be valid");
    }

    #[test]
    fn test_default_model_matches_built_default() {
        let built = PhysicsConfig::default().build().unwrap();
        let model = FallModel::default();
        assert_eq!(model.config(), built.config());
        assert_eq!(model.restitution(), built.restitution());
    }

    #[test]
    fn test_validation_rejects_negative_time_step() {
        let config = PhysicsConfig {
            time_step: -0.01,
            ..PhysicsConfig::default()
        };
        assert!(config.build().is_err());
    }

    #[test]
    fn test_validation_rejects_restitution_out_of_range() {
        let config = PhysicsConfig {
            max_restitution: 1.2,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PhysicsConfig {
            min_restitution: -0.1,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_min_above_max() {
        let config = PhysicsConfig {
            min_restitution: 0.8,
            max_restitution: 0.5,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_bounces_and_gravity() {
        let config = PhysicsConfig {
            bounce_count: 0,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_drop_lands_on_stack() {
        let model = FallModel::default();
        for pieces in 0..ROWS {
            let values: Vec<f64> = model.drop_trajectory(pieces).collect();
            let rest = pieces as f64;
            assert!(values.iter().all(|&v| v >= rest && v <= model.release_height()));
            let last = *values.last().unwrap();
            assert!(last - rest < 0.5, "ended at {} above rest {}", last, rest);
        }
    }

    #[test]
    fn test_fuller_column_bounces_less() {
        let model = FallModel::default();
        let peak_above_rest = |pieces: usize| {
            let values: Vec<f64> = model.drop_trajectory(pieces).collect();
            let first_low = values
                .windows(2)
                .position(|w| w[1] > w[0])
                .unwrap();
            values[first_low..]
                .iter()
                .fold(f64::MIN, |a, &b| a.max(b))
                - pieces as f64
        };
        assert!(peak_above_rest(4) < peak_above_rest(0));
    }

    #[test]
    fn test_clear_trajectory_ends_on_floor() {
        let model = FallModel::default();
        let values: Vec<f64> = model.clear_trajectory(3).collect();
        assert_eq!(values[0], model.config().clear_floor_gap + 3.0);
        assert!(values.iter().all(|&v| v >= 0.0));
    }
}
