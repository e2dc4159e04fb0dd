use crate::game::ROWS;

/// Restitution coefficient as a function of release height and column fill.
///
/// Interpolates linearly between `min` and `max`. A release at or above
/// `reference_height` into an empty column gets `max`; a full column always
/// gets `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestitutionModel {
    pub max: f64,
    pub min: f64,
    pub reference_height: f64,
}

impl RestitutionModel {
    pub fn coefficient(&self, release_height: f64, pieces_in_column: usize) -> f64 {
        let height_factor = (release_height / self.reference_height).clamp(0.0, 1.0);
        let fill = (pieces_in_column as f64 / ROWS as f64).clamp(0.0, 1.0);
        let t = height_factor * (1.0 - fill);
        self.min + (self.max - self.min) * t
    }
}
