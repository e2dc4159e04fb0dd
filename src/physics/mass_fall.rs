use super::{FallModel, Trajectory};

/// Lockstep playback of many trajectories at once.
///
/// Each item is one frame holding the height of every piece, in the order
/// the pieces were given; pieces whose trajectory already ended report
/// `None`. Iteration stops once the longest trajectory is exhausted.
#[derive(Debug)]
pub struct MassFall {
    trajectories: Vec<Option<Trajectory>>,
}

impl Iterator for MassFall {
    type Item = Vec<Option<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut any = false;
        let frame: Vec<Option<f64>> = self
            .trajectories
            .iter_mut()
            .map(|slot| {
                let height = slot.as_mut().and_then(Iterator::next);
                if height.is_none() {
                    *slot = None;
                } else {
                    any = true;
                }
                height
            })
            .collect();
        any.then_some(frame)
    }
}

/// Start a mass fall for pieces resting at the given rows. Each piece falls
/// from its own row through the open board bottom onto the floor.
pub fn simulate_mass_fall(rows: impl IntoIterator<Item = usize>, model: &FallModel) -> MassFall {
    MassFall {
        trajectories: rows
            .into_iter()
            .map(|row| Some(model.clear_trajectory(row)))
            .collect(),
    }
}
