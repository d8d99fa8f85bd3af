//! Driver selection policy.
//!
//! Resolves the open question of how to pick among multiple available
//! drivers. `UniformRandomSelector` is the chosen placeholder policy —
//! swapping in a proximity- or load-aware selector later only requires a
//! new `DriverSelector` impl.

use rand::seq::IteratorRandom;

use crate::contracts::types::Driver;

pub trait DriverSelector: Send + Sync {
    fn select<'a>(&self, candidates: &'a [Driver]) -> Option<&'a Driver>;
}

pub struct UniformRandomSelector;

impl DriverSelector for UniformRandomSelector {
    fn select<'a>(&self, candidates: &'a [Driver]) -> Option<&'a Driver> {
        let mut rng = rand::thread_rng();
        candidates.iter().choose(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::types::DriverStatus;

    fn driver(id: i64) -> Driver {
        Driver {
            driver_id: id,
            name: format!("driver-{id}"),
            phone: "555-0100".into(),
            license_number: "L1".into(),
            vehicle: "van".into(),
            status: DriverStatus::Available,
        }
    }

    #[test]
    fn picks_from_candidates() {
        let candidates = vec![driver(1), driver(2), driver(3)];
        let selector = UniformRandomSelector;
        let chosen = selector.select(&candidates).expect("candidate");
        assert!(candidates.iter().any(|d| d.driver_id == chosen.driver_id));
    }

    #[test]
    fn empty_candidates_yields_none() {
        let selector = UniformRandomSelector;
        assert!(selector.select(&[]).is_none());
    }
}
