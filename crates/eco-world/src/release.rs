//! One-time scripted release of the first animal.

use crate::rng::RandomSource;
use crate::simulation::Simulation;
use eco_core::Step;

#[derive(Debug, Clone)]
pub struct ReleaseTrigger {
    release_step: Step,
    released: bool,
}

impl ReleaseTrigger {
    pub fn new(release_step: Step) -> Self {
        Self {
            release_step,
            released: false,
        }
    }

    /// Release the animal the first time the clock has passed the release
    /// step. Returns true only on that call.
    pub fn poll<R: RandomSource>(&mut self, sim: &mut Simulation<R>) -> bool {
        if self.released || sim.clock() <= self.release_step {
            return false;
        }

        sim.release_animal();
        self.released = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use eco_core::{CellKind, RuleConfig, WorldConfig};

    #[test]
    fn test_fires_exactly_once_after_threshold() {
        let world = WorldConfig { width: 10, height: 10 };
        let mut sim = Simulation::new(&world, RuleConfig::default(), ScriptedRng::new()).unwrap();
        let mut trigger = ReleaseTrigger::new(33);

        // Clock starts at 30
        for _ in 0..3 {
            sim.idle();
            assert!(!trigger.poll(&mut sim));
        }
        assert_eq!(sim.clock(), 33);
        assert_eq!(sim.census().animals, 0);

        sim.idle();
        assert!(trigger.poll(&mut sim));
        assert!(trigger.has_fired());
        assert_eq!(sim.grid().get(55).kind, CellKind::Animal);

        sim.idle();
        assert!(!trigger.poll(&mut sim));
        assert_eq!(sim.dirty_mut().drain(), vec![55]);
    }

    #[test]
    fn test_default_release_step() {
        let trigger = ReleaseTrigger::new(RuleConfig::default().animal_release_step());
        assert_eq!(trigger.release_step, 3600);
        assert!(!trigger.has_fired());
    }
}
