//! The outer loop around the engine: cadences, release, pause, statistics.

use crate::control::{Command, Rates};
use crate::framebuffer::Framebuffer;
use anyhow::Result;
use eco_core::EcosystemConfig;
use eco_world::{FrameReport, ReleaseTrigger, RenderOptions, Simulation};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    RatesChanged,
    Quit,
}

pub struct Driver {
    sim: Simulation,
    trigger: ReleaseTrigger,
    framebuffer: Framebuffer,
    rates: Rates,
    options: RenderOptions,
    paused: bool,
    rate_after_release: u32,
    max_steps: Option<u64>,
    total_steps: u64,
    window_steps: u64,
    window_frames: u64,
}

impl Driver {
    pub fn new(config: &EcosystemConfig) -> Result<Self> {
        let mut sim = Simulation::from_config(config)?;
        let mut framebuffer = Framebuffer::new(config.world.width, config.world.height);
        let options = RenderOptions {
            animals_only: config.driver.animals_only,
        };
        sim.render_full(&mut framebuffer, options);

        Ok(Self {
            trigger: ReleaseTrigger::new(config.rules.animal_release_step()),
            sim,
            framebuffer,
            rates: Rates {
                steps_per_second: config.driver.steps_per_second,
                frames_per_second: config.driver.frames_per_second,
                adjust_step: config.driver.rate_adjust_step,
            },
            options,
            paused: false,
            rate_after_release: config.driver.steps_per_second_after_release,
            max_steps: config.driver.max_steps,
            total_steps: 0,
            window_steps: 0,
            window_frames: 0,
        })
    }

    /// Advance one step (or only the clock while paused). Returns true when
    /// the first animal was released and the simulation rate changed.
    pub fn tick_simulation(&mut self) -> bool {
        if self.paused {
            self.sim.idle();
        } else {
            self.sim.step();
        }
        self.total_steps += 1;
        self.window_steps += 1;

        if self.trigger.poll(&mut self.sim) {
            self.rates.steps_per_second = self.rate_after_release;
            debug!(steps_per_second = self.rates.steps_per_second, "Simulation rate lowered");
            return true;
        }
        false
    }

    pub fn tick_render(&mut self) -> FrameReport {
        let report = self.sim.render_frame(&mut self.framebuffer, self.options);
        self.window_frames += 1;
        report
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Quit => Outcome::Quit,
            Command::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "Pause toggled");
                Outcome::Continue
            }
            Command::ToggleAnimalsOnly => {
                self.options.animals_only = !self.options.animals_only;
                self.sim.render_full(&mut self.framebuffer, self.options);
                info!(animals_only = self.options.animals_only, "Render filter toggled");
                Outcome::Continue
            }
            rate_command => {
                self.rates.adjust(rate_command);
                info!(
                    fps = self.rates.frames_per_second,
                    its = self.rates.steps_per_second,
                    "Targets changed"
                );
                Outcome::RatesChanged
            }
        }
    }

    /// Log the frames and steps since the previous call and reset the window
    pub fn log_stats(&mut self) {
        let census = self.sim.census();
        info!(
            clock = self.sim.clock(),
            plants = census.plants,
            animals = census.animals,
            "Frames: {} | Iterations: {}",
            self.window_frames,
            self.window_steps
        );
        self.window_frames = 0;
        self.window_steps = 0;
    }

    pub fn finished(&self) -> bool {
        self.max_steps.is_some_and(|max| self.total_steps >= max)
    }

    pub fn rates(&self) -> Rates {
        self.rates
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

fn ticker(per_second: u32) -> Interval {
    let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(per_second.max(1))));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Drive the simulation until a quit command, the step limit, or `shutdown`
pub async fn run(
    mut driver: Driver,
    mut commands: mpsc::Receiver<Command>,
    stats_interval_secs: u64,
    shutdown: impl std::future::Future<Output = ()>,
) -> Driver {
    tokio::pin!(shutdown);

    let mut steps = ticker(driver.rates.steps_per_second);
    let mut frames = ticker(driver.rates.frames_per_second);
    let mut stats = interval(Duration::from_secs(stats_interval_secs));

    info!(
        its = driver.rates.steps_per_second,
        fps = driver.rates.frames_per_second,
        "Driver loop started"
    );

    loop {
        tokio::select! {
            _ = steps.tick() => {
                if driver.tick_simulation() {
                    steps = ticker(driver.rates.steps_per_second);
                }
                if driver.finished() {
                    info!(steps = driver.total_steps, "Step limit reached");
                    break;
                }
            }
            _ = frames.tick() => {
                driver.tick_render();
            }
            _ = stats.tick() => {
                driver.log_stats();
            }
            Some(command) = commands.recv() => {
                match driver.apply(command) {
                    Outcome::Quit => break,
                    Outcome::RatesChanged => {
                        steps = ticker(driver.rates.steps_per_second);
                        frames = ticker(driver.rates.frames_per_second);
                    }
                    Outcome::Continue => {}
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    driver.tick_render();
    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::{CellKind, DriverConfig, RuleConfig, WorldConfig};

    fn config() -> EcosystemConfig {
        EcosystemConfig {
            world: WorldConfig {
                width: 12,
                height: 12,
            },
            rules: RuleConfig::default(),
            driver: DriverConfig {
                seed: Some(5),
                max_steps: Some(40),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_startup_paints_full_frame() {
        let driver = Driver::new(&config()).unwrap();
        let seed = driver.simulation().grid().seed_index();
        assert_eq!(driver.framebuffer().frames_presented(), 1);
        assert_eq!(driver.framebuffer().cells_painted(), 144);
        assert_eq!(driver.framebuffer().pixel(seed % 12, seed / 12), [128, 128, 128]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.world.height = 2;
        assert!(Driver::new(&config).is_err());
    }

    #[test]
    fn test_pause_only_advances_clock() {
        let mut driver = Driver::new(&config()).unwrap();
        assert_eq!(driver.apply(Command::TogglePause), Outcome::Continue);
        assert!(driver.is_paused());

        let before = driver.simulation().grid().clone();
        for _ in 0..100 {
            driver.tick_simulation();
        }
        assert_eq!(driver.simulation().clock(), 130);
        assert_eq!(driver.simulation().grid(), &before);
    }

    #[test]
    fn test_release_lowers_simulation_rate() {
        let mut config = config();
        config.rules.release_cooldown_multiple = 1;
        let mut driver = Driver::new(&config).unwrap();

        // Clock 30 -> 31 passes the release step of 30
        assert!(driver.tick_simulation());
        assert_eq!(driver.rates().steps_per_second, 20);
        assert_eq!(driver.simulation().census().animals, 1);
        assert!(!driver.tick_simulation());

        let report = driver.tick_render();
        assert!(!report.full);
        assert!(report.painted >= 1);
    }

    #[test]
    fn test_rate_commands() {
        let mut driver = Driver::new(&config()).unwrap();
        assert_eq!(driver.apply(Command::MoreFrames), Outcome::RatesChanged);
        assert_eq!(driver.rates().frames_per_second, 40);
        assert_eq!(driver.rates().steps_per_second, 1000);
        assert_eq!(driver.apply(Command::Quit), Outcome::Quit);
    }

    #[test]
    fn test_toggle_animals_only_repaints() {
        let mut driver = Driver::new(&config()).unwrap();
        driver.apply(Command::ToggleAnimalsOnly);
        assert_eq!(driver.framebuffer().frames_presented(), 2);
        // No animals yet, so only the startup frame painted anything
        assert_eq!(driver.framebuffer().cells_painted(), 144);
        assert!(driver
            .simulation()
            .grid()
            .iter()
            .all(|(_, cell)| cell.kind != CellKind::Animal));
    }

    #[test]
    fn test_step_limit() {
        let mut driver = Driver::new(&config()).unwrap();
        for _ in 0..39 {
            driver.tick_simulation();
        }
        assert!(!driver.finished());
        driver.tick_simulation();
        assert!(driver.finished());
        assert_eq!(driver.total_steps(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_at_step_limit() {
        let (_tx, rx) = mpsc::channel(4);
        let driver = Driver::new(&config()).unwrap();
        let driver = run(driver, rx, 1, std::future::pending::<()>()).await;
        assert_eq!(driver.total_steps(), 40);
        assert_eq!(driver.simulation().clock(), 70);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_quit() {
        let (tx, rx) = mpsc::channel(4);
        let mut config = config();
        config.driver.max_steps = None;
        let driver = Driver::new(&config).unwrap();
        tx.send(Command::Quit).await.unwrap();

        let driver = run(driver, rx, 1, std::future::pending::<()>()).await;
        assert!(driver.total_steps() < 10);
    }
}
