//! Runtime controls: commands typed on stdin and the two adjustable rates.

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SlowerSimulation,
    FasterSimulation,
    FewerFrames,
    MoreFrames,
    TogglePause,
    ToggleAnimalsOnly,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "1" => Some(Command::SlowerSimulation),
            "2" => Some(Command::FasterSimulation),
            "3" => Some(Command::FewerFrames),
            "4" => Some(Command::MoreFrames),
            "p" => Some(Command::TogglePause),
            "a" => Some(Command::ToggleAnimalsOnly),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Simulation and render cadences, both kept at or above 1 per second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    pub steps_per_second: u32,
    pub frames_per_second: u32,
    pub adjust_step: u32,
}

impl Rates {
    /// Apply a rate command. Returns false for commands that are not about rates.
    pub fn adjust(&mut self, command: Command) -> bool {
        let step = self.adjust_step;
        match command {
            Command::SlowerSimulation => {
                self.steps_per_second = self.steps_per_second.saturating_sub(step)
            }
            Command::FasterSimulation => {
                self.steps_per_second = self.steps_per_second.saturating_add(step)
            }
            Command::FewerFrames => {
                self.frames_per_second = self.frames_per_second.saturating_sub(step)
            }
            Command::MoreFrames => {
                self.frames_per_second = self.frames_per_second.saturating_add(step)
            }
            _ => return false,
        }

        self.steps_per_second = self.steps_per_second.max(1);
        self.frames_per_second = self.frames_per_second.max(1);
        true
    }
}

/// Forward stdin commands to the driver loop.
///
/// Reads on a plain thread so a pending read never holds up runtime shutdown.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => warn!("Unknown command {:?} (use 1-4, p, a, q)", line.trim()),
            }
        }
        debug!("Stdin closed");
    });
}
