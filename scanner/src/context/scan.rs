// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{Freq, Mode, ScanPlan};

/// Where the controller is in the plan, and what to command there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub position: usize,
    pub freq: Freq,
    pub mode: Mode,
}

/// Result of advancing to the next position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub target: Target,
    /// The previous sweep visited every position and is ready to be written.
    pub sweep_complete: bool,
}

/// Walks the plan position by position and detects sweep boundaries.
pub(crate) struct ScanManager {
    plan: ScanPlan,
    current: Option<Target>,
    pub(crate) cycles_completed: usize,
}

impl ScanManager {
    pub(crate) fn new(plan: ScanPlan) -> Self {
        Self {
            plan,
            current: None,
            cycles_completed: 0,
        }
    }

    pub(crate) fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    pub(crate) fn next(&mut self) -> Advance {
        let (target, sweep_complete) = match self.current {
            None => (self.first(), false),
            // Step to the next position, wrapping once it passes the end of the plan
            Some(current) => {
                let position = current.position + 1;
                match self.plan.target(position) {
                    Some((freq, mode)) => (Target { position, freq, mode }, false),
                    None => (self.first(), true),
                }
            }
        };

        if sweep_complete {
            self.cycles_completed += 1;
        }
        self.current = Some(target);
        Advance {
            target,
            sweep_complete,
        }
    }

    fn first(&self) -> Target {
        let (freq, mode) = self.plan.first();
        Target {
            position: 0,
            freq,
            mode,
        }
    }
}
