// ============================================================
// Layer 5 — Early stopping
// ============================================================
// Stops training once the monitored loss has failed to beat
// its best value for more than `patience` consecutive epochs.
//
//   loss > best or not finite → step += 1, stop when step > patience
//   loss <= best              → step = 0, best = loss
//
// With patience = 5 training ends on the 6th epoch in a row
// without improvement.

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    verbose:  bool,
    step:     usize,
    best:     f64,
}

impl EarlyStopping {
    pub fn new(patience: usize, verbose: bool) -> Self {
        Self { patience, verbose, step: 0, best: f64::INFINITY }
    }

    /// Record this epoch's loss and report whether training should stop.
    pub fn should_stop(&mut self, loss: f64) -> bool {
        if !loss.is_finite() || loss > self.best {
            self.step += 1;
            if self.step > self.patience {
                if self.verbose {
                    println!("early stopping");
                }
                return true;
            }
        } else {
            self.step = 0;
            self.best = loss;
        }
        false
    }

    pub fn best(&self) -> f64 {
        self.best
    }
}
