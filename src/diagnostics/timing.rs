use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Per-stage timings of one frame, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Run `f`, record its wall time under `label` and return its output with
    /// the elapsed milliseconds.
    pub fn measure<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> (T, f64) {
        let start = Instant::now();
        let out = f();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.push(label, elapsed_ms);
        (out, elapsed_ms)
    }

    /// Elapsed time of the first stage called `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }

    /// Sum of the recorded stage times.
    pub fn stages_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_stage_in_order() {
        let mut timings = TimingBreakdown::default();
        let (value, _) = timings.measure("first", || 7);
        timings.push("second", 1.5);
        assert_eq!(value, 7);
        assert_eq!(timings.stages.len(), 2);
        assert_eq!(timings.stages[0].label, "first");
        assert_eq!(timings.stage_ms("second"), Some(1.5));
        assert!(timings.stages_ms() >= 1.5);
        assert!(timings.stage_ms("missing").is_none());
    }
}
