//! Simulated progress while a dispatch is in flight
//!
//! The backend reports nothing until it answers, so progress is faked: every
//! tick adds a random increment, clamped to a per-operation cap, and the stage
//! label advances as progress crosses fixed thresholds. The real answer jumps
//! straight to 100.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::endpoints::Operation;

/// Tick behaviour for one operation
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressProfile {
    pub interval: Duration,
    pub increment: RangeInclusive<f64>,
    /// Highest value reachable before [`ProgressSimulator::finish`]
    pub cap: f64,
    /// Stage `i` starts once progress exceeds `(i + 1) * stage_spacing`
    pub stage_spacing: f64,
    pub initial_label: &'static str,
    pub stages: &'static [&'static str],
    pub complete_label: &'static str,
}

const BIAS_STAGES: &[&str] = &[
    "Analyzing content...",
    "Detecting keywords...",
    "Cross-referencing sources...",
    "Generating bias score...",
    "Finalizing report...",
];

const SUMMARY_STAGES: &[&str] = &[
    "Processing content...",
    "Extracting key information...",
    "Analyzing context...",
    "Identifying main points...",
    "Generating summary...",
    "Formatting output...",
];

const TRANSLATE_STAGES: &[&str] = &[
    "Analyzing source text...",
    "Detecting language patterns...",
    "Processing translation...",
    "Applying context understanding...",
    "Refining accuracy...",
    "Finalizing translation...",
];

const NEWS_STAGES: &[&str] = &[
    "Searching news sources...",
    "Analyzing content relevance...",
    "AI processing summaries...",
    "Categorizing articles...",
    "Filtering by quality...",
    "Finalizing results...",
];

const FACT_CHECK_STAGES: &[&str] = &[
    "Extracting claims...",
    "Searching trusted sources...",
    "Cross-referencing evidence...",
    "Scoring credibility...",
    "Finalizing verdict...",
];

impl ProgressProfile {
    pub fn for_operation(op: Operation) -> Self {
        match op {
            Operation::BiasDetection => Self {
                interval: Duration::from_millis(300),
                increment: 5.0..=15.0,
                cap: 90.0,
                stage_spacing: 15.0,
                initial_label: "Initializing analysis...",
                stages: BIAS_STAGES,
                complete_label: "Analysis complete!",
            },
            Operation::Summarize => Self {
                interval: Duration::from_millis(150),
                increment: 5.0..=15.0,
                cap: 80.0,
                stage_spacing: 16.0,
                initial_label: "Initializing summarization...",
                stages: SUMMARY_STAGES,
                complete_label: "Summary complete!",
            },
            Operation::Translate => Self {
                interval: Duration::from_millis(200),
                increment: 2.0..=10.0,
                cap: 95.0,
                stage_spacing: 15.0,
                initial_label: "Initializing translation...",
                stages: TRANSLATE_STAGES,
                complete_label: "Translation complete!",
            },
            Operation::FetchNews => Self {
                interval: Duration::from_millis(200),
                increment: 5.0..=15.0,
                cap: 100.0,
                stage_spacing: 16.0,
                initial_label: "Initializing news search...",
                stages: NEWS_STAGES,
                complete_label: "News fetch complete!",
            },
            Operation::FactCheck => Self {
                interval: Duration::from_millis(250),
                increment: 5.0..=15.0,
                cap: 90.0,
                stage_spacing: 15.0,
                initial_label: "Initializing fact check...",
                stages: FACT_CHECK_STAGES,
                complete_label: "Fact check complete!",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    profile: ProgressProfile,
    progress: f64,
    next_stage: usize,
    label: &'static str,
    finished: bool,
}

impl ProgressSimulator {
    pub fn new(profile: ProgressProfile) -> Self {
        let label = profile.initial_label;
        Self {
            profile,
            progress: 0.0,
            next_stage: 0,
            label,
            finished: false,
        }
    }

    pub fn for_operation(op: Operation) -> Self {
        Self::new(ProgressProfile::for_operation(op))
    }

    pub fn profile(&self) -> &ProgressProfile {
        &self.profile
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one tick using the thread-local RNG
    pub fn tick(&mut self) -> f64 {
        let step = rand::thread_rng().gen_range(self.profile.increment.clone());
        self.advance(step)
    }

    /// Advance by an explicit amount. Clamped to the cap; no-op once finished.
    pub fn advance(&mut self, step: f64) -> f64 {
        if self.finished {
            return self.progress;
        }

        self.progress = (self.progress + step.max(0.0)).min(self.profile.cap);

        // One stage per tick at most, matching the visible pacing.
        if self.next_stage < self.profile.stages.len()
            && self.progress > (self.next_stage + 1) as f64 * self.profile.stage_spacing
        {
            self.label = self.profile.stages[self.next_stage];
            self.next_stage += 1;
        }

        self.progress
    }

    /// The real answer arrived
    pub fn finish(&mut self) {
        self.progress = 100.0;
        self.label = self.profile.complete_label;
        self.finished = true;
    }

    /// Text bar such as `[#####.....]  50%`
    pub fn render_bar(&self, width: usize) -> String {
        let filled = ((self.progress / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            ".".repeat(width - filled),
            self.progress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stages_advance_in_order() {
        let mut sim = ProgressSimulator::for_operation(Operation::BiasDetection);
        assert_eq!(sim.label(), "Initializing analysis...");

        sim.advance(10.0);
        assert_eq!(sim.label(), "Initializing analysis...");

        sim.advance(10.0);
        assert_eq!(sim.label(), "Analyzing content...");

        sim.advance(11.0);
        assert_eq!(sim.label(), "Detecting keywords...");
    }

    #[test]
    fn test_cap_holds_until_finish() {
        let mut sim = ProgressSimulator::for_operation(Operation::Summarize);
        for _ in 0..50 {
            sim.advance(15.0);
        }
        assert_eq!(sim.progress(), 80.0);

        sim.finish();
        assert_eq!(sim.progress(), 100.0);
        assert_eq!(sim.label(), "Summary complete!");

        sim.advance(5.0);
        assert_eq!(sim.progress(), 100.0);
    }

    #[test]
    fn test_render_bar() {
        let mut sim = ProgressSimulator::for_operation(Operation::FetchNews);
        sim.advance(50.0);
        assert_eq!(sim.render_bar(10), "[#####.....]  50%");
    }

    proptest! {
        #[test]
        fn prop_ticks_never_exceed_cap(ticks in 0usize..200) {
            for op in Operation::ALL {
                let mut sim = ProgressSimulator::for_operation(op);
                let mut last = 0.0;
                for _ in 0..ticks {
                    let now = sim.tick();
                    prop_assert!(now >= last);
                    prop_assert!(now <= sim.profile().cap);
                    last = now;
                }
            }
        }
    }
}
