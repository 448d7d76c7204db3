//! Offline demo generation.
//!
//! DESIGN
//! ======
//! When the backend is unreachable (or a live generation fails) the dashboard
//! still produces a complete result: the same four sections the service
//! returns, built from deterministic templates around the brief. A short
//! sleep stands in for generation latency. Nothing here can fail.

use std::fmt::Write;
use std::time::Duration;

use crate::backend::http::truncate_chars;
use crate::backend::types::{
    Brief, GenerationResult, MAX_DEPTH, SECTION_FAQ, SECTION_LANDING_PAGE, SECTION_PRD,
    SECTION_VIDEO_SCRIPT,
};

/// Characters of the brief quoted in demo output.
pub const DEMO_BRIEF_CHARS: usize = 120;

/// FAQ entries produced below and at the maximum depth.
pub const DEMO_FAQ_SHORT: usize = 5;
pub const DEMO_FAQ_LONG: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct DemoGenerator {
    delay: Duration,
}

impl DemoGenerator {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Produce stand-in content after the configured delay.
    pub async fn generate(&self, brief: &Brief) -> GenerationResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        demo_sections(&brief.brief, brief.depth)
    }
}

/// Deterministic demo sections for `brief` at `depth`.
#[must_use]
pub fn demo_sections(brief: &str, depth: u8) -> GenerationResult {
    let short = truncate_chars(brief.trim(), DEMO_BRIEF_CHARS);

    let mut result = GenerationResult::new();
    result.insert(SECTION_PRD, format!("Demo PRD for: {short}\n\n(Replace with backend for real AI results.)"));
    result.insert(SECTION_LANDING_PAGE, format!("{short} — headline, subtext, features & CTA."));
    result.insert(SECTION_FAQ, demo_faq(faq_count(depth)));
    result.insert(SECTION_VIDEO_SCRIPT, demo_video_script(&short, depth));
    result
}

#[must_use]
pub fn faq_count(depth: u8) -> usize {
    if depth < MAX_DEPTH { DEMO_FAQ_SHORT } else { DEMO_FAQ_LONG }
}

fn demo_faq(count: usize) -> String {
    (1..=count)
        .map(|i| format!("Q{i}: Example question?\nA: Example answer."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn demo_video_script(short: &str, depth: u8) -> String {
    let mut script = String::new();
    let _ = writeln!(script, "[Scene 1] Hook: {short}");
    let _ = writeln!(script, "[Scene 2] Problem and solution overview.");
    if depth > 1 {
        let _ = writeln!(script, "[Scene 3] Feature walkthrough.");
    }
    let _ = write!(script, "[Closing] Call to action. (Demo script.)");
    script
}

#[cfg(test)]
#[path = "demo_test.rs"]
mod tests;
