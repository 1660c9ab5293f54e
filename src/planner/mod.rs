//! Preview planning module
//!
//! Turns a timing model into the intervals a player skips and the countdown
//! markers around every cut boundary, then renders both for the player.

use serde::{Deserialize, Serialize};

use crate::domain::model::{
    CaptionLine, CountdownMarker, DiscardInterval, PreviewMode, PreviewPlan, TimingModel,
};

/// Recordings are assumed never to exceed ten hours
pub const MAX_RECORDING_SECONDS: f64 = 10.0 * 3600.0;

/// Seconds of captions on each side of a marker
pub const CAPTION_SPAN_SECONDS: i64 = 15;

const CUT_POINT_TEXT: &str = "=->CUT<-=";

/// Caption padding, expressed at 25 fps
const PRE_PADDING_AT_25: f64 = 12.0;
const POST_PADDING_AT_25: f64 = 13.0;

/// Plans previews for a fixed pair of lead/trail offsets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewPlanner {
    /// Seconds shown before a cut end
    pub lead_seconds: f64,
    /// Seconds shown after a cut start
    pub trail_seconds: f64,
}

impl PreviewPlanner {
    pub fn new(lead_seconds: f64, trail_seconds: f64) -> Self {
        Self {
            lead_seconds,
            trail_seconds,
        }
    }

    /// Build the preview plan for `model`
    pub fn plan(&self, model: &TimingModel, mode: PreviewMode) -> PreviewPlan {
        let (discard, markers) = match mode {
            PreviewMode::BeforeCut => self.plan_before_cut(model),
            PreviewMode::AfterCut => self.plan_after_cut(model),
        };
        PreviewPlan {
            mode,
            fps: model.fps,
            discard,
            markers,
        }
    }

    fn plan_before_cut(&self, model: &TimingModel) -> (Vec<DiscardInterval>, Vec<CountdownMarker>) {
        let cuts = model.cuts_in_seconds();
        let mut discard = Vec::new();
        let mut markers = Vec::new();
        let Some(&(first_start, _)) = cuts.first() else {
            return (discard, markers);
        };

        push_interval(&mut discard, 0.0, (first_start - self.lead_seconds).max(0.0));
        markers.push(marker("Cut #0.Post".to_string(), 0.0));

        for (i, &(start, duration)) in cuts.iter().enumerate() {
            let end = start + duration;
            push_interval(&mut discard, start + self.trail_seconds, end - self.lead_seconds);
            markers.push(marker(format!("Cut #{}.Pre", i + 1), end));

            match cuts.get(i + 1) {
                Some(&(next_start, _)) => {
                    push_interval(&mut discard, end, next_start - self.lead_seconds);
                    markers.push(marker(format!("Cut #{}.Post", i + 1), next_start));
                }
                None => push_interval(&mut discard, end, MAX_RECORDING_SECONDS),
            }
        }

        (discard, markers)
    }

    fn plan_after_cut(&self, model: &TimingModel) -> (Vec<DiscardInterval>, Vec<CountdownMarker>) {
        let mut discard = Vec::new();
        let mut markers = Vec::new();
        let mut position = 0.0;

        for (i, (_, duration)) in model.cuts_in_seconds().into_iter().enumerate() {
            push_interval(
                &mut discard,
                position + self.trail_seconds,
                position + duration - self.lead_seconds,
            );
            position += duration;
            markers.push(marker(format!("Cut #{}", i + 1), position));
        }

        (discard, markers)
    }
}

fn marker(label: String, at_seconds: f64) -> CountdownMarker {
    CountdownMarker { label, at_seconds }
}

/// Inverted intervals mean the shown regions overlap, nothing to skip
fn push_interval(discard: &mut Vec<DiscardInterval>, start: f64, end: f64) {
    if end >= start {
        discard.push(DiscardInterval { start, end });
    }
}

/// Caption burst around every marker of `plan`
pub fn render_captions(plan: &PreviewPlan) -> Vec<CaptionLine> {
    let pre = (PRE_PADDING_AT_25 / 25.0 * plan.fps).round() as i64;
    let post = (POST_PADDING_AT_25 / 25.0 * plan.fps).round() as i64;

    plan.markers
        .iter()
        .flat_map(|marker| {
            (-CAPTION_SPAN_SECONDS..=CAPTION_SPAN_SECONDS).map(move |offset| {
                let frame = ((marker.at_seconds + offset as f64) * plan.fps).round() as i64;
                CaptionLine {
                    start_frame: frame.saturating_sub(pre),
                    end_frame: frame.saturating_add(post),
                    text: caption_text(&marker.label, offset),
                }
            })
        })
        .collect()
}

fn caption_text(label: &str, offset: i64) -> String {
    match offset {
        0 => CUT_POINT_TEXT.to_string(),
        o if o < 0 => format!("{} in {}s", label, -o),
        o => format!("{}s after {}", o, label),
    }
}

/// Subtitle file body, one caption per line
pub fn render_subtitles(plan: &PreviewPlan) -> String {
    render_captions(plan)
        .iter()
        .map(|line| format!("{}\n", line))
        .collect()
}

/// Edit decision list skipping every discard interval
pub fn render_edl(plan: &PreviewPlan) -> String {
    plan.discard
        .iter()
        .map(|interval| format!("{:.6}\t{:.6}\t0\n", interval.start, interval.end))
        .collect()
}
