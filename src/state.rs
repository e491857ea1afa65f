use std::collections::VecDeque;

use rand::Rng;

use crate::clubs::ClubIndex;
use crate::dataset::Dataset;
use crate::density::DensityPlot;
use crate::report::{self, Comparison};

const MAX_LOGS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ClubA,
    ClubB,
}

#[derive(Debug, Clone, Default)]
pub struct ClubPicker {
    pub query: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl ClubPicker {
    pub fn new(index: &ClubIndex) -> Self {
        // Nothing is selected until the user moves or types.
        Self {
            query: String::new(),
            options: index.names(),
            selected: None,
        }
    }

    pub fn push_char(&mut self, ch: char, index: &ClubIndex) {
        self.query.push(ch);
        self.refilter(index);
    }

    pub fn pop_char(&mut self, index: &ClubIndex) {
        if self.query.pop().is_some() {
            self.refilter(index);
        }
    }

    pub fn clear_query(&mut self, index: &ClubIndex) {
        self.query.clear();
        self.refilter(index);
    }

    // A non-empty result selects its first entry; an empty one clears the selection.
    pub fn refilter(&mut self, index: &ClubIndex) {
        self.options = index.search(&self.query);
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }

    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            self.selected = None;
            return;
        }
        let next = match self.selected {
            Some(idx) => (idx + 1).min(self.options.len() - 1),
            None => 0,
        };
        self.selected = Some(next);
    }

    pub fn select_prev(&mut self) {
        if self.options.is_empty() {
            self.selected = None;
            return;
        }
        let prev = match self.selected {
            Some(idx) => idx.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(prev);
    }

    pub fn selection(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub focus: Focus,
    pub picker_a: ClubPicker,
    pub picker_b: ClubPicker,
    pub comparison: Option<Comparison>,
    pub plot: Option<DensityPlot>,
    pub report_text: String,
    pub report_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(index: &ClubIndex) -> Self {
        Self {
            focus: Focus::ClubA,
            picker_a: ClubPicker::new(index),
            picker_b: ClubPicker::new(index),
            comparison: None,
            plot: None,
            report_text: String::new(),
            report_scroll: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn focused_picker_mut(&mut self) -> &mut ClubPicker {
        match self.focus {
            Focus::ClubA => &mut self.picker_a,
            Focus::ClubB => &mut self.picker_b,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::ClubA => Focus::ClubB,
            Focus::ClubB => Focus::ClubA,
        };
    }

    pub fn scroll_report_down(&mut self, lines: u16) {
        let max = self.report_text.lines().count().saturating_sub(1) as u16;
        self.report_scroll = self.report_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_report_up(&mut self, lines: u16) {
        self.report_scroll = self.report_scroll.saturating_sub(lines);
    }

    /// Runs one comparison for the two current selections.
    ///
    /// Selection and lookup problems are reported to the console and leave the
    /// previous result on screen. Returns whether a new result was produced.
    pub fn run_comparison<R: Rng>(
        &mut self,
        dataset: &Dataset,
        index: &ClubIndex,
        rng: &mut R,
    ) -> bool {
        let outcome = report::compare(
            dataset,
            index,
            self.picker_a.selection(),
            self.picker_b.selection(),
        );
        match outcome {
            Ok(comparison) => {
                let plot = DensityPlot::from_head_to_head(&comparison.recent, rng);
                self.push_log(format!(
                    "[INFO] {} vs {}: {} meetings, {} recent",
                    comparison.club_a.name,
                    comparison.club_b.name,
                    comparison.overall.matches,
                    comparison.recent.matches
                ));
                self.report_text = report::render_report(&comparison);
                self.report_scroll = 0;
                self.plot = Some(plot);
                self.comparison = Some(comparison);
                true
            }
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                false
            }
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
