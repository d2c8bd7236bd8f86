//! Process-wide navigation state, owned by the coordinator and passed by
//! reference to every component that reads or mutates it.

use crate::models::ruleset::Ruleset;
use crate::models::search::SearchFilter;
use crate::navigation::stack::ViewStack;
use crate::navigation::view::{View, ViewInstance};

#[derive(Debug, Clone)]
pub struct NavigationContext {
    pub stack: ViewStack,
    ruleset: Ruleset,
    filter: SearchFilter,
    selected_beatmap: Option<i64>,
    /// Bumped whenever something that affects carousel contents changes.
    revision: u64,
}

impl NavigationContext {
    /// Fresh context sitting on the main menu.
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            stack: ViewStack::with_root(View::MainMenu),
            ruleset,
            filter: SearchFilter::default(),
            selected_beatmap: None,
            revision: 0,
        }
    }

    pub fn current(&self) -> Option<&ViewInstance> {
        self.stack.current()
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    /// Switches the active ruleset. Returns the previous one when it changed.
    pub fn set_ruleset(&mut self, ruleset: Ruleset) -> Option<Ruleset> {
        if self.ruleset == ruleset {
            return None;
        }
        let previous = std::mem::replace(&mut self.ruleset, ruleset);
        self.invalidate();
        Some(previous)
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: SearchFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.invalidate();
        }
    }

    /// Clears an active filter, returning the query that was active.
    pub fn clear_filter(&mut self) -> Option<String> {
        if !self.filter.is_active() {
            return None;
        }
        let previous = std::mem::take(&mut self.filter);
        self.invalidate();
        Some(previous.query)
    }

    pub fn selected_beatmap(&self) -> Option<i64> {
        self.selected_beatmap
    }

    pub fn select_beatmap(&mut self, beatmap_id: Option<i64>) {
        self.selected_beatmap = beatmap_id;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Marks derived carousel state as stale.
    pub fn invalidate(&mut self) {
        self.revision += 1;
    }
}
