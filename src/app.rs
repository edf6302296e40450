//! Browser state over one run's results: the focused list and its selection.

use ratatui::widgets::ListState;

use crate::index::ResultIndex;
use crate::source::{FeedItem, FeedSnapshot};

/// Which list has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Sources,
    Items,
}

/// State of the post-run browser.  Read-only over the run's results.
pub struct App<'a> {
    /// Updated sources, in registry order.
    pub sources: Vec<&'a FeedSnapshot>,
    pub view: View,
    pub source_state: ListState,
    pub item_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    pub status: String,
}

impl<'a> App<'a> {
    pub fn new(index: &'a ResultIndex) -> Self {
        let sources = index.updated().unwrap_or_default();
        let mut source_state = ListState::default();
        if !sources.is_empty() {
            source_state.select(Some(0));
        }
        let status = format!("{} updated sources", sources.len());

        Self {
            sources,
            view: View::Sources,
            source_state,
            item_state: ListState::default(),
            quit: false,
            status,
        }
    }

    pub fn selected_source(&self) -> Option<&'a FeedSnapshot> {
        self.source_state
            .selected()
            .and_then(|i| self.sources.get(i))
            .copied()
    }

    pub fn selected_item(&self) -> Option<&'a FeedItem> {
        let source = self.selected_source()?;
        self.item_state.selected().and_then(|i| source.items.get(i))
    }

    /// Drill into the selected source's items.
    pub fn open(&mut self) {
        if self.view != View::Sources {
            return;
        }
        let Some(source) = self.selected_source() else {
            return;
        };
        self.view = View::Items;
        self.item_state = ListState::default();
        if !source.items.is_empty() {
            self.item_state.select(Some(0));
        }
        self.status = format!("{}: {} new items", source.display_name, source.items.len());
    }

    /// Back to the sources list.
    pub fn back(&mut self) {
        if self.view == View::Items {
            self.view = View::Sources;
            self.status = format!("{} updated sources", self.sources.len());
        }
    }

    // -- navigation ----------------------------------------------------------

    fn focused(&mut self) -> (usize, &mut ListState) {
        match self.view {
            View::Sources => (self.sources.len(), &mut self.source_state),
            View::Items => {
                let len = self.selected_source().map_or(0, |s| s.items.len());
                (len, &mut self.item_state)
            }
        }
    }

    pub fn select_next(&mut self) {
        let (len, state) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        let (len, state) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        let (len, state) = self.focused();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let (len, state) = self.focused();
        if len > 0 {
            state.select(Some(len - 1));
        }
    }
}
