//! Keyboard input handling for the browser.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`]; remember the hint text in
//! [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, View};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc if app.view == View::Sources => app.quit = true,
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => app.back(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.open(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;
    use crate::app::tests::sample_index;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_opens_and_esc_goes_back_then_quits() {
        let index = sample_index();
        let mut app = App::new(&index);

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.view, View::Items);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.view, View::Sources);
        assert!(!app.quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[test]
    fn vim_keys_navigate() {
        let index = sample_index();
        let mut app = App::new(&index);

        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.source_state.selected(), Some(1));
        handle_key_event(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.source_state.selected(), Some(0));
        handle_key_event(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.source_state.selected(), Some(1));
    }

    #[test]
    fn release_events_are_ignored() {
        let index = sample_index();
        let mut app = App::new(&index);

        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
