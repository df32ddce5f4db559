//! Keyboard navigation and event handling
//!
//! Maps keyboard events to viewport actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Slots moved per `h`/`l` press; `H`/`L` move a page.
const SCROLL_STEP: usize = 5;
const PAGE_STEP: usize = 40;

/// Handle keyboard input and update app state
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.quit();
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
        }

        KeyCode::Left | KeyCode::Char('h') => app.scroll_left(SCROLL_STEP),
        KeyCode::Right | KeyCode::Char('l') => app.scroll_right(SCROLL_STEP),
        KeyCode::Char('H') | KeyCode::PageUp => app.scroll_left(PAGE_STEP),
        KeyCode::Char('L') | KeyCode::PageDown => app.scroll_right(PAGE_STEP),

        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

/// Key bindings help text
pub fn key_bindings_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("q / Esc / Ctrl+C", "Quit"),
        ("h/←, l/→", "Scroll"),
        ("H, L", "Scroll a page"),
        ("+ / -", "Zoom"),
        ("0", "Reset view"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::cloud::CloudStyle;
    use kumo_core::data::generate_synthetic_bars;
    use kumo_core::indicators::IchimokuParams;

    fn app() -> App {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        App::new(
            "T",
            generate_synthetic_bars(start, 200, 3),
            IchimokuParams::default(),
            CloudStyle::default(),
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert!(!a.running);

        let mut a = app();
        handle_key_event(&mut a, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!a.running);
    }

    #[test]
    fn scroll_and_reset() {
        let mut a = app();
        press(&mut a, KeyCode::Char('h'));
        press(&mut a, KeyCode::Char('h'));
        assert_eq!(a.viewport.offset, 2 * SCROLL_STEP);
        press(&mut a, KeyCode::Char('l'));
        assert_eq!(a.viewport.offset, SCROLL_STEP);
        press(&mut a, KeyCode::Char('+'));
        press(&mut a, KeyCode::Char('0'));
        assert_eq!(a.viewport, crate::app::Viewport::default());
    }

    #[test]
    fn zoom_keys() {
        let mut a = app();
        let before = a.viewport.zoom;
        press(&mut a, KeyCode::Char('+'));
        assert_eq!(a.viewport.zoom, before + 1);
        press(&mut a, KeyCode::Char('-'));
        press(&mut a, KeyCode::Char('-'));
        assert_eq!(a.viewport.zoom, before - 1);
    }

    #[test]
    fn help_lists_quit() {
        assert!(key_bindings_help().iter().any(|(_, what)| *what == "Quit"));
    }
}
