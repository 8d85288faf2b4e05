use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};

use crate::clipboard::Copy;
use crate::player::MediaBackend;

use super::model::{App, CopiedField, Overlay};

/// What the event loop should do after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

impl<B: MediaBackend> App<B> {
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        copier: &Copy,
        now: Instant,
    ) -> KeyOutcome {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }
        if code == KeyCode::Char(' ') {
            self.handle_space();
            return KeyOutcome::Continue;
        }

        match self.overlay {
            Overlay::Picker => self.handle_picker_key(code),
            Overlay::Share => self.handle_share_key(code, copier, now),
            Overlay::None => return self.handle_list_key(code),
        }
        KeyOutcome::Continue
    }

    fn handle_list_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Enter => self.play_selected(),
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.prev(),
            KeyCode::Char('h') | KeyCode::Left => self.player.previous_clip(),
            KeyCode::Char('l') | KeyCode::Right => self.player.next_clip(),
            KeyCode::Char('t') => self.open_picker(),
            KeyCode::Char('s') => self.open_share(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let tenths = c.to_digit(10).unwrap_or(0) as u8;
                self.seek_tenths(tenths);
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.close_overlay(),
            KeyCode::Enter => self.confirm_picker(),
            KeyCode::Down => self.picker_next(),
            KeyCode::Up => self.picker_prev(),
            KeyCode::Backspace => self.pop_filter_char(),
            KeyCode::Char(c) => self.push_filter_char(c),
            _ => {}
        }
    }

    fn handle_share_key(&mut self, code: KeyCode, copier: &Copy, now: Instant) {
        let field = match code {
            KeyCode::Char('c') => CopiedField::Link,
            KeyCode::Char('e') => CopiedField::Embed,
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                self.close_overlay();
                return;
            }
            _ => return,
        };
        if self.copy_field(field, copier, now).is_err() {
            self.show_toast("Copy failed", now);
        }
    }
}
