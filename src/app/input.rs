use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::keymap::{self, KeymapContext};

/// What a key press means to the shell once the keymap has looked at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Save,
    Quit,
    ResetForm,
    ResetStatus,
    DismissDialog,
    FocusStep(i32),
    ValueStep(i32),
    Toggle,
    Confirm,
}

/// Editing keys handed straight to the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyCommand {
    Action(KeyAction),
    Edit(EditKey),
    None,
}

pub(crate) fn classify(context: KeymapContext, key: &KeyEvent) -> KeyCommand {
    if let Some(action) = keymap::classify_key(context, key) {
        return KeyCommand::Action(action);
    }
    if context == KeymapContext::Dialog {
        return KeyCommand::None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return KeyCommand::None;
    }
    let edit = match key.code {
        KeyCode::Char(ch) => EditKey::Char(ch),
        KeyCode::Backspace => EditKey::Backspace,
        KeyCode::Delete => EditKey::Delete,
        KeyCode::Left => EditKey::Left,
        KeyCode::Right => EditKey::Right,
        KeyCode::Home => EditKey::Home,
        KeyCode::End => EditKey::End,
        _ => return KeyCommand::None,
    };
    KeyCommand::Edit(edit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_chords_map_to_actions() {
        assert_eq!(
            classify(
                KeymapContext::Form,
                &key(KeyCode::Char('s'), KeyModifiers::CONTROL)
            ),
            KeyCommand::Action(KeyAction::Save)
        );
        assert_eq!(
            classify(
                KeymapContext::Form,
                &key(KeyCode::Char('x'), KeyModifiers::CONTROL)
            ),
            KeyCommand::None
        );
    }

    #[test]
    fn plain_characters_are_edits() {
        assert_eq!(
            classify(KeymapContext::Form, &key(KeyCode::Char('7'), KeyModifiers::NONE)),
            KeyCommand::Edit(EditKey::Char('7'))
        );
        assert_eq!(
            classify(KeymapContext::Form, &key(KeyCode::Char('B'), KeyModifiers::SHIFT)),
            KeyCommand::Edit(EditKey::Char('B'))
        );
    }

    #[test]
    fn dialog_swallows_everything_but_dismiss() {
        assert_eq!(
            classify(KeymapContext::Dialog, &key(KeyCode::Char('a'), KeyModifiers::NONE)),
            KeyCommand::None
        );
        assert_eq!(
            classify(KeymapContext::Dialog, &key(KeyCode::Esc, KeyModifiers::NONE)),
            KeyCommand::Action(KeyAction::DismissDialog)
        );
    }
}
