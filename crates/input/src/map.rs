//! Key and mouse mapping from terminal events to player commands.

use crate::types::{PointerEvent, PointerKind, UiCommand, BOARD_WIDTH};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Map keyboard input to a command.
///
/// On game screens the horizontal keys move the hover arrow and the activation
/// keys drop a piece; elsewhere they adjust the focused slider and press the
/// focused target.
pub fn handle_key_event(key: KeyEvent, game_screen: bool) -> Option<UiCommand> {
    match key.code {
        // Focus
        KeyCode::Tab => Some(UiCommand::FocusNext),
        KeyCode::BackTab => Some(UiCommand::FocusPrev),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(UiCommand::FocusPrev),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            if game_screen {
                Some(UiCommand::DropHovered)
            } else {
                Some(UiCommand::FocusNext)
            }
        }

        // Horizontal
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            if game_screen {
                Some(UiCommand::HoverStep(-1))
            } else {
                Some(UiCommand::SliderStep(-1))
            }
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            if game_screen {
                Some(UiCommand::HoverStep(1))
            } else {
                Some(UiCommand::SliderStep(1))
            }
        }
        KeyCode::PageDown if !game_screen => Some(UiCommand::SliderStep(-10)),
        KeyCode::PageUp if !game_screen => Some(UiCommand::SliderStep(10)),

        // Activation
        KeyCode::Enter | KeyCode::Char(' ') => {
            if game_screen {
                Some(UiCommand::DropHovered)
            } else {
                Some(UiCommand::Activate)
            }
        }
        KeyCode::Esc | KeyCode::Backspace => Some(UiCommand::Escape),

        // Direct column drop
        KeyCode::Char(c @ '1'..='9') if game_screen => {
            let column = c as u8 - b'1';
            (column < BOARD_WIDTH).then_some(UiCommand::DropColumn(column))
        }

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Map a mouse event to a pointer event. Only the left button is used.
pub fn handle_mouse_event(event: MouseEvent) -> Option<PointerEvent> {
    let kind = match event.kind {
        MouseEventKind::Moved => PointerKind::Move,
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Press,
        MouseEventKind::Drag(MouseButton::Left) => PointerKind::Drag,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Release,
        _ => return None,
    };
    Some(PointerEvent {
        kind,
        x: event.column,
        y: event.row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_focus_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Tab), false),
            Some(UiCommand::FocusNext)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up), false),
            Some(UiCommand::FocusPrev)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down), false),
            Some(UiCommand::FocusNext)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter), false),
            Some(UiCommand::Activate)
        );
    }

    #[test]
    fn test_horizontal_keys_depend_on_screen() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left), false),
            Some(UiCommand::SliderStep(-1))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left), true),
            Some(UiCommand::HoverStep(-1))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('L')), true),
            Some(UiCommand::HoverStep(1))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::PageUp), false),
            Some(UiCommand::SliderStep(10))
        );
    }

    #[test]
    fn test_game_drop_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' ')), true),
            Some(UiCommand::DropHovered)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down), true),
            Some(UiCommand::DropHovered)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('1')), true),
            Some(UiCommand::DropColumn(0))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('7')), true),
            Some(UiCommand::DropColumn(6))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('8')), true), None);
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('3')), false), None);
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Esc), true),
            Some(UiCommand::Escape)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }

    #[test]
    fn test_mouse_mapping() {
        let ev = |kind| MouseEvent {
            kind,
            column: 12,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            handle_mouse_event(ev(MouseEventKind::Down(MouseButton::Left))),
            Some(PointerEvent {
                kind: PointerKind::Press,
                x: 12,
                y: 4
            })
        );
        assert_eq!(
            handle_mouse_event(ev(MouseEventKind::Moved)).map(|p| p.kind),
            Some(PointerKind::Move)
        );
        assert_eq!(handle_mouse_event(ev(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(handle_mouse_event(ev(MouseEventKind::ScrollUp)), None);
    }
}
