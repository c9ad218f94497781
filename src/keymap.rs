#![forbid(unsafe_code)]

use ftui::prelude::*;

/// Logical command surface. Keys are a binding layer on top; screens
/// only ever see these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Back,
    Open,
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    ToggleSelect,
    Select,
    Deselect,
    SelectAll,
    DeselectAll,
    GoHome,
    Refresh,
    RunShell,
    ShowHelp,
    ShowFileInfo,
    ViewBinary,
    Quit,
}

pub fn action_for(code: KeyCode, modifiers: Modifiers) -> Option<Action> {
    let ctrl = modifiers.contains(Modifiers::CTRL);
    let alt = modifiers.contains(Modifiers::ALT);
    Some(match code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::F(10) => Action::Quit,
        KeyCode::Char('r') if ctrl => Action::Refresh,
        KeyCode::F(5) => Action::Refresh,
        KeyCode::Up if ctrl => Action::GoToStart,
        KeyCode::Down if ctrl => Action::GoToEnd,
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::Left | KeyCode::Escape => Action::Back,
        KeyCode::Right => Action::Open,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::GoToStart,
        KeyCode::End => Action::GoToEnd,
        KeyCode::Enter | KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('=') if alt => Action::SelectAll,
        KeyCode::Char('-') if alt => Action::DeselectAll,
        KeyCode::Char('+') => Action::Select,
        KeyCode::Char('-') => Action::Deselect,
        KeyCode::Char('~') => Action::GoHome,
        KeyCode::Char('$') => Action::RunShell,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('#') => Action::ViewBinary,
        KeyCode::Tab => Action::ShowFileInfo,
        _ => return None,
    })
}

/// Each row names the actions it describes so a binding added without a
/// help line fails the coverage test below.
const HELP: &[(&str, &str, &[Action])] = &[
    ("up/down", "move cursor", &[Action::MoveUp, Action::MoveDown]),
    ("pgup/pgdn", "move cursor one page", &[Action::PageUp, Action::PageDown]),
    ("home/end, ctrl+up/down", "move cursor to start or end", &[Action::GoToStart, Action::GoToEnd]),
    ("right", "open folder or view file", &[Action::Open]),
    ("left/esc", "go back", &[Action::Back]),
    ("enter/space", "toggle selection", &[Action::ToggleSelect]),
    ("+ / -", "select / deselect entry", &[Action::Select, Action::Deselect]),
    ("alt+= / alt+-", "select / deselect all entries", &[Action::SelectAll, Action::DeselectAll]),
    ("~", "go to home folder", &[Action::GoHome]),
    ("ctrl+r, f5", "refresh listing", &[Action::Refresh]),
    ("$", "run shell in current folder", &[Action::RunShell]),
    ("tab", "view file information", &[Action::ShowFileInfo]),
    ("#", "view file bytes", &[Action::ViewBinary]),
    ("?", "show this help", &[Action::ShowHelp]),
    ("ctrl+c, f10", "quit", &[Action::Quit]),
];

/// Help screen body, generated from the binding table.
pub fn help_text() -> String {
    let mut s = String::from("burrow key bindings\n\n");
    for (keys, what, _) in HELP {
        s.push_str(&format!("  {keys:<24} {what}\n"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_map_to_navigation() {
        let none = Modifiers::empty();
        assert_eq!(action_for(KeyCode::Up, none), Some(Action::MoveUp));
        assert_eq!(action_for(KeyCode::Left, none), Some(Action::Back));
        assert_eq!(action_for(KeyCode::Escape, none), Some(Action::Back));
        assert_eq!(action_for(KeyCode::Right, none), Some(Action::Open));
        assert_eq!(action_for(KeyCode::Char('~'), none), Some(Action::GoHome));
        assert_eq!(action_for(KeyCode::Char('x'), none), None);
    }

    #[test]
    fn modifiers_change_the_action() {
        let none = Modifiers::empty();
        assert_eq!(action_for(KeyCode::Char('-'), none), Some(Action::Deselect));
        assert_eq!(action_for(KeyCode::Char('-'), Modifiers::ALT), Some(Action::DeselectAll));
        assert_eq!(action_for(KeyCode::Up, Modifiers::CTRL), Some(Action::GoToStart));
        assert_eq!(action_for(KeyCode::Char('c'), Modifiers::CTRL), Some(Action::Quit));
    }

    #[test]
    fn help_mentions_every_binding_group() {
        let help = help_text();
        for (keys, _, _) in HELP {
            assert!(help.contains(keys));
        }
    }

    #[test]
    fn every_action_has_a_help_line() {
        let all = [
            Action::MoveUp,
            Action::MoveDown,
            Action::Back,
            Action::Open,
            Action::PageUp,
            Action::PageDown,
            Action::GoToStart,
            Action::GoToEnd,
            Action::ToggleSelect,
            Action::Select,
            Action::Deselect,
            Action::SelectAll,
            Action::DeselectAll,
            Action::GoHome,
            Action::Refresh,
            Action::RunShell,
            Action::ShowHelp,
            Action::ShowFileInfo,
            Action::ViewBinary,
            Action::Quit,
        ];
        for action in all {
            assert!(
                HELP.iter().any(|(_, _, actions)| actions.contains(&action)),
                "{action:?} has no help line"
            );
        }
    }
}
