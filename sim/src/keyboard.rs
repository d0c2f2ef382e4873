use std::{
    io,
    sync::mpsc::Sender,
    thread::{Builder, JoinHandle},
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, trace};
use logic::pong::Buttons;

/// The five buttons on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ALeft,
    ARight,
    BLeft,
    BRight,
    Reset,
}

const KEYS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Press(Key),
    Release(Key),
    Quit,
}

/// `w`/`s` move player A, the arrow keys player B. `left` moves a paddle up.
pub fn control_for(key: KeyEvent) -> Option<Control> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Control::Quit);
    }
    let button = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Control::Quit),
        KeyCode::Char('w') => Key::ALeft,
        KeyCode::Char('s') => Key::ARight,
        KeyCode::Up => Key::BLeft,
        KeyCode::Down => Key::BRight,
        KeyCode::Char('r') => Key::Reset,
        _ => return None,
    };
    Some(match key.kind {
        KeyEventKind::Release => Control::Release(button),
        KeyEventKind::Press | KeyEventKind::Repeat => Control::Press(button),
    })
}

pub fn spawn_listener(controls: Sender<Control>) -> io::Result<JoinHandle<()>> {
    Builder::new()
        .name("key_listener".to_owned())
        .spawn(move || loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    error!("failed to read terminal event: {err}");
                    let _ = controls.send(Control::Quit);
                    return;
                }
            };
            if let Event::Key(key) = event {
                if let Some(control) = control_for(key) {
                    trace!("{control:?}");
                    if controls.send(control).is_err() {
                        return;
                    }
                }
            }
        })
}

/// Button levels built from key events.
///
/// Most terminals only report presses, so a press holds its button for
/// `hold` and auto-repeat keeps extending it. A release event, where the
/// terminal reports one, lets go straight away.
pub struct Keyboard {
    hold: Duration,
    held_until: [Option<Instant>; KEYS],
}

impl Keyboard {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            held_until: [None; KEYS],
        }
    }

    pub fn apply(&mut self, control: Control, now: Instant) {
        match control {
            Control::Press(key) => self.held_until[key as usize] = Some(now + self.hold),
            Control::Release(key) => self.held_until[key as usize] = None,
            Control::Quit => {}
        }
    }

    fn is_held(&self, key: Key, now: Instant) -> bool {
        self.held_until[key as usize].is_some_and(|until| now < until)
    }

    pub fn buttons(&self, now: Instant) -> Buttons {
        Buttons {
            a_left: self.is_held(Key::ALeft, now),
            a_right: self.is_held(Key::ARight, now),
            b_left: self.is_held(Key::BLeft, now),
            b_right: self.is_held(Key::BRight, now),
            reset: self.is_held(Key::Reset, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use logic::pong::Buttons;

    use crate::keyboard::{control_for, Control, Key, Keyboard};

    const HOLD: Duration = Duration::from_millis(150);

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, kind)
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn key_map() {
        assert_eq!(
            control_for(press(KeyCode::Char('w'))),
            Some(Control::Press(Key::ALeft))
        );
        assert_eq!(
            control_for(press(KeyCode::Down)),
            Some(Control::Press(Key::BRight))
        );
        assert_eq!(
            control_for(key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release)),
            Some(Control::Release(Key::BLeft))
        );
        assert_eq!(
            control_for(key(
                KeyCode::Char('s'),
                KeyModifiers::NONE,
                KeyEventKind::Repeat
            )),
            Some(Control::Press(Key::ARight))
        );
        assert_eq!(control_for(press(KeyCode::Char('q'))), Some(Control::Quit));
        assert_eq!(
            control_for(key(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyEventKind::Press
            )),
            Some(Control::Quit)
        );
        assert_eq!(
            control_for(key(
                KeyCode::Char('r'),
                KeyModifiers::CONTROL,
                KeyEventKind::Press
            )),
            None
        );
        assert_eq!(control_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn press_holds_for_the_window() {
        let start = Instant::now();
        let mut keyboard = Keyboard::new(HOLD);
        keyboard.apply(Control::Press(Key::Reset), start);
        let reset = Buttons {
            reset: true,
            ..Buttons::default()
        };
        assert_eq!(keyboard.buttons(start), reset);
        assert_eq!(keyboard.buttons(start + HOLD / 2), reset);
        assert_eq!(keyboard.buttons(start + HOLD), Buttons::default());
    }

    #[test]
    fn repeat_extends_the_hold() {
        let start = Instant::now();
        let mut keyboard = Keyboard::new(HOLD);
        keyboard.apply(Control::Press(Key::ALeft), start);
        keyboard.apply(Control::Press(Key::ALeft), start + HOLD / 2);
        assert!(keyboard.buttons(start + HOLD).a_left);
        keyboard.apply(Control::Release(Key::ALeft), start + HOLD);
        assert!(!keyboard.buttons(start + HOLD).a_left);
    }
}
