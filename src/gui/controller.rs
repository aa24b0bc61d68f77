use std::time::Instant;

use kiss3d::event::{Action, Key, WindowEvent};

use crate::model::{Command, Control};

// Key config, all in one place
const KEY_FORWARD: Key = Key::W;
const KEY_BACKWARD: Key = Key::S;
const KEY_YAW_LEFT: Key = Key::A;
const KEY_YAW_RIGHT: Key = Key::D;
const KEY_STRAFE_LEFT: Key = Key::Q;
const KEY_STRAFE_RIGHT: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TIME_FASTER: Key = Key::Equals;
const KEY_TIME_SLOWER: Key = Key::Minus;
const KEY_TOGGLE_ORBITS: Key = Key::O;
const KEY_TOGGLE_VIEW: Key = Key::U;
const KEY_RESET: Key = Key::T;
const KEY_SAVE: Key = Key::B;
const KEY_LOAD: Key = Key::N;

/// What a window event asks of the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Session(Command),
    Save,
    Load,
}

pub struct Controller {
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn translate(&self, event: &WindowEvent) -> Option<Request> {
        let command = match *event {
            WindowEvent::CursorPos(x, y, _) => Command::Mouse(x as f32, y as f32),
            WindowEvent::Key(key, Action::Press, _) => {
                if let Some(control) = held_control(key) {
                    Command::Press(control)
                } else if let Some(digit) = planet_key(key) {
                    Command::SelectPlanet(digit)
                } else {
                    match key {
                        KEY_SPEED_UP => Command::SpeedUp,
                        KEY_SLOW_DOWN => Command::SlowDown,
                        KEY_TIME_FASTER => Command::TimeFaster,
                        KEY_TIME_SLOWER => Command::TimeSlower,
                        KEY_TOGGLE_ORBITS => Command::ToggleOrbits,
                        KEY_TOGGLE_VIEW => Command::ToggleView,
                        KEY_RESET => Command::Reset,
                        KEY_SAVE => return Some(Request::Save),
                        KEY_LOAD => return Some(Request::Load),
                        _ => return None,
                    }
                }
            }
            WindowEvent::Key(key, Action::Release, _) => Command::Release(held_control(key)?),
            _ => return None,
        };
        Some(Request::Session(command))
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}

fn held_control(key: Key) -> Option<Control> {
    let control = match key {
        KEY_FORWARD => Control::Forward,
        KEY_BACKWARD => Control::Backward,
        KEY_YAW_LEFT => Control::YawLeft,
        KEY_YAW_RIGHT => Control::YawRight,
        KEY_STRAFE_LEFT => Control::Left,
        KEY_STRAFE_RIGHT => Control::Right,
        _ => return None,
    };
    Some(control)
}

fn planet_key(key: Key) -> Option<char> {
    let digit = match key {
        Key::Key1 | Key::Numpad1 => '1',
        Key::Key2 | Key::Numpad2 => '2',
        Key::Key3 | Key::Numpad3 => '3',
        Key::Key4 | Key::Numpad4 => '4',
        Key::Key5 | Key::Numpad5 => '5',
        Key::Key6 | Key::Numpad6 => '6',
        Key::Key7 | Key::Numpad7 => '7',
        Key::Key8 | Key::Numpad8 => '8',
        Key::Key9 | Key::Numpad9 => '9',
        Key::Key0 | Key::Numpad0 => '0',
        _ => return None,
    };
    Some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    use kiss3d::event::Modifiers;

    fn press(key: Key) -> WindowEvent {
        WindowEvent::Key(key, Action::Press, Modifiers::empty())
    }

    fn release(key: Key) -> WindowEvent {
        WindowEvent::Key(key, Action::Release, Modifiers::empty())
    }

    #[test]
    fn test_held_keys() {
        let controller = Controller::new();
        assert_eq!(
            controller.translate(&press(Key::W)),
            Some(Request::Session(Command::Press(Control::Forward)))
        );
        assert_eq!(
            controller.translate(&release(Key::W)),
            Some(Request::Session(Command::Release(Control::Forward)))
        );
        assert_eq!(
            controller.translate(&press(Key::A)),
            Some(Request::Session(Command::Press(Control::YawLeft)))
        );
        assert_eq!(
            controller.translate(&release(Key::E)),
            Some(Request::Session(Command::Release(Control::Right)))
        );
    }

    #[test]
    fn test_one_shot_keys() {
        let controller = Controller::new();
        assert_eq!(
            controller.translate(&press(Key::Period)),
            Some(Request::Session(Command::SpeedUp))
        );
        assert_eq!(
            controller.translate(&press(Key::Minus)),
            Some(Request::Session(Command::TimeSlower))
        );
        assert_eq!(
            controller.translate(&press(Key::Key4)),
            Some(Request::Session(Command::SelectPlanet('4')))
        );
        assert_eq!(controller.translate(&press(Key::B)), Some(Request::Save));
        assert_eq!(controller.translate(&press(Key::N)), Some(Request::Load));

        // Releasing a one-shot key does nothing
        assert_eq!(controller.translate(&release(Key::Period)), None);
        assert_eq!(controller.translate(&press(Key::Z)), None);
    }

    #[test]
    fn test_mouse() {
        let controller = Controller::new();
        let event = WindowEvent::CursorPos(612.0, 340.5, Modifiers::empty());
        assert_eq!(
            controller.translate(&event),
            Some(Request::Session(Command::Mouse(612.0, 340.5)))
        );
    }
}
