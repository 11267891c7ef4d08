//! Generic menu navigation: jog wheel, arrows, click, Back.

use crate::action::MenuCommand;
use crate::menu::MenuStack;
use crate::midi::{decode_delta, CC_BACK, CC_DOWN, CC_JOG_CLICK, CC_JOG_WHEEL, CC_UP};

/// Jog steps per detent while Shift is held.
pub const SHIFT_STEP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Ignored,
    Moved,
    Activated(MenuCommand),
    Popped,
    /// Back at the root: leave the module.
    ExitRequested,
}

impl NavOutcome {
    pub fn needs_redraw(self) -> bool {
        !matches!(self, Self::Ignored | Self::ExitRequested)
    }
}

/// Apply one control change to the top screen of `stack`.
///
/// Buttons act on press (value > 0) only.
pub fn handle_menu_input(stack: &mut MenuStack, cc: u8, value: u8, shift_held: bool) -> NavOutcome {
    let pressed = value > 0;
    match cc {
        CC_JOG_WHEEL => {
            let mut delta = decode_delta(value);
            if shift_held {
                delta *= SHIFT_STEP;
            }
            move_cursor(stack, delta)
        }
        CC_UP if pressed => move_cursor(stack, -1),
        CC_DOWN if pressed => move_cursor(stack, 1),
        CC_JOG_CLICK if pressed => match stack.current().and_then(|s| s.selected_item()) {
            Some(item) => NavOutcome::Activated(item.command()),
            None => NavOutcome::Ignored,
        },
        CC_BACK if pressed => {
            if stack.pop() {
                NavOutcome::Popped
            } else {
                NavOutcome::ExitRequested
            }
        }
        _ => NavOutcome::Ignored,
    }
}

fn move_cursor(stack: &mut MenuStack, delta: i32) -> NavOutcome {
    match stack.current_mut() {
        Some(screen) => {
            if screen.move_by(delta) {
                NavOutcome::Moved
            } else {
                NavOutcome::Ignored
            }
        }
        None => NavOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuItem, Screen};
    use crate::midi::encode_delta;

    fn stack_with(n: usize) -> MenuStack {
        let items = (0..n)
            .map(|i| MenuItem::new(format!("r{}", i), MenuCommand::SelectResult(i)))
            .collect();
        let mut stack = MenuStack::new();
        stack.push(Screen::new("root", items));
        stack
    }

    fn selected(stack: &MenuStack) -> usize {
        stack.current().unwrap().selected()
    }

    #[test]
    fn test_jog_moves_and_clamps() {
        let mut stack = stack_with(12);
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(2), false),
            NavOutcome::Moved
        );
        assert_eq!(selected(&stack), 2);
        handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(-1), false);
        assert_eq!(selected(&stack), 1);
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(-3), false),
            NavOutcome::Moved
        );
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(-1), false),
            NavOutcome::Ignored
        );
    }

    #[test]
    fn test_jog_on_empty_stack_is_ignored() {
        let mut stack = MenuStack::new();
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(1), false),
            NavOutcome::Ignored
        );
        assert_eq!(handle_menu_input(&mut stack, CC_DOWN, 127, false), NavOutcome::Ignored);
    }

    #[test]
    fn test_shift_multiplies_jog() {
        let mut stack = stack_with(12);
        handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(1), true);
        assert_eq!(selected(&stack), 5);
        handle_menu_input(&mut stack, CC_JOG_WHEEL, encode_delta(2), true);
        assert_eq!(selected(&stack), 11);
    }

    #[test]
    fn test_arrows_step_on_press_only() {
        let mut stack = stack_with(3);
        handle_menu_input(&mut stack, CC_DOWN, 127, false);
        handle_menu_input(&mut stack, CC_DOWN, 0, false);
        assert_eq!(selected(&stack), 1);
        handle_menu_input(&mut stack, CC_UP, 127, false);
        assert_eq!(selected(&stack), 0);
    }

    #[test]
    fn test_click_activates_selected() {
        let mut stack = stack_with(3);
        handle_menu_input(&mut stack, CC_DOWN, 127, false);
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_CLICK, 127, false),
            NavOutcome::Activated(MenuCommand::SelectResult(1))
        );
        assert_eq!(
            handle_menu_input(&mut stack, CC_JOG_CLICK, 0, false),
            NavOutcome::Ignored
        );

        let mut empty = stack_with(0);
        assert_eq!(
            handle_menu_input(&mut empty, CC_JOG_CLICK, 127, false),
            NavOutcome::Ignored
        );
    }

    #[test]
    fn test_back_pops_then_requests_exit() {
        let mut stack = stack_with(1);
        stack.push(Screen::new("child", Vec::new()));
        assert_eq!(
            handle_menu_input(&mut stack, CC_BACK, 127, false),
            NavOutcome::Popped
        );
        assert_eq!(
            handle_menu_input(&mut stack, CC_BACK, 127, false),
            NavOutcome::ExitRequested
        );
        assert_eq!(stack.depth(), 1);
    }
}
