//! Discrete action index to button mask.

/// Maps a flat action index onto one value per button group.
///
/// Each button group contributes a set of button-bit combinations; an action
/// index picks one combination from every group (mixed radix, first group
/// least significant) and ORs them together.
#[derive(Debug, Clone)]
pub struct Controller {
    button_combos: Vec<Vec<u64>>,
    num_buttons: usize,
    num_actions: usize,
}

impl Controller {
    pub fn new(button_combos: Vec<Vec<u64>>) -> Self {
        let button_combos: Vec<Vec<u64>> = button_combos.into_iter().filter(|c| !c.is_empty()).collect();

        let max_button_value = button_combos.iter().flatten().copied().max().unwrap_or(0);
        let num_buttons = (u64::BITS - max_button_value.leading_zeros()) as usize;
        let num_actions = button_combos.iter().map(Vec::len).product();

        Controller {
            button_combos,
            num_buttons,
            num_actions,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn num_buttons(&self) -> usize {
        self.num_buttons
    }

    /// Button mask for `action`, one byte (0 or 1) per button.
    ///
    /// Indices wrap modulo `num_actions`.
    pub fn button_mask(&self, mut action: usize) -> Vec<u8> {
        let mut buttons_value: u64 = 0;
        for combo in &self.button_combos {
            let current = action % combo.len();
            action /= combo.len();
            buttons_value |= combo[current];
        }
        (0..self.num_buttons)
            .map(|i| ((buttons_value >> i) & 1) as u8)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis_combos() -> Vec<Vec<u64>> {
        vec![
            vec![0, 16, 32],
            vec![0, 64, 128],
            vec![0, 1, 2, 3, 256, 257, 512, 513, 1024, 1026, 1536, 2048, 2304, 2560],
        ]
    }

    #[test]
    fn test_button_mask() {
        let controller = Controller::new(genesis_combos());

        assert_eq!(controller.num_buttons(), 12);
        assert_eq!(controller.num_actions(), 3 * 3 * 14);
        assert_eq!(controller.button_mask(0), vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(controller.button_mask(31), vec![1, 1, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(controller.button_mask(82), vec![0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(controller.button_mask(125), vec![0, 0, 0, 0, 0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn empty_groups_are_ignored() {
        let controller = Controller::new(vec![vec![], vec![0, 4]]);
        assert_eq!(controller.num_actions(), 2);
        assert_eq!(controller.button_mask(1), vec![0, 0, 1]);

        let none = Controller::new(Vec::new());
        assert_eq!(none.num_actions(), 1);
        assert!(none.button_mask(0).is_empty());
    }
}
