use arraydeque::{ArrayDeque, Wrapping};

/// Frames kept in an observation.
pub const STACK_SIZE: usize = 4;

/// The last `STACK_SIZE` preprocessed frames, oldest first.
///
/// The newest slot holds the elementwise max of the two newest frames, which
/// hides sprites that flicker on alternate frames.
pub struct FrameStack {
    frames: ArrayDeque<Vec<f32>, STACK_SIZE, Wrapping>,
    frame_size: usize,
}

impl FrameStack {
    pub fn new(frame_size: usize) -> Self {
        let mut stack = Self {
            frames: ArrayDeque::new(),
            frame_size,
        };
        stack.clear();
        stack
    }

    pub fn push(&mut self, frame: Vec<f32>) {
        debug_assert_eq!(frame.len(), self.frame_size);
        self.frames.push_back(frame);
    }

    /// Refill with blank frames.
    pub fn clear(&mut self) {
        for _ in 0..STACK_SIZE {
            self.push(vec![0.0; self.frame_size]);
        }
    }

    pub fn stacked(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(STACK_SIZE * self.frame_size);
        let newest = self.frames.len().saturating_sub(1);
        let mut previous: Option<&Vec<f32>> = None;

        for (i, frame) in self.frames.iter().enumerate() {
            match previous {
                Some(prev) if i == newest => {
                    out.extend(frame.iter().zip(prev).map(|(a, b)| a.max(*b)));
                }
                _ => out.extend_from_slice(frame),
            }
            previous = Some(frame);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_slot_is_max_of_last_two() {
        let mut stack = FrameStack::new(2);
        stack.push(vec![1.0, 0.0]);
        stack.push(vec![2.0, 0.0]);
        stack.push(vec![5.0, 0.1]);
        stack.push(vec![3.0, 0.4]);
        assert_eq!(stack.stacked(), vec![1.0, 0.0, 2.0, 0.0, 5.0, 0.1, 5.0, 0.4]);

        stack.push(vec![4.0, 0.0]);
        assert_eq!(stack.stacked(), vec![2.0, 0.0, 5.0, 0.1, 3.0, 0.4, 4.0, 0.4]);
    }

    #[test]
    fn clear_blanks_every_slot() {
        let mut stack = FrameStack::new(1);
        assert_eq!(stack.stacked(), vec![0.0; STACK_SIZE]);

        for v in 1..=STACK_SIZE {
            stack.push(vec![v as f32]);
        }
        stack.clear();
        assert_eq!(stack.stacked(), vec![0.0; STACK_SIZE]);
    }
}
