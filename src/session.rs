//! Workout session - per-exercise countdown state machine
//!
//! Pure transitions over a small state struct. The caller owns the clock
//! and feeds `tick()` once per second while the countdown is running.

use crate::workouts::Workout;

/// Countdown length per exercise, in seconds
pub const EXERCISE_SECS: u32 = 10;

/// One in-progress run through a workout's exercise sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    workout: &'static Workout,
    pub exercise_index: usize,
    pub timer_secs: u32,
    pub running: bool,
    pub finished: bool,
}

impl Session {
    pub fn new(workout: &'static Workout) -> Self {
        Self {
            workout,
            exercise_index: 0,
            timer_secs: EXERCISE_SECS,
            running: false,
            finished: false,
        }
    }

    pub fn workout(&self) -> &'static Workout {
        self.workout
    }

    /// Name of the exercise currently on the clock
    pub fn current_exercise(&self) -> &'static str {
        self.workout.exercises[self.exercise_index]
    }

    fn is_last(&self) -> bool {
        self.exercise_index + 1 == self.workout.exercises.len()
    }

    /// Start or resume the countdown. An elapsed timer is re-armed first.
    pub fn start(&mut self) {
        if self.timer_secs == 0 {
            self.timer_secs = EXERCISE_SECS;
        }
        self.running = true;
    }

    /// Stop the countdown, keeping the remaining time.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// One second elapsed. Ignored unless running.
    ///
    /// Reaching zero stops the clock; on the final exercise it also marks
    /// the session finished. It never re-arms or advances by itself.
    pub fn tick(&mut self) {
        if !self.running || self.timer_secs == 0 {
            return;
        }
        self.timer_secs -= 1;
        if self.timer_secs == 0 {
            self.running = false;
            if self.is_last() {
                self.finished = true;
            }
        }
    }

    /// Whether the user may move to the next exercise: the current
    /// countdown must have fully elapsed, and this must not be the last.
    pub fn can_advance(&self) -> bool {
        !self.running && self.timer_secs == 0 && !self.is_last()
    }

    /// Move to the next exercise with a fresh countdown. No-op while the
    /// current countdown has time left or on the last exercise.
    pub fn advance(&mut self) {
        if !self.can_advance() {
            return;
        }
        self.exercise_index += 1;
        self.timer_secs = EXERCISE_SECS;
        self.running = false;
    }

    /// The start control is shown whenever the clock is stopped with time
    /// remaining.
    pub fn shows_start(&self) -> bool {
        !self.running && self.timer_secs > 0
    }

    /// "Start" only on the untouched first exercise, "Resume" afterwards.
    pub fn start_label(&self) -> &'static str {
        if self.exercise_index == 0 && self.timer_secs == EXERCISE_SECS {
            "Start"
        } else {
            "Resume"
        }
    }
}
