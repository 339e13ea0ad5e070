//! Playback module - Position and play/pause flag of a tour.

mod state;

pub use state::{PlaybackState, Transition};
