//! Audio I/O and corpus sizing utilities.
//!
//! These helpers keep waveform handling separate from the dataset and model,
//! focusing on reading clips as fixed-length mono sample buffers and on
//! scanning a phoneme corpus for its largest clip.

pub mod io;
pub mod sizing;
