//! Signal processing shared by models and artifact rendering

pub mod energy;
pub mod mel;

pub use energy::{block_energies, hf_energy_map};
pub use mel::{mel_spectrogram, MelConfig};
