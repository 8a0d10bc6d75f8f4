//! Actor profile consumed by the engine.

pub mod profile;

pub use profile::ActorProfile;
