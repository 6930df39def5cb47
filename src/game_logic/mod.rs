pub mod constants;
pub mod components;
pub mod track;
pub mod physics;
pub mod collisions;
pub mod lap_system;
pub mod race;

pub use constants::*;
pub use components::*;
pub use track::*;
pub use physics::*;
pub use collisions::*;
pub use lap_system::*;
pub use race::*;
