// Core types shared across the seeder

pub mod strong_types;

pub use strong_types::{DocumentUuid, EventId};
