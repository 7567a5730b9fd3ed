//! Ports: trait boundaries between the core and the outside world

pub mod repository;

pub use repository::LearnerRepository;
