mod comodule;
pub mod homomorphism;

pub use comodule::CoModule;
