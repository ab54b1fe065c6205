pub mod routes;
pub mod startup;
pub mod errors;
pub mod flash;
pub mod gate;

pub use startup::run;
