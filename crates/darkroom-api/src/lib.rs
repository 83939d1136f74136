pub mod auth;
pub mod chemical_batches;
pub mod error;
pub mod film_rolls;
pub mod health;
pub mod middleware;
pub mod resources;
pub mod routes;
