pub mod extract;
pub mod guards;
pub mod router;
pub mod routes;

pub use router::{AtelierState, atelier_router};
