pub mod gate;
pub mod session;

pub use gate::admin_gate;
pub use session::{MaybeSession, RequireAdmin, RequireSession};
