pub mod intent;
pub mod session;

pub use intent::Intent;
pub use session::CartSession;
