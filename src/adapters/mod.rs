// Adapters layer: concrete implementations of the oracle and clipboard ports.

pub mod clipboard;
pub mod random_oracle;
pub mod rdap_oracle;

pub use clipboard::{CommandClipboard, MemoryClipboard};
pub use random_oracle::RandomOracle;
pub use rdap_oracle::RdapOracle;
