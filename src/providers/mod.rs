// Providers layer - hashing and time sources injected into the services
pub mod clock;
pub mod crypto_provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto_provider::{CryptoProvider, HashAlgorithm};
