// Core models
pub mod aid_request;
pub mod lifecycle;
pub mod network;
pub mod proposal;
pub mod transaction;
pub mod units;
pub mod wallet;

// Re-export commonly used types
pub use aid_request::*;
pub use lifecycle::*;
pub use network::*;
pub use proposal::*;
pub use transaction::*;
pub use wallet::*;
