pub mod dksap;
pub mod ecdh;
pub mod memo;
pub mod scalar;
pub mod signer;
pub mod verify;

pub use dksap::*;
pub use ecdh::*;
pub use memo::*;
pub use signer::*;
pub use verify::*;
