//! Pooled memory for key material and signatures
//!
//! Secret bytes live in buffers rented from a [`BufferPool`]. Each buffer has
//! exactly one owner and goes back to the pool when that owner is dropped, on
//! every exit path. Buffers are zeroized over their full capacity before they
//! can be handed out again.

mod keys;
mod pool;
mod sensitive;

pub use keys::{
    KeyPairMemory, PrivateKey, PrivateKeyMemory, PublicKey, PublicKeyMemory, Signature,
    SigningFunction, VerificationFunction,
};
pub use pool::{BufferPool, PooledBuffer};
pub use sensitive::SensitiveMemory;
