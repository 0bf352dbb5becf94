//! RSA modulus envelopes for did:key
//!
//! A raw RSA modulus is wrapped in the DER `RSAPublicKey` structure with the
//! fixed public exponent 65537:
//!
//! ```text
//! 30 82 LL LL            SEQUENCE
//!    02 82 MM MM 00 ..   INTEGER modulus, zero padded to stay positive
//!    02 03 01 00 01      INTEGER 65537
//! ```
//!
//! Only 2048 and 4096 bit moduli are supported, so every length field is a
//! fixed two byte value and the envelope has a fixed shape.

use tracing::warn;

use crate::{CryptoError, error::Result};

pub const RSA2048_MODULUS_LENGTH: usize = 256;
pub const RSA4096_MODULUS_LENGTH: usize = 512;
pub const RSA2048_ENCODED_LENGTH: usize = 270;
pub const RSA4096_ENCODED_LENGTH: usize = 526;

const MODULUS_LENGTHS: [usize; 2] = [RSA2048_MODULUS_LENGTH, RSA4096_MODULUS_LENGTH];
const ENCODED_LENGTHS: [usize; 2] = [RSA2048_ENCODED_LENGTH, RSA4096_ENCODED_LENGTH];

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;
/// Long form length, two length bytes follow
const DER_LENGTH_TWO_BYTES: u8 = 0x82;

/// Encoded public exponent 65537
const EXPONENT: [u8; 5] = [DER_INTEGER, 0x03, 0x01, 0x00, 0x01];

/// Index of the zero byte keeping the modulus integer positive
const PADDING_BYTE_INDEX: usize = 8;
/// Index of the first modulus byte, whose high bit is always set
const MSB_BYTE_INDEX: usize = 9;

/// Wraps a 256 or 512 byte modulus into its envelope.
///
/// The modulus must be a full 2048 or 4096 bit number (top bit set),
/// otherwise [`decode`] could not take the envelope back apart.
pub fn encode(rsa_modulus: &[u8]) -> Result<Vec<u8>> {
    if !MODULUS_LENGTHS.contains(&rsa_modulus.len()) {
        return Err(CryptoError::InvalidLength {
            parameter: "rsaModulusBytes",
            expected: &MODULUS_LENGTHS,
        });
    }
    if rsa_modulus[0] & 0x80 == 0 {
        return Err(CryptoError::InvalidModulus("rsaModulusBytes"));
    }

    // INTEGER content is the padding byte plus the modulus
    let integer_length = rsa_modulus.len() + 1;
    // INTEGER header (4) + content + exponent
    let sequence_length = 4 + integer_length + EXPONENT.len();

    let mut encoded = Vec::with_capacity(4 + sequence_length);
    encoded.extend_from_slice(&[DER_SEQUENCE, DER_LENGTH_TWO_BYTES]);
    encoded.extend_from_slice(&(sequence_length as u16).to_be_bytes());
    encoded.extend_from_slice(&[DER_INTEGER, DER_LENGTH_TWO_BYTES]);
    encoded.extend_from_slice(&(integer_length as u16).to_be_bytes());
    encoded.push(0x00);
    encoded.extend_from_slice(rsa_modulus);
    encoded.extend_from_slice(&EXPONENT);

    Ok(encoded)
}

/// Extracts the modulus from a 270 or 526 byte envelope
pub fn decode(encoded_rsa_modulus: &[u8]) -> Result<Vec<u8>> {
    let modulus_length = match encoded_rsa_modulus.len() {
        RSA2048_ENCODED_LENGTH => RSA2048_MODULUS_LENGTH,
        RSA4096_ENCODED_LENGTH => RSA4096_MODULUS_LENGTH,
        _ => {
            return Err(CryptoError::InvalidLength {
                parameter: "encodedRsaModulusBytes",
                expected: &ENCODED_LENGTHS,
            });
        }
    };

    if encoded_rsa_modulus[PADDING_BYTE_INDEX] != 0x00 {
        warn!("RSA envelope is missing the DER padding byte");
        return Err(CryptoError::CorruptEnvelope);
    }
    if encoded_rsa_modulus[MSB_BYTE_INDEX] & 0x80 == 0 {
        warn!("RSA envelope modulus does not have its most significant bit set");
        return Err(CryptoError::CorruptEnvelope);
    }

    Ok(encoded_rsa_modulus[MSB_BYTE_INDEX..MSB_BYTE_INDEX + modulus_length].to_vec())
}
