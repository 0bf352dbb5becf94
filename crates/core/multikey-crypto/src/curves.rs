//! NIST prime curve parameters used for point decompression
//!
//! All three supported curves use the short Weierstrass form
//! `y² = x³ - 3x + b (mod p)` with `p ≡ 3 (mod 4)`, so a square root can be
//! taken as a single modular exponentiation by `(p + 1) / 4`.
//!
//! Values are from NIST SP 800-186.

use std::{fmt, sync::OnceLock};

use multikey_encoding::Codec;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Accepted coordinate widths, in the order P-256, P-384, P-521
pub const POINT_BYTE_LENGTHS: [usize; 3] = [32, 48, 66];

/// Accepted compressed point lengths (sign byte + X)
pub const COMPRESSED_POINT_LENGTHS: [usize; 3] = [33, 49, 67];

const P256_PRIME: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const P256_COEFFICIENT_B: [u8; 32] = [
    0x5a, 0xc6, 0x35, 0xd8, 0xaa, 0x3a, 0x93, 0xe7, 0xb3, 0xeb, 0xbd, 0x55,
    0x76, 0x98, 0x86, 0xbc, 0x65, 0x1d, 0x06, 0xb0, 0xcc, 0x53, 0xb0, 0xf6,
    0x3b, 0xce, 0x3c, 0x3e, 0x27, 0xd2, 0x60, 0x4b,
];

const P256_SQRT_EXPONENT: [u8; 32] = [
    0x3f, 0xff, 0xff, 0xff, 0xc0, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const P384_PRIME: [u8; 48] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
];

const P384_COEFFICIENT_B: [u8; 48] = [
    0xb3, 0x31, 0x2f, 0xa7, 0xe2, 0x3e, 0xe7, 0xe4, 0x98, 0x8e, 0x05, 0x6b,
    0xe3, 0xf8, 0x2d, 0x19, 0x18, 0x1d, 0x9c, 0x6e, 0xfe, 0x81, 0x41, 0x12,
    0x03, 0x14, 0x08, 0x8f, 0x50, 0x13, 0x87, 0x5a, 0xc6, 0x56, 0x39, 0x8d,
    0x8a, 0x2e, 0xd1, 0x9d, 0x2a, 0x85, 0xc8, 0xed, 0xd3, 0xec, 0x2a, 0xef,
];

const P384_SQRT_EXPONENT: [u8; 48] = [
    0x3f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xbf, 0xff, 0xff, 0xff,
    0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00,
];

const P521_PRIME: [u8; 66] = [
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const P521_COEFFICIENT_B: [u8; 66] = [
    0x00, 0x51, 0x95, 0x3e, 0xb9, 0x61, 0x8e, 0x1c, 0x9a, 0x1f, 0x92, 0x9a,
    0x21, 0xa0, 0xb6, 0x85, 0x40, 0xee, 0xa2, 0xda, 0x72, 0x5b, 0x99, 0xb3,
    0x15, 0xf3, 0xb8, 0xb4, 0x89, 0x91, 0x8e, 0xf1, 0x09, 0xe1, 0x56, 0x19,
    0x39, 0x51, 0xec, 0x7e, 0x93, 0x7b, 0x16, 0x52, 0xc0, 0xbd, 0x3b, 0xb1,
    0xbf, 0x07, 0x35, 0x73, 0xdf, 0x88, 0x3d, 0x2c, 0x34, 0xf1, 0xef, 0x45,
    0x1f, 0xd4, 0x6b, 0x50, 0x3f, 0x00,
];

const P521_SQRT_EXPONENT: [u8; 66] = [
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Supported prime curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EllipticCurve {
    P256,
    P384,
    P521,
}

impl EllipticCurve {
    pub const ALL: [EllipticCurve; 3] = [
        EllipticCurve::P256,
        EllipticCurve::P384,
        EllipticCurve::P521,
    ];

    /// Width of one coordinate in bytes
    pub fn point_byte_length(self) -> usize {
        match self {
            EllipticCurve::P256 => 32,
            EllipticCurve::P384 => 48,
            EllipticCurve::P521 => 66,
        }
    }

    /// Curve selected by the width of an X or Y coordinate
    pub fn from_point_length(length: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|curve| curve.point_byte_length() == length)
    }

    /// Curve selected by the length of a compressed point
    pub fn from_compressed_length(length: usize) -> Option<Self> {
        length.checked_sub(1).and_then(Self::from_point_length)
    }

    /// Curve of a multicodec public key header
    pub fn from_codec(codec: Codec) -> Option<Self> {
        match codec {
            Codec::P256Pub => Some(EllipticCurve::P256),
            Codec::P384Pub => Some(EllipticCurve::P384),
            Codec::P521Pub => Some(EllipticCurve::P521),
            _ => None,
        }
    }

    pub fn public_codec(self) -> Codec {
        match self {
            EllipticCurve::P256 => Codec::P256Pub,
            EllipticCurve::P384 => Codec::P384Pub,
            EllipticCurve::P521 => Codec::P521Pub,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EllipticCurve::P256 => "P-256",
            EllipticCurve::P384 => "P-384",
            EllipticCurve::P521 => "P-521",
        }
    }

    pub fn parameters(self) -> &'static CurveParameters {
        CurveParameters::for_curve(self)
    }
}

impl fmt::Display for EllipticCurve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain parameters needed to recover Y from X
#[derive(Debug)]
pub struct CurveParameters {
    curve: EllipticCurve,
    prime: BigUint,
    coefficient_b: BigUint,
    sqrt_exponent: BigUint,
}

impl CurveParameters {
    fn from_bytes(curve: EllipticCurve, prime: &[u8], b: &[u8], sqrt_exponent: &[u8]) -> Self {
        Self {
            curve,
            prime: BigUint::from_bytes_be(prime),
            coefficient_b: BigUint::from_bytes_be(b),
            sqrt_exponent: BigUint::from_bytes_be(sqrt_exponent),
        }
    }

    /// Parameters for a curve, built on first use and shared afterwards
    pub fn for_curve(curve: EllipticCurve) -> &'static CurveParameters {
        static P256: OnceLock<CurveParameters> = OnceLock::new();
        static P384: OnceLock<CurveParameters> = OnceLock::new();
        static P521: OnceLock<CurveParameters> = OnceLock::new();

        match curve {
            EllipticCurve::P256 => P256.get_or_init(|| {
                Self::from_bytes(curve, &P256_PRIME, &P256_COEFFICIENT_B, &P256_SQRT_EXPONENT)
            }),
            EllipticCurve::P384 => P384.get_or_init(|| {
                Self::from_bytes(curve, &P384_PRIME, &P384_COEFFICIENT_B, &P384_SQRT_EXPONENT)
            }),
            EllipticCurve::P521 => P521.get_or_init(|| {
                Self::from_bytes(curve, &P521_PRIME, &P521_COEFFICIENT_B, &P521_SQRT_EXPONENT)
            }),
        }
    }

    pub fn curve(&self) -> EllipticCurve {
        self.curve
    }

    /// Field prime p
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Curve coefficient b
    pub fn coefficient_b(&self) -> &BigUint {
        &self.coefficient_b
    }

    /// (p + 1) / 4
    pub fn sqrt_exponent(&self) -> &BigUint {
        &self.sqrt_exponent
    }

    pub fn point_byte_length(&self) -> usize {
        self.curve.point_byte_length()
    }

    /// Right-hand side of the curve equation, x³ - 3x + b mod p
    pub(crate) fn curve_equation(&self, x: &BigUint) -> BigUint {
        let p = &self.prime;
        let x_cubed = x.modpow(&BigUint::from(3u32), p);
        let three_x = (x * 3u32) % p;
        // add p before subtracting so the intermediate never goes negative
        ((x_cubed + p - three_x) + &self.coefficient_b) % p
    }
}
