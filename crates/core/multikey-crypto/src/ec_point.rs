//! Elliptic curve point compression for P-256, P-384 and P-521
//!
//! Compressed points are a sign byte (`0x02` for even Y, `0x03` for odd Y)
//! followed by the X coordinate. Decompression solves the curve equation for
//! Y and picks the root whose parity matches the sign byte.
//!
//! NOTE: decompression uses general purpose big integer arithmetic and is not
//! constant time. Only public points should pass through here.

use num_bigint::BigUint;
use tracing::trace;

use crate::{
    CryptoError,
    curves::{COMPRESSED_POINT_LENGTHS, EllipticCurve, POINT_BYTE_LENGTHS},
    error::Result,
};

/// Sign byte for an even Y coordinate
pub const SIGN_EVEN: u8 = 0x02;
/// Sign byte for an odd Y coordinate
pub const SIGN_ODD: u8 = 0x03;
/// Leading byte of an uncompressed SEC1 point
pub const UNCOMPRESSED: u8 = 0x04;

/// Sign byte a compressed point with this Y coordinate starts with
pub fn compression_sign_byte(y_point: &[u8]) -> Result<u8> {
    let last = y_point
        .last()
        .ok_or(CryptoError::MissingArgument("yPoint"))?;
    Ok(SIGN_EVEN + (last & 1))
}

/// Compresses an affine point given as big-endian X and Y coordinates.
///
/// The coordinates are not checked to lie on the curve.
pub fn compress(x_point: &[u8], y_point: &[u8]) -> Result<Vec<u8>> {
    compress_point(x_point, y_point).map(|(_, compressed)| compressed)
}

/// Like [`compress`], also returning the curve selected by the coordinate width
pub fn compress_point(x_point: &[u8], y_point: &[u8]) -> Result<(EllipticCurve, Vec<u8>)> {
    if x_point.is_empty() {
        return Err(CryptoError::MissingArgument("xPoint"));
    }
    if y_point.is_empty() {
        return Err(CryptoError::MissingArgument("yPoint"));
    }
    let Some(curve) = EllipticCurve::from_point_length(x_point.len()) else {
        return Err(CryptoError::InvalidLength {
            parameter: "xPoint",
            expected: &POINT_BYTE_LENGTHS,
        });
    };
    if EllipticCurve::from_point_length(y_point.len()).is_none() {
        return Err(CryptoError::InvalidLength {
            parameter: "yPoint",
            expected: &POINT_BYTE_LENGTHS,
        });
    }
    if x_point.len() != y_point.len() {
        return Err(CryptoError::MismatchedLength);
    }

    let mut compressed = Vec::with_capacity(x_point.len() + 1);
    compressed.push(compression_sign_byte(y_point)?);
    compressed.extend_from_slice(x_point);
    Ok((curve, compressed))
}

/// Recovers the Y coordinate of a compressed point.
///
/// The result is left padded with zeros to the coordinate width of the
/// curve (32, 48 or 66 bytes).
pub fn decompress(compressed_point: &[u8]) -> Result<Vec<u8>> {
    let (curve, sign, x_point) = parse_compressed(compressed_point)?;
    Ok(recover_y(curve, sign, x_point))
}

/// Like [`decompress`], also returning the curve and the X coordinate
pub fn decompress_point(compressed_point: &[u8]) -> Result<(EllipticCurve, Vec<u8>, Vec<u8>)> {
    let (curve, sign, x_point) = parse_compressed(compressed_point)?;
    let y_point = recover_y(curve, sign, x_point);
    Ok((curve, x_point.to_vec(), y_point))
}

fn parse_compressed(compressed_point: &[u8]) -> Result<(EllipticCurve, u8, &[u8])> {
    let invalid_length = CryptoError::InvalidLength {
        parameter: "compressedPoint",
        expected: &COMPRESSED_POINT_LENGTHS,
    };

    let Some((&sign, x_point)) = compressed_point.split_first() else {
        return Err(invalid_length);
    };
    match sign {
        SIGN_EVEN | SIGN_ODD => {}
        UNCOMPRESSED => return Err(CryptoError::UnsupportedFormat),
        other => return Err(CryptoError::InvalidSignByte(other)),
    }

    let curve =
        EllipticCurve::from_compressed_length(compressed_point.len()).ok_or(invalid_length)?;
    Ok((curve, sign, x_point))
}

fn recover_y(curve: EllipticCurve, sign: u8, x_point: &[u8]) -> Vec<u8> {
    trace!("decompressing {curve} point");
    let params = curve.parameters();
    let prime = params.prime();

    let x = BigUint::from_bytes_be(x_point);
    let y_squared = params.curve_equation(&x);
    let root = y_squared.modpow(params.sqrt_exponent(), prime);

    let y = if root.bit(0) == (sign == SIGN_ODD) {
        root
    } else {
        (prime - &root) % prime
    };

    left_pad(&y.to_bytes_be(), curve.point_byte_length())
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut padded = vec![0u8; width.saturating_sub(bytes.len())];
    padded.extend_from_slice(bytes);
    padded
}

#[cfg(test)]
mod tests {
    use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};

    use super::*;

    fn b64(s: &str) -> Vec<u8> {
        BASE64_URL_SAFE_NO_PAD.decode(s).unwrap()
    }

    #[test]
    fn decompress_p256() {
        let compressed = [
            3, 127, 35, 88, 48, 221, 61, 239, 167, 34, 239, 26, 162, 73, 214, 160, 221, 187, 164,
            249, 144, 176, 129, 117, 56, 147, 63, 87, 54, 64, 101, 53, 66,
        ];
        let (curve, x, y) = decompress_point(&compressed).unwrap();

        assert_eq!(curve, EllipticCurve::P256);
        assert_eq!(x, b64("fyNYMN0976ci7xqiSdag3buk-ZCwgXU4kz9XNkBlNUI"));
        assert_eq!(y, b64("hW2ojTNfH7Jbi8--CJUo3OCbH3y5n91g-IMA9MLMbTU"));
    }

    #[test]
    fn decompress_p384() {
        let compressed = [
            3, 148, 137, 211, 198, 95, 31, 140, 178, 169, 253, 64, 171, 196, 141, 22, 14, 73, 90,
            134, 47, 187, 251, 254, 137, 110, 216, 135, 142, 36, 111, 50, 248, 94, 118, 18, 149,
            116, 112, 95, 139, 97, 194, 99, 203, 127, 64, 156, 156,
        ];

        assert_eq!(
            decompress(&compressed).unwrap(),
            b64("y6N1IC-2mXxHreETBW7K3mBcw0qGr3CWHCs-yl09yCQRLcyfGv7XhqAngHOu51Zv")
        );
    }

    #[test]
    fn p521_generator_roundtrip() {
        // X starts with a zero byte, Y is even
        let x = b64(
            "AMaFjga3BATpzZ4-y2YjlbRCnGSBOQU_tSH4KK9ga009uqFLXnfv51ko_h3BJ6L_qN4zSLPBhWpCm_l-fjHC5b1m",
        );
        let y = b64(
            "ARg5KWp4mjvABFyKX7QsfRvZmPVESVebRGgXr70XJz5mLJfucple9CZAxVC5AT-tB2E1PHCGonLCQIi-lHaf0WZQ",
        );

        let compressed = compress(&x, &y).unwrap();
        assert_eq!(compressed.len(), 67);
        assert_eq!(compressed[0], SIGN_EVEN);
        assert_eq!(&compressed[1..], x.as_slice());
        assert_eq!(decompress(&compressed).unwrap(), y);
    }

    #[test]
    fn leading_zero_y_is_padded() {
        // 43·G on P-256, Y has a zero high byte and is odd
        let x = b64("mGriUG8f8QTQQjCGHY9LSY9LxMbQCbMPdUTcEpuC0o0");
        let y = b64("ADzMwKZGDgrjKKTZfTx7YdhvxiicGJ8lJREMRBuwfpc");

        let compressed = compress(&x, &y).unwrap();
        assert_eq!(compressed[0], SIGN_ODD);

        let recovered = decompress(&compressed).unwrap();
        assert_eq!(recovered.len(), 32);
        assert_eq!(recovered[0], 0);
        assert_eq!(recovered, y);
    }

    #[test]
    fn flipping_sign_gives_negated_y() {
        let x = b64("OqtR8tur0bXp3dpvHg8S4R_bjFEFGBfv4WKYU6o7llc");
        let y = b64("nPBTM3K9oYq4YyajBb7BTKCOZBWJIqvX0Cbokd03QK8");

        let mut compressed = compress(&x, &y).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), y);

        compressed[0] ^= 1;
        let negated = BigUint::from_bytes_be(&decompress(&compressed).unwrap());
        let prime = EllipticCurve::P256.parameters().prime();
        assert_eq!(negated + BigUint::from_bytes_be(&y), prime.clone());
    }

    #[test]
    fn compress_missing_arguments() {
        let point = [1u8; 32];
        assert!(matches!(
            compress(&[], &point),
            Err(CryptoError::MissingArgument("xPoint"))
        ));
        assert!(matches!(
            compress(&point, &[]),
            Err(CryptoError::MissingArgument("yPoint"))
        ));
        // X is reported first when both are missing
        assert!(matches!(
            compress(&[], &[]),
            Err(CryptoError::MissingArgument("xPoint"))
        ));
    }

    #[test]
    fn compress_invalid_lengths() {
        let good = [1u8; 48];
        for bad_length in [1, 31, 33, 47, 64, 65, 67] {
            let bad = vec![1u8; bad_length];
            assert!(matches!(
                compress(&bad, &good),
                Err(CryptoError::InvalidLength {
                    parameter: "xPoint",
                    ..
                })
            ));
            assert!(matches!(
                compress(&good, &bad),
                Err(CryptoError::InvalidLength {
                    parameter: "yPoint",
                    ..
                })
            ));
        }

        let err = compress(&[1u8; 31], &good).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Length must be 32, 48 or 66. (Parameter 'xPoint')"
        );
    }

    #[test]
    fn compress_mismatched_lengths() {
        let err = compress(&[1u8; 32], &[1u8; 48]).unwrap_err();
        assert!(matches!(err, CryptoError::MismatchedLength));
        assert_eq!(
            err.to_string(),
            "Parameters 'xPoint' and 'yPoint' need to be of the same length."
        );
    }

    #[test]
    fn decompress_rejections() {
        assert!(matches!(
            decompress(&[]),
            Err(CryptoError::InvalidLength {
                parameter: "compressedPoint",
                ..
            })
        ));

        let mut uncompressed = vec![UNCOMPRESSED];
        uncompressed.extend_from_slice(&[1u8; 64]);
        assert!(matches!(
            decompress(&uncompressed),
            Err(CryptoError::UnsupportedFormat)
        ));

        let mut bad_sign = vec![0x05];
        bad_sign.extend_from_slice(&[1u8; 32]);
        assert!(matches!(
            decompress(&bad_sign),
            Err(CryptoError::InvalidSignByte(0x05))
        ));

        // sign byte is checked before the length
        assert!(matches!(
            decompress(&[0x00, 1, 2]),
            Err(CryptoError::InvalidSignByte(0x00))
        ));
        assert!(matches!(
            decompress(&[SIGN_EVEN, 1, 2]),
            Err(CryptoError::InvalidLength {
                parameter: "compressedPoint",
                ..
            })
        ));
    }

    #[test]
    fn sign_byte_follows_parity() {
        assert_eq!(compression_sign_byte(&[0xff, 0x10]).unwrap(), SIGN_EVEN);
        assert_eq!(compression_sign_byte(&[0x00, 0x11]).unwrap(), SIGN_ODD);
        assert!(compression_sign_byte(&[]).is_err());
    }
}
