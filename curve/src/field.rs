use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::{BaseField, ScalarField};

/// Width of a canonical big-endian field encoding.
pub const FIELD_BYTES: usize = 32;

/// Canonical byte and hex encodings for both prime fields.
pub trait FieldEncoding: Sized {
    /// Canonical value as 32 big-endian bytes.
    fn to_be_bytes(&self) -> [u8; FIELD_BYTES];

    /// `0x` followed by the 64 hex digits of [`FieldEncoding::to_be_bytes`].
    fn to_hex(&self) -> String;

    /// Parse a `0x`-prefixed hex string. Values at or above the modulus are
    /// rejected rather than reduced.
    fn from_hex(s: &str) -> Option<Self>;
}

impl<F: PrimeField> FieldEncoding for F {
    fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        let bytes = self.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        let start = FIELD_BYTES.saturating_sub(bytes.len());
        out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(FIELD_BYTES)..]);
        out
    }

    fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x")?;
        let value = BigUint::parse_bytes(digits.as_bytes(), 16)?;
        let modulus: BigUint = F::MODULUS.into();
        (value < modulus).then(|| F::from(value))
    }
}

/// Reduce a base field element into the scalar field.
pub fn scalar_from_base(value: &BaseField) -> ScalarField {
    ScalarField::from_le_bytes_mod_order(&value.into_bigint().to_bytes_le())
}

/// Embed a scalar into the base field. Lossless since the subgroup order is
/// below the base field modulus.
pub fn base_from_scalar(value: &ScalarField) -> BaseField {
    BaseField::from_le_bytes_mod_order(&value.into_bigint().to_bytes_le())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    #[test]
    fn test_hex_round_trip() {
        let x = BaseField::from(0xdead_beef_u64);
        assert_eq!(
            x.to_hex(),
            "0x00000000000000000000000000000000000000000000000000000000deadbeef"
        );
        assert_eq!(BaseField::from_hex(&x.to_hex()), Some(x));
        assert_eq!(BaseField::from_hex("0x0"), Some(BaseField::zero()));
    }

    #[test]
    fn test_from_hex_rejects_modulus_and_garbage() {
        let modulus: BigUint = BaseField::MODULUS.into();
        let at_modulus = format!("0x{}", modulus.to_str_radix(16));
        assert_eq!(BaseField::from_hex(&at_modulus), None);
        assert_eq!(BaseField::from_hex("deadbeef"), None);
        assert_eq!(BaseField::from_hex("0xzz"), None);

        let scalar_modulus: BigUint = ScalarField::MODULUS.into();
        let above_order = format!("0x{}", scalar_modulus.to_str_radix(16));
        assert_eq!(ScalarField::from_hex(&above_order), None);
        // Valid as a base field element though.
        assert!(BaseField::from_hex(&above_order).is_some());
    }

    #[test]
    fn test_subgroup_order() {
        let order: BigUint = ScalarField::MODULUS.into();
        assert_eq!(
            order.to_str_radix(10),
            "2736030358979909402780800718157159386076813972158567259200215660948447373041"
        );
        assert_eq!(ScalarField::MODULUS_BIT_SIZE, 251);
        assert_eq!(BaseField::MODULUS_BIT_SIZE, 254);
    }

    #[test]
    fn test_field_conversions() {
        let s = -ScalarField::one();
        let embedded = base_from_scalar(&s);
        assert_eq!(scalar_from_base(&embedded), s);

        // ℓ itself reduces to zero in the scalar field.
        let order: BigUint = ScalarField::MODULUS.into();
        assert!(scalar_from_base(&BaseField::from(order)).is_zero());
    }
}
