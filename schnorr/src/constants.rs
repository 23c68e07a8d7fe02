//! Constants used in the Schnorr signature scheme implementation.

/// Size of one serialized base field element (a point coordinate) in bytes.
pub const FIELD_SIZE: usize = 32;

/// Size of a serialized public verifying key in bytes.
///
/// A verifying key is an affine point, two 32-byte big-endian coordinates.
pub const PK_SIZE: usize = 2 * FIELD_SIZE;

/// Size of a serialized secret signing key in bytes.
pub const SK_SIZE: usize = 32;

/// Size of a serialized signature in bytes.
///
/// A signature consists of:
/// - A point R (64 bytes)
/// - A scalar s (32 bytes)
pub const SIG_SIZE: usize = PK_SIZE + SK_SIZE;

/// Number of field elements absorbed by the challenge hash: R.x, R.y, A.x, A.y, msg.
pub const CHALLENGE_INPUTS: usize = 5;
