//! Opaque identifier generation.

use rand::Rng;

/// Generates a random alphanumeric identifier.
///
/// Uses uppercase letters, lowercase letters, and digits, drawn from the
/// system's random number generator. At the lengths used in this crate the
/// ids are collision-resistant and, for invitations, unpredictable.
///
/// # Arguments
/// - `length` - Number of characters to generate
///
/// # Returns
/// - `String` - A random alphanumeric string of the requested length
pub fn random_id(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789";

    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
