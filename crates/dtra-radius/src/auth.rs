//! RFC 2865 / 2866 authenticator and User-Password arithmetic.

use md5::{Digest, Md5};

use crate::packet::{RADIUS_AUTH_LEN, RADIUS_HDR_LEN};

fn digest(hasher: Md5) -> [u8; RADIUS_AUTH_LEN] {
    let mut out = [0u8; RADIUS_AUTH_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Hide a User-Password (RFC 2865 section 5.2)
pub fn hide_password(password: &[u8], secret: &[u8], authenticator: &[u8; RADIUS_AUTH_LEN]) -> Vec<u8> {
    // Padded to a multiple of 16 octets, at least one block
    let mut padded = password.to_vec();
    let blocks = padded.len().div_ceil(16).max(1);
    padded.resize(blocks * 16, 0);

    let mut hidden = Vec::with_capacity(padded.len());
    let mut last_block = authenticator.to_vec();

    for chunk in padded.chunks(16) {
        let mut hasher = Md5::new();
        hasher.update(secret);
        hasher.update(&last_block);
        let hash = hasher.finalize();

        let block: Vec<u8> = chunk.iter().zip(hash.iter()).map(|(p, h)| p ^ h).collect();
        hidden.extend_from_slice(&block);
        last_block = block;
    }

    hidden
}

/// Request Authenticator of an Accounting-Request (RFC 2866 section 3).
/// `packet` is the encoded request; its authenticator field is treated as zero.
pub fn accounting_request_authenticator(packet: &[u8], secret: &[u8]) -> [u8; RADIUS_AUTH_LEN] {
    let mut hasher = Md5::new();
    hasher.update(&packet[..4]);
    hasher.update([0u8; RADIUS_AUTH_LEN]);
    hasher.update(&packet[RADIUS_HDR_LEN..]);
    hasher.update(secret);
    digest(hasher)
}

/// Expected Response Authenticator for `response` answering a request
/// sent with `request_authenticator`
pub fn response_authenticator(
    response: &[u8],
    request_authenticator: &[u8; RADIUS_AUTH_LEN],
    secret: &[u8],
) -> [u8; RADIUS_AUTH_LEN] {
    let mut hasher = Md5::new();
    hasher.update(&response[..4]);
    hasher.update(request_authenticator);
    hasher.update(&response[RADIUS_HDR_LEN..]);
    hasher.update(secret);
    digest(hasher)
}

/// Check the Response Authenticator carried in `response`
pub fn verify_response(
    response: &[u8],
    request_authenticator: &[u8; RADIUS_AUTH_LEN],
    secret: &[u8],
) -> bool {
    if response.len() < RADIUS_HDR_LEN {
        return false;
    }
    let expected = response_authenticator(response, request_authenticator, secret);
    response[4..RADIUS_HDR_LEN] == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md5(parts: &[&[u8]]) -> [u8; 16] {
        let mut hasher = Md5::new();
        for part in parts {
            hasher.update(part);
        }
        digest(hasher)
    }

    #[test]
    fn test_hide_password_single_block() {
        let secret = b"testing123";
        let authenticator = [0x11u8; 16];

        let hidden = hide_password(b"12345", secret, &authenticator);
        assert_eq!(hidden.len(), 16);

        let key = md5(&[secret, &authenticator]);
        let mut recovered: Vec<u8> = hidden.iter().zip(key.iter()).map(|(c, k)| c ^ k).collect();
        recovered.truncate(5);
        assert_eq!(recovered, b"12345");
    }

    #[test]
    fn test_hide_password_chains_blocks() {
        let secret = b"s3cret";
        let authenticator = [0x22u8; 16];
        let password = [b'x'; 20];

        let hidden = hide_password(&password, secret, &authenticator);
        assert_eq!(hidden.len(), 32);

        // Second block is keyed on the first ciphertext block
        let key2 = md5(&[secret, &hidden[..16]]);
        assert_eq!(hidden[16] ^ key2[0], b'x');
        assert_eq!(hidden[20] ^ key2[4], 0);
    }

    #[test]
    fn test_empty_password_is_one_block() {
        assert_eq!(hide_password(b"", b"k", &[0; 16]).len(), 16);
    }

    #[test]
    fn test_accounting_authenticator_ignores_existing_field() {
        let mut packet = vec![4, 9, 0, 26];
        packet.extend_from_slice(&[0xAB; 16]);
        packet.extend_from_slice(&[1, 6, b'u', b's', b'e', b'r']);

        let auth = accounting_request_authenticator(&packet, b"secret");
        let mut zeroed = packet.clone();
        zeroed[4..20].copy_from_slice(&[0; 16]);
        assert_eq!(auth, md5(&[&zeroed, b"secret"]));
    }

    #[test]
    fn test_verify_response() {
        let request_auth = [5u8; 16];
        let mut response = vec![2, 9, 0, 20];
        response.extend_from_slice(&[0; 16]);

        let auth = response_authenticator(&response, &request_auth, b"secret");
        response[4..20].copy_from_slice(&auth);

        assert!(verify_response(&response, &request_auth, b"secret"));
        assert!(!verify_response(&response, &request_auth, b"other"));
        assert!(!verify_response(&response, &[6u8; 16], b"secret"));
    }
}
