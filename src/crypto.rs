//! Password-based encryption of note bodies.
//!
//! A fresh salt per note means identical passwords never derive identical
//! keys; a fresh iv per encryption means identical plaintext never produces
//! identical ciphertext. The password itself is never stored anywhere.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha512;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub const SALT_LEN: usize = 32;
pub const IV_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
// deliberate cost parameter, keep offline guessing slow
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Wrong password or malformed iv/salt/ciphertext. The two cases are
/// deliberately indistinguishable to the caller.
#[derive(Debug, PartialEq, Eq)]
pub struct DecryptError;

#[derive(Clone, Debug)]
pub struct EncryptedContent {
    pub ciphertext: String,
    pub iv: String,
    pub salt: String,
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

pub fn encrypt(plaintext: &str, password: &str) -> EncryptedContent {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let key = derive_key(password, &salt);
    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    EncryptedContent {
        ciphertext: hex::encode(ciphertext),
        iv: hex::encode(iv),
        salt: hex::encode(salt),
    }
}

pub fn decrypt(
    ciphertext: &str,
    password: &str,
    iv: &str,
    salt: &str,
) -> Result<String, DecryptError> {
    let salt = hex::decode(salt).map_err(|_| DecryptError)?;
    let iv: [u8; IV_LEN] = hex::decode(iv)
        .map_err(|_| DecryptError)?
        .try_into()
        .map_err(|_| DecryptError)?;
    let ciphertext = hex::decode(ciphertext).map_err(|_| DecryptError)?;

    let key = derive_key(password, &salt);
    let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DecryptError)?;

    String::from_utf8(plaintext).map_err(|_| DecryptError)
}
