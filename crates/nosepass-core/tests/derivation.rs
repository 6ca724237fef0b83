use nosepass_core::kdf::{BcryptPbkdf, SecretKey};
use nosepass_core::sampler::{self, mask_for};
use nosepass_core::{Alphabet, Pipeline, Stage};
use secrecy::SecretSlice;

const CONFIG: &[u8] = b"# test config\ndefault count=8 set=a-c rounds=4\n";

fn passphrase(value: &[u8]) -> SecretSlice<u8> {
    SecretSlice::from(value.to_vec())
}

fn derive(config: &[u8], site: &str, secret: &str) -> String {
    derive_bytes(config, site, secret.as_bytes())
}

fn derive_bytes(config: &[u8], site: &str, secret: &[u8]) -> String {
    let mut pipeline = Pipeline::new(BcryptPbkdf, site).expect("site should be valid");
    pipeline.configure(config).expect("config should resolve");
    let password = pipeline
        .generate(&passphrase(secret))
        .expect("generation should succeed");
    assert_eq!(pipeline.stage(), Stage::Done);
    password.as_str().to_string()
}

#[test]
fn test_end_to_end_is_deterministic() {
    let first = derive(CONFIG, "example", "correcthorse");
    let second = derive(CONFIG, "example", "correcthorse");

    assert_eq!(first.len(), 8);
    assert!(first.bytes().all(|b| matches!(b, b'a' | b'b' | b'c')));
    assert_eq!(first, second);
}

#[test]
fn test_end_to_end_known_answer() {
    // bcrypt-pbkdf("correcthorse", "example", 4) keys the keystream, nonce 0
    assert_eq!(derive(CONFIG, "example", "correcthorse"), "cbcababa");
}

#[test]
fn test_non_utf8_passphrase_known_answer() {
    assert_eq!(
        derive_bytes(CONFIG, "example", b"\xffcorrecthorse"),
        "baabaabc"
    );
}

#[test]
fn test_increment_rotates_password() {
    let config = b"default count=32 rounds=1\n";
    let rotated = b"default count=32 rounds=1\nexample increment=1\n";

    let first = derive(config, "example", "correcthorse");
    let second = derive(rotated, "example", "correcthorse");
    assert_ne!(first, second);
}

#[test]
fn test_site_and_passphrase_both_matter() {
    let config = b"default count=32 rounds=1\n";
    let base = derive(config, "example", "correcthorse");

    assert_ne!(base, derive(config, "example.org", "correcthorse"));
    assert_ne!(base, derive(config, "example", "batterystaple"));
}

#[test]
fn test_site_entry_changes_only_that_site() {
    let config = b"default count=16 rounds=1\nexample set=0-9\n";

    let example = derive(config, "example", "correcthorse");
    assert!(example.bytes().all(|b| b.is_ascii_digit()));

    let other = derive(config, "other", "correcthorse");
    assert_eq!(other.len(), 16);
    assert!(!other.bytes().all(|b| b.is_ascii_digit()));
}

#[test]
fn test_default_schema_output_is_printable_without_space() {
    let password = derive(b"default rounds=1\n", "example", "correcthorse");
    assert_eq!(password.len(), 20);
    assert!(password.bytes().all(|b| (b'!'..=b'~').contains(&b)));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn escaped(symbol: u8) -> String {
        match symbol {
            b'\\' | b'-' => format!("\\{}", char::from(symbol)),
            _ => char::from(symbol).to_string(),
        }
    }

    proptest! {
        #[test]
        fn output_stays_inside_alphabet(
            key in any::<[u8; 32]>(),
            increment in any::<u64>(),
            low in b'!'..=b'}',
            span in 1u8..40,
            count in 1usize..=256,
        ) {
            let high = low.saturating_add(span).min(b'~');
            let declaration = format!("{}-{}", escaped(low), escaped(high));
            let alphabet = Alphabet::compile(&declaration).expect("range should compile");
            prop_assert_eq!(alphabet.len(), usize::from(high - low) + 1);

            let key = SecretKey::from_bytes(key);
            let password = sampler::generate(&key, increment, &alphabet, count);
            prop_assert_eq!(password.len(), count);
            prop_assert!(password.as_bytes().iter().all(|&b| alphabet.contains(b)));
        }

        #[test]
        fn same_key_same_output(key in any::<[u8; 32]>(), increment in any::<u64>()) {
            let alphabet = Alphabet::default();
            let first = sampler::generate(&SecretKey::from_bytes(key), increment, &alphabet, 64);
            let second = sampler::generate(&SecretKey::from_bytes(key), increment, &alphabet, 64);
            prop_assert_eq!(first.as_bytes(), second.as_bytes());
        }

        #[test]
        fn compiled_alphabets_are_ascending_and_unique(declaration in "[a-zA-Z0-9]{2,40}") {
            if let Ok(alphabet) = Alphabet::compile(&declaration) {
                prop_assert!(alphabet.as_bytes().windows(2).all(|pair| pair[0] < pair[1]));
                prop_assert!(declaration.bytes().all(|b| alphabet.contains(b)));
            }
        }

        #[test]
        fn mask_covers_alphabet(size in 2usize..=95) {
            let mask = usize::from(mask_for(size));
            prop_assert!(mask >= size - 1);
            prop_assert!(mask + 1 < 2 * size);
        }
    }
}
