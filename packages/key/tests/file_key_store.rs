//! File key store: lifecycle, round trips and the fallback scan

use keystone_key::prelude::*;
use keystone_key::{
    ErrorKind, FALLBACK_SCAN_MAX_FILE_SIZE, KeySuffix, PrivateKey, StoredKeyEntry, SymmetricKey,
};
use rcgen::{KeyPair, PublicKeyData, PKCS_ECDSA_P256_SHA256, PKCS_ED25519};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn sample_keys() -> Vec<Key> {
    let p256_key = PrivateKey::P256(p256::SecretKey::from_slice(&[7u8; 32]).unwrap());
    let p384_key = PrivateKey::P384(p384::SecretKey::from_slice(&[9u8; 48]).unwrap());
    vec![
        Key::from(SymmetricKey::aes128(&[1u8; 16]).unwrap()),
        Key::from(SymmetricKey::hmac(&[2u8; 48]).unwrap()),
        Key::from(p256_key.public_key()),
        Key::from(p384_key.public_key()),
        Key::from(p256_key),
        Key::from(p384_key),
    ]
}

/// Private key in `keys` sharing the SKI of public key `key`
fn private_half<'a>(key: &Key, keys: &'a [Key]) -> Option<&'a Key> {
    if !matches!(key, Key::Public(_)) {
        return None;
    }
    keys.iter()
        .find(|other| matches!(other, Key::Private(_)) && other.ski() == key.ski())
}

/// Keys that keep their own record once all of `keys` are stored
fn recorded(keys: &[Key]) -> Vec<&Key> {
    keys.iter()
        .filter(|key| private_half(key, keys).is_none())
        .collect()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn every_key_kind_round_trips_in_plaintext() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();

    for key in sample_keys() {
        store.store_key(&key).unwrap();
        let loaded = store.get_key(key.ski().as_bytes()).unwrap();
        assert_eq!(loaded, key);
        assert_eq!(loaded.algorithm(), key.algorithm());
    }
}

#[test]
fn every_key_kind_round_trips_with_password() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(Some(&b"correct horse"[..]), dir.path(), false).unwrap();

    for key in sample_keys() {
        store.store_key(&key).unwrap();
        assert_eq!(store.get_key(key.ski().as_bytes()).unwrap(), key);
    }

    for name in file_names(dir.path()) {
        let record = fs::read_to_string(dir.path().join(&name)).unwrap();
        assert!(record.starts_with("-----BEGIN SEALED "), "{name} is not sealed");
    }
}

#[test]
fn files_follow_the_naming_convention() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    let keys = sample_keys();
    for key in &keys {
        store.store_key(key).unwrap();
    }

    let mut expected: Vec<_> = recorded(&keys)
        .into_iter()
        .map(|key| format!("{}_{}", key.ski().to_hex(), KeySuffix::for_key(key)))
        .collect();
    expected.sort();
    assert_eq!(file_names(dir.path()), expected);
    assert_eq!(expected.len(), 4);

    let suffixes: Vec<_> = keys.iter().map(KeySuffix::for_key).collect();
    assert_eq!(
        suffixes,
        [
            KeySuffix::AesKey,
            KeySuffix::HmacKey,
            KeySuffix::PublicKey,
            KeySuffix::PublicKey,
            KeySuffix::PrivateKey,
            KeySuffix::PrivateKey,
        ]
    );
}

#[cfg(unix)]
#[test]
fn key_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    let key = Key::from(SymmetricKey::aes128(&[4u8; 16]).unwrap());
    store.store_key(&key).unwrap();

    let file = dir
        .path()
        .join(format!("{}_{}", key.ski(), KeySuffix::AesKey));
    let mode = fs::metadata(file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn created_directories_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("store");
    FileKeyStore::open(None, &nested, false).unwrap();

    let mode = fs::metadata(&nested).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn read_only_store_rejects_every_write() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), true).unwrap();
    assert!(store.read_only());

    for key in sample_keys() {
        let err = store.store_key(&key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreState);
        assert!(err.to_string().contains("read only KeyStore"));
    }
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn read_only_store_still_reads() {
    let dir = TempDir::new().unwrap();
    let key = Key::from(SymmetricKey::hmac(b"shared secret").unwrap());
    FileKeyStore::open(Some(&b"pw"[..]), dir.path(), false)
        .unwrap()
        .store_key(&key)
        .unwrap();

    let reader = FileKeyStore::open(Some(&b"pw"[..]), dir.path(), true).unwrap();
    assert_eq!(reader.get_key(key.ski().as_bytes()).unwrap(), key);
}

#[test]
fn init_rejects_empty_path_and_double_init() {
    let store = FileKeyStore::new();
    let err = store.init(None, "", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!store.is_open());

    let dir = TempDir::new().unwrap();
    store.init(None, dir.path(), false).unwrap();
    assert!(store.is_open());
    assert_eq!(store.path().as_deref(), Some(dir.path()));

    let err = store.init(None, dir.path(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreState);
    assert!(err.to_string().contains("already initialized"));
}

#[test]
fn init_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b").join("keys");

    let store = FileKeyStore::open(None, &nested, false).unwrap();
    assert!(nested.is_dir());

    let key = Key::from(SymmetricKey::aes128(&[8u8; 16]).unwrap());
    store.store_key(&key).unwrap();
    assert_eq!(store.get_key(key.ski().as_bytes()).unwrap(), key);
}

#[test]
fn init_on_a_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not-a-dir");
    fs::write(&file, b"plain file").unwrap();

    let err = FileKeyStore::open(None, &file, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn opening_a_populated_directory_leaves_it_untouched() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README"), b"not a key").unwrap();
    let keys = sample_keys();
    let writer = FileKeyStore::open(None, dir.path(), false).unwrap();
    for key in &keys {
        writer.store_key(key).unwrap();
    }

    let before: Vec<_> = file_names(dir.path())
        .into_iter()
        .map(|name| (fs::read(dir.path().join(&name)).unwrap(), name))
        .collect();

    let reopened = FileKeyStore::open(None, dir.path(), false).unwrap();
    let after: Vec<_> = file_names(dir.path())
        .into_iter()
        .map(|name| (fs::read(dir.path().join(&name)).unwrap(), name))
        .collect();
    assert_eq!(before, after);

    for key in &keys {
        let expected = private_half(key, &keys).unwrap_or(key);
        let loaded = reopened.get_key(key.ski().as_bytes()).unwrap();
        assert_eq!(&loaded, expected);
        if !key.is_symmetric() {
            assert_eq!(loaded.public_key().unwrap(), key.public_key().unwrap());
        }
    }
}

#[test]
fn private_record_supersedes_the_public_half() {
    let private = Key::from(PrivateKey::P256(
        p256::SecretKey::from_slice(&[7u8; 32]).unwrap(),
    ));
    let public = private.public_key().unwrap();
    let sk_name = format!("{}_sk", private.ski());

    for password in [None, Some(&b"pw"[..])] {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::open(password, dir.path(), false).unwrap();

        store.store_key(&public).unwrap();
        assert_eq!(store.get_key(public.ski().as_bytes()).unwrap(), public);

        store.store_key(&private).unwrap();
        assert_eq!(file_names(dir.path()), [sk_name.clone()]);
        let loaded = store.get_key(public.ski().as_bytes()).unwrap();
        assert_eq!(loaded, private);
        assert_eq!(loaded.public_key().unwrap(), public);

        store.store_key(&public).unwrap();
        assert_eq!(file_names(dir.path()), [sk_name.clone()]);
        assert_eq!(store.get_key(public.ski().as_bytes()).unwrap(), private);
    }
}

#[test]
fn public_key_stored_after_its_private_half_is_not_written() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    let private = Key::from(PrivateKey::P384(
        p384::SecretKey::from_slice(&[9u8; 48]).unwrap(),
    ));
    let public = private.public_key().unwrap();

    store.store_key(&private).unwrap();
    store.store_key(&public).unwrap();

    assert_eq!(
        store.list_keys().unwrap(),
        [StoredKeyEntry {
            ski: private.ski(),
            suffix: KeySuffix::PrivateKey,
        }]
    );
    assert_eq!(store.get_key(public.ski().as_bytes()).unwrap(), private);
}

#[test]
fn uninitialized_store_refuses_everything() {
    let store = FileKeyStore::default();
    let key = Key::from(SymmetricKey::aes128(&[1u8; 16]).unwrap());

    assert!(!store.read_only());
    assert_eq!(store.path(), None);
    assert_eq!(
        store.get_key(key.ski().as_bytes()).unwrap_err().kind(),
        ErrorKind::StoreState
    );
    assert_eq!(store.store_key(&key).unwrap_err().kind(), ErrorKind::StoreState);
    assert_eq!(store.list_keys().unwrap_err().kind(), ErrorKind::StoreState);
}

#[test]
fn empty_ski_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();

    assert_eq!(store.get_key(&[]).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(
        store.contains_key(&[]).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}

#[test]
fn missing_key_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    store
        .store_key(&Key::from(SymmetricKey::aes128(&[1u8; 16]).unwrap()))
        .unwrap();

    let err = store.get_key(&[0xAA; 32]).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains(&"aa".repeat(32)));
}

#[test]
fn wrong_password_fails_to_decode() {
    let dir = TempDir::new().unwrap();
    let keys = sample_keys();
    let writer = FileKeyStore::open(Some(&b"first"[..]), dir.path(), false).unwrap();
    for key in &keys {
        writer.store_key(key).unwrap();
    }

    for password in [Some(&b"second"[..]), None] {
        let reader = FileKeyStore::open(password, dir.path(), true).unwrap();
        for key in &keys {
            let err = reader.get_key(key.ski().as_bytes()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decode);
        }
    }
}

#[test]
fn renamed_record_is_not_returned_under_another_ski() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    let stored = Key::from(SymmetricKey::aes128(&[1u8; 16]).unwrap());
    let other = Key::from(SymmetricKey::aes128(&[2u8; 16]).unwrap());
    store.store_key(&stored).unwrap();

    fs::rename(
        dir.path().join(format!("{}_aeskey", stored.ski())),
        dir.path().join(format!("{}_aeskey", other.ski())),
    )
    .unwrap();

    let err = store.get_key(other.ski().as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn fallback_scan_finds_private_keys_under_any_name() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    fs::write(dir.path().join("server.pem"), pair.serialize_pem()).unwrap();

    let store = FileKeyStore::open(None, dir.path(), true).unwrap();
    let expected = ImporterRegistry::with_defaults()
        .import(&pair.serialize_der()[..], &P256PrivateKeyImportOpts::default())
        .unwrap();

    let found = store.get_key(expected.ski().as_bytes()).unwrap();
    assert!(found.is_private());
    assert_eq!(found, expected);
    assert!(!store.contains_key(expected.ski().as_bytes()).unwrap());
}

#[test]
fn fallback_scan_skips_oversized_files() {
    let dir = TempDir::new().unwrap();
    let pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    let expected = ImporterRegistry::with_defaults()
        .import(&pair.serialize_der()[..], &P256PrivateKeyImportOpts::default())
        .unwrap();

    // A valid record padded past the ceiling with trailing text the PEM parser ignores
    let mut padded = pair.serialize_pem().into_bytes();
    let limit = usize::try_from(FALLBACK_SCAN_MAX_FILE_SIZE).unwrap();
    padded.extend(std::iter::repeat_n(b'\n', limit));
    fs::write(dir.path().join("big.pem"), &padded).unwrap();
    fs::write(dir.path().join("noise.bin"), [0u8; 128]).unwrap();

    let store = FileKeyStore::open(None, dir.path(), true).unwrap();
    let err = store.get_key(expected.ski().as_bytes()).unwrap_err();
    assert!(err.is_not_found());

    fs::write(dir.path().join("small.pem"), pair.serialize_pem()).unwrap();
    assert_eq!(store.get_key(expected.ski().as_bytes()).unwrap(), expected);
}

#[test]
fn indexed_records_on_unsupported_curves_are_rejected() {
    let dir = TempDir::new().unwrap();
    let pair = KeyPair::generate_for(&PKCS_ED25519).unwrap();
    let private_alias = SymmetricKey::aes128(&[3u8; 16]).unwrap().ski();
    let public_alias = SymmetricKey::aes128(&[4u8; 16]).unwrap().ski();

    fs::write(
        dir.path().join(format!("{private_alias}_sk")),
        pair.serialize_pem(),
    )
    .unwrap();
    let public_record = keystone_codec::public_key_to_pem(&pair.subject_public_key_info(), b"").unwrap();
    fs::write(dir.path().join(format!("{public_alias}_pk")), public_record).unwrap();

    let store = FileKeyStore::open(None, dir.path(), true).unwrap();
    for alias in [private_alias, public_alias] {
        let err = store.get_key(alias.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported, "{err}");
    }
}

#[test]
fn list_keys_reports_conventional_files_only() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyStore::open(None, dir.path(), false).unwrap();
    let keys = sample_keys();
    for key in &keys {
        store.store_key(key).unwrap();
    }
    fs::write(dir.path().join("server.pem"), b"ignored").unwrap();
    fs::write(dir.path().join("deadbeef_sk"), b"ignored").unwrap();
    fs::write(
        dir.path().join(format!("{}_bogus", keys[0].ski())),
        b"ignored",
    )
    .unwrap();

    let mut expected: Vec<_> = recorded(&keys)
        .into_iter()
        .map(|key| StoredKeyEntry {
            ski: key.ski(),
            suffix: KeySuffix::for_key(key),
        })
        .collect();
    expected.sort();

    assert_eq!(store.list_keys().unwrap(), expected);
    for key in &keys {
        assert!(store.contains_key(key.ski().as_bytes()).unwrap());
    }
}

#[test]
fn suffix_names_parse_back() {
    for suffix in KeySuffix::ALL {
        assert_eq!(suffix.to_string().parse::<KeySuffix>().unwrap(), suffix);
    }
    assert_eq!("sk".parse::<KeySuffix>().unwrap(), KeySuffix::PrivateKey);
    assert!("key".parse::<KeySuffix>().is_err());
}

#[test]
fn concurrent_readers_and_writers_share_one_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileKeyStore::open(Some(&b"pw"[..]), dir.path(), false).unwrap());

    let handles: Vec<_> = (0u8..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let key = Key::from(SymmetricKey::aes128(&[i; 16]).unwrap());
                store.store_key(&key).unwrap();
                assert_eq!(store.get_key(key.ski().as_bytes()).unwrap(), key);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list_keys().unwrap().len(), 8);
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn lifecycle_events_carry_the_path_as_a_field() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("logged");
    let log = CapturedLog::default();

    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        FileKeyStore::open(None, &nested, false).unwrap();
    });

    let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    let line = output
        .lines()
        .find(|line| line.contains("Key store directory ready"))
        .unwrap();
    assert!(line.contains(&format!("path={}", nested.display())), "{line}");
}
