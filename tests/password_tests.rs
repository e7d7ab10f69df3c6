//! 密码哈希功能测试
//!
//! 测试 Argon2id 密码哈希和比对功能

use authgate::auth::password::PasswordHasher;

fn hasher() -> PasswordHasher {
    PasswordHasher::new(1, 1024, 1).expect("valid params")
}

#[tokio::test]
async fn test_compare_accepts_own_hash() {
    let hasher = hasher();

    for password in ["1234", "TestPassword123!", "pässwörd", " spaced out "] {
        let hash = hasher.hash(password).await.expect("Hashing should succeed");
        assert!(hasher.compare(password, &hash).await, "{:?} should verify", password);
    }
}

#[tokio::test]
async fn test_compare_rejects_other_passwords() {
    let hasher = hasher();
    let corpus = ["1234", "12345", "password", "Password", ""];

    for (i, stored) in corpus.iter().enumerate() {
        let hash = hasher.hash(stored).await.unwrap();
        for (j, candidate) in corpus.iter().enumerate() {
            if i != j {
                assert!(!hasher.compare(candidate, &hash).await);
            }
        }
    }
}

#[tokio::test]
async fn test_hash_different_each_time() {
    let hasher = hasher();

    let hash1 = hasher.hash("1234").await.unwrap();
    let hash2 = hasher.hash("1234").await.unwrap();

    // 随机盐，每次生成的哈希不同
    assert_ne!(hash1, hash2);
    assert!(hasher.compare("1234", &hash1).await);
    assert!(hasher.compare("1234", &hash2).await);
}

#[tokio::test]
async fn test_compare_uses_parameters_from_digest() {
    let strong = PasswordHasher::new(3, 2048, 1).unwrap();
    let weak = hasher();

    let hash = strong.hash("1234").await.unwrap();
    assert!(weak.compare("1234", &hash).await);
}
