//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use attest::{Notary, NotaryConfig};
use attest_core::DocumentMeta;
use attest_ledger::{InMemoryRegistry, Keypair, LedgerClient};
use attest_store::MemoryStore;

/// A test fixture with a signer, an in-memory registry, and an in-memory
/// store.
pub struct TestFixture {
    pub keypair: Keypair,
    pub registry: Arc<InMemoryRegistry>,
    pub store: Arc<MemoryStore>,
}

impl TestFixture {
    /// Create a new fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            registry: Arc::new(InMemoryRegistry::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            registry: Arc::new(InMemoryRegistry::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// A notary wired to this fixture's registry and store.
    pub fn notary(&self) -> Notary<Arc<MemoryStore>> {
        self.notary_with(NotaryConfig::default())
    }

    /// A notary with explicit configuration.
    pub fn notary_with(&self, config: NotaryConfig) -> Notary<Arc<MemoryStore>> {
        let client = LedgerClient::new(self.registry.clone(), self.keypair.clone());
        Notary::new(self.store.clone(), client, config)
    }

    /// A 64-hex raw hash filled with `byte`.
    pub fn raw_hash(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    /// Descriptive fields for a test document.
    pub fn meta(filename: &str) -> DocumentMeta {
        DocumentMeta {
            filename: filename.to_string(),
            file_size: 4096,
            mime_type: Some("application/pdf".into()),
            uploader: Some("alice@example.com".into()),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixtures that share one ledger but keep separate stores and signers,
/// for cross-party tests.
pub fn shared_ledger_fixtures(count: usize) -> Vec<TestFixture> {
    let registry = Arc::new(InMemoryRegistry::new());
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture {
                keypair: Keypair::from_seed(&seed),
                registry: registry.clone(),
                store: Arc::new(MemoryStore::new()),
            }
        })
        .collect()
}
