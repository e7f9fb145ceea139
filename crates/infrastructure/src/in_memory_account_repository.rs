use std::collections::HashMap;

use async_trait::async_trait;
use storyteller_application::AccountRetentionRepository;
use storyteller_core::AppResult;
use storyteller_domain::{Account, AccountId};
use tokio::sync::RwLock;

/// In-memory account store for tests and local development.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    /// Creates an empty account store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account snapshot.
    pub async fn insert_account(&self, account: Account) {
        self.accounts.write().await.insert(account.id(), account);
    }

    /// Finds one account snapshot.
    pub async fn find_account(&self, account_id: AccountId) -> Option<Account> {
        self.accounts.read().await.get(&account_id).cloned()
    }

    /// Returns the number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountRetentionRepository for InMemoryAccountRepository {
    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by_key(|account| (account.account_created_at(), account.id()));
        Ok(accounts)
    }

    async fn delete_account(&self, account_id: AccountId) -> AppResult<bool> {
        Ok(self.accounts.write().await.remove(&account_id).is_some())
    }
}
