//! Consolidated voter repository trait
//!
//! Provides a single [`VoterRepo`] over accounts, sessions, categories,
//! representatives, and bills so services and handlers can be tested
//! against [`mock::MockVoterRepo`] without a database.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::accounts::{
    account_exists, create_account, get_account_by_id, get_account_by_screen_name, AccountRecord,
    AccountRepoError, NewAccount,
};
use super::bills::{
    apply_bill_batch, existing_bill_ids, get_bill, list_bills_by_category, BillBatchResult,
    BillRecord, BillWrite,
};
use super::categories::{
    account_category_link_exists, delete_account_category_links, get_category,
    get_category_by_name, insert_account_category_links, list_account_categories,
    list_categories, seed_categories, CategoryRecord,
};
use super::representatives::{
    find_representative_by_name, insert_representative, list_house_members, list_senators,
    RepresentativeRecord,
};
use super::sessions::{create_session, delete_session, get_session_account};
use super::RepoError;

#[async_trait]
pub trait VoterRepo: Send + Sync {
    // Accounts

    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord, AccountRepoError>;

    async fn get_account_by_id(&self, id: i64) -> Result<AccountRecord, AccountRepoError>;

    async fn get_account_by_screen_name(
        &self,
        screen_name: &str,
    ) -> Result<AccountRecord, AccountRepoError>;

    async fn account_exists(&self, screen_name: &str, email: &str)
        -> Result<bool, AccountRepoError>;

    // Sessions

    async fn create_session(
        &self,
        account_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Uuid, RepoError>;

    async fn get_session_account(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountRecord>, RepoError>;

    async fn delete_session(&self, session_id: Uuid) -> Result<(), RepoError>;

    // Categories

    /// Insert missing category names in one transaction. Returns rows created.
    async fn seed_categories(&self, names: &[String]) -> Result<u64, RepoError>;

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn get_category(&self, id: i32) -> Result<CategoryRecord, RepoError>;

    async fn get_category_by_name(&self, name: &str) -> Result<CategoryRecord, RepoError>;

    async fn account_category_link_exists(
        &self,
        account_id: i64,
        category_id: i32,
    ) -> Result<bool, RepoError>;

    /// Link an account to categories in one transaction.
    async fn insert_account_category_links(
        &self,
        account_id: i64,
        category_ids: &[i32],
    ) -> Result<u64, RepoError>;

    async fn delete_account_category_links(
        &self,
        account_id: i64,
        category_ids: &[i32],
    ) -> Result<u64, RepoError>;

    async fn list_account_categories(&self, account_id: i64)
        -> Result<Vec<CategoryRecord>, RepoError>;

    // Representatives

    /// Returns whether a row was inserted; existing ids or names are skipped.
    async fn insert_representative(&self, rep: &RepresentativeRecord) -> Result<bool, RepoError>;

    async fn find_representative_by_name(
        &self,
        name: &str,
    ) -> Result<Option<RepresentativeRecord>, RepoError>;

    async fn list_senators(&self) -> Result<Vec<RepresentativeRecord>, RepoError>;

    async fn list_house_members(&self) -> Result<Vec<RepresentativeRecord>, RepoError>;

    // Bills

    async fn existing_bill_ids(&self, bill_ids: &[String]) -> Result<HashSet<String>, RepoError>;

    /// Apply one category's writes in a single transaction.
    async fn apply_bill_batch(
        &self,
        category_id: i32,
        writes: &[BillWrite],
    ) -> Result<BillBatchResult, RepoError>;

    async fn list_bills_by_category(&self, category_id: i32) -> Result<Vec<BillRecord>, RepoError>;

    async fn get_bill(&self, bill_id: &str) -> Result<BillRecord, RepoError>;
}

/// `PostgreSQL` implementation of [`VoterRepo`].
pub struct PgVoterRepo {
    pool: PgPool,
}

impl PgVoterRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoterRepo for PgVoterRepo {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord, AccountRepoError> {
        create_account(&self.pool, account).await
    }

    async fn get_account_by_id(&self, id: i64) -> Result<AccountRecord, AccountRepoError> {
        get_account_by_id(&self.pool, id).await
    }

    async fn get_account_by_screen_name(
        &self,
        screen_name: &str,
    ) -> Result<AccountRecord, AccountRepoError> {
        get_account_by_screen_name(&self.pool, screen_name).await
    }

    async fn account_exists(
        &self,
        screen_name: &str,
        email: &str,
    ) -> Result<bool, AccountRepoError> {
        account_exists(&self.pool, screen_name, email).await
    }

    async fn create_session(
        &self,
        account_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Uuid, RepoError> {
        create_session(&self.pool, account_id, expires_at).await
    }

    async fn get_session_account(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountRecord>, RepoError> {
        get_session_account(&self.pool, session_id, now).await
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<(), RepoError> {
        delete_session(&self.pool, session_id).await
    }

    async fn seed_categories(&self, names: &[String]) -> Result<u64, RepoError> {
        seed_categories(&self.pool, names).await
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        list_categories(&self.pool).await
    }

    async fn get_category(&self, id: i32) -> Result<CategoryRecord, RepoError> {
        get_category(&self.pool, id).await
    }

    async fn get_category_by_name(&self, name: &str) -> Result<CategoryRecord, RepoError> {
        get_category_by_name(&self.pool, name).await
    }

    async fn account_category_link_exists(
        &self,
        account_id: i64,
        category_id: i32,
    ) -> Result<bool, RepoError> {
        account_category_link_exists(&self.pool, account_id, category_id).await
    }

    async fn insert_account_category_links(
        &self,
        account_id: i64,
        category_ids: &[i32],
    ) -> Result<u64, RepoError> {
        insert_account_category_links(&self.pool, account_id, category_ids).await
    }

    async fn delete_account_category_links(
        &self,
        account_id: i64,
        category_ids: &[i32],
    ) -> Result<u64, RepoError> {
        delete_account_category_links(&self.pool, account_id, category_ids).await
    }

    async fn list_account_categories(
        &self,
        account_id: i64,
    ) -> Result<Vec<CategoryRecord>, RepoError> {
        list_account_categories(&self.pool, account_id).await
    }

    async fn insert_representative(&self, rep: &RepresentativeRecord) -> Result<bool, RepoError> {
        insert_representative(&self.pool, rep).await
    }

    async fn find_representative_by_name(
        &self,
        name: &str,
    ) -> Result<Option<RepresentativeRecord>, RepoError> {
        find_representative_by_name(&self.pool, name).await
    }

    async fn list_senators(&self) -> Result<Vec<RepresentativeRecord>, RepoError> {
        list_senators(&self.pool).await
    }

    async fn list_house_members(&self) -> Result<Vec<RepresentativeRecord>, RepoError> {
        list_house_members(&self.pool).await
    }

    async fn existing_bill_ids(&self, bill_ids: &[String]) -> Result<HashSet<String>, RepoError> {
        existing_bill_ids(&self.pool, bill_ids).await
    }

    async fn apply_bill_batch(
        &self,
        category_id: i32,
        writes: &[BillWrite],
    ) -> Result<BillBatchResult, RepoError> {
        apply_bill_batch(&self.pool, category_id, writes).await
    }

    async fn list_bills_by_category(&self, category_id: i32) -> Result<Vec<BillRecord>, RepoError> {
        list_bills_by_category(&self.pool, category_id).await
    }

    async fn get_bill(&self, bill_id: &str) -> Result<BillRecord, RepoError> {
        get_bill(&self.pool, bill_id).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::expect_used, clippy::missing_panics_doc, clippy::cast_possible_truncation)]
pub mod mock {
    //! In-memory voter repo for unit testing.
    //!
    //! Mirrors the uniqueness and skip-on-conflict behavior of the Postgres
    //! schema. Batch writes are all-or-nothing, and can be made to fail with
    //! [`MockVoterRepo::fail_writes`].

    use super::{
        async_trait, AccountRecord, AccountRepoError, BillBatchResult, BillRecord, BillWrite,
        CategoryRecord, DateTime, HashSet, NewAccount, RepoError, RepresentativeRecord, Utc, Uuid,
        VoterRepo,
    };
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        accounts: Vec<AccountRecord>,
        sessions: HashMap<Uuid, (i64, DateTime<Utc>)>,
        categories: Vec<CategoryRecord>,
        account_categories: BTreeSet<(i64, i32)>,
        representatives: Vec<RepresentativeRecord>,
        bills: Vec<BillRecord>,
        bill_categories: BTreeSet<(String, i32)>,
        fail_writes: bool,
    }

    fn injected_failure() -> RepoError {
        RepoError::Database(sqlx::Error::Protocol("injected write failure".to_string()))
    }

    /// In-memory implementation of [`VoterRepo`].
    #[derive(Default)]
    pub struct MockVoterRepo {
        state: Mutex<State>,
    }

    impl MockVoterRepo {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make batch and link writes fail with a database error.
        pub fn fail_writes(&self, fail: bool) {
            self.state.lock().expect("lock poisoned").fail_writes = fail;
        }

        /// Add a representative directly, bypassing ingestion.
        pub fn add_representative(&self, rep: RepresentativeRecord) {
            self.state.lock().expect("lock poisoned").representatives.push(rep);
        }

        /// Add a category and return its id.
        pub fn add_category(&self, name: &str) -> i32 {
            let mut state = self.state.lock().expect("lock poisoned");
            let id = state.categories.len() as i32 + 1;
            state.categories.push(CategoryRecord {
                id,
                name: name.to_string(),
            });
            id
        }

        #[must_use]
        pub fn representatives(&self) -> Vec<RepresentativeRecord> {
            self.state.lock().expect("lock poisoned").representatives.clone()
        }

        #[must_use]
        pub fn bills(&self) -> Vec<BillRecord> {
            self.state.lock().expect("lock poisoned").bills.clone()
        }

        /// All (bill id, category id) links.
        #[must_use]
        pub fn bill_links(&self) -> Vec<(String, i32)> {
            self.state
                .lock()
                .expect("lock poisoned")
                .bill_categories
                .iter()
                .cloned()
                .collect()
        }

        /// All (account id, category id) links.
        #[must_use]
        pub fn account_links(&self) -> Vec<(i64, i32)> {
            self.state
                .lock()
                .expect("lock poisoned")
                .account_categories
                .iter()
                .copied()
                .collect()
        }
    }

    #[async_trait]
    impl VoterRepo for MockVoterRepo {
        async fn create_account(
            &self,
            account: &NewAccount,
        ) -> Result<AccountRecord, AccountRepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            if state
                .accounts
                .iter()
                .any(|a| a.screen_name == account.screen_name)
            {
                return Err(AccountRepoError::DuplicateScreenName);
            }
            let record = AccountRecord {
                id: state.accounts.len() as i64 + 1,
                screen_name: account.screen_name.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                address: account.address.clone(),
                created_at: Utc::now(),
            };
            state.accounts.push(record.clone());
            Ok(record)
        }

        async fn get_account_by_id(&self, id: i64) -> Result<AccountRecord, AccountRepoError> {
            let state = self.state.lock().expect("lock poisoned");
            state
                .accounts
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(AccountRepoError::NotFound)
        }

        async fn get_account_by_screen_name(
            &self,
            screen_name: &str,
        ) -> Result<AccountRecord, AccountRepoError> {
            let state = self.state.lock().expect("lock poisoned");
            state
                .accounts
                .iter()
                .find(|a| a.screen_name == screen_name)
                .cloned()
                .ok_or(AccountRepoError::NotFound)
        }

        async fn account_exists(
            &self,
            screen_name: &str,
            email: &str,
        ) -> Result<bool, AccountRepoError> {
            let state = self.state.lock().expect("lock poisoned");
            Ok(state
                .accounts
                .iter()
                .any(|a| a.screen_name == screen_name || a.email == email))
        }

        async fn create_session(
            &self,
            account_id: i64,
            expires_at: DateTime<Utc>,
        ) -> Result<Uuid, RepoError> {
            let id = Uuid::new_v4();
            self.state
                .lock()
                .expect("lock poisoned")
                .sessions
                .insert(id, (account_id, expires_at));
            Ok(id)
        }

        async fn get_session_account(
            &self,
            session_id: Uuid,
            now: DateTime<Utc>,
        ) -> Result<Option<AccountRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            Ok(state
                .sessions
                .get(&session_id)
                .filter(|(_, expires_at)| *expires_at > now)
                .and_then(|(account_id, _)| {
                    state.accounts.iter().find(|a| a.id == *account_id).cloned()
                }))
        }

        async fn delete_session(&self, session_id: Uuid) -> Result<(), RepoError> {
            self.state
                .lock()
                .expect("lock poisoned")
                .sessions
                .remove(&session_id);
            Ok(())
        }

        async fn seed_categories(&self, names: &[String]) -> Result<u64, RepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            let mut inserted = 0;
            for name in names {
                if state.categories.iter().any(|c| &c.name == name) {
                    continue;
                }
                let id = state.categories.len() as i32 + 1;
                state.categories.push(CategoryRecord {
                    id,
                    name: name.clone(),
                });
                inserted += 1;
            }
            Ok(inserted)
        }

        async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
            let mut categories = self.state.lock().expect("lock poisoned").categories.clone();
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(categories)
        }

        async fn get_category(&self, id: i32) -> Result<CategoryRecord, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            state
                .categories
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(RepoError::NotFound)
        }

        async fn get_category_by_name(&self, name: &str) -> Result<CategoryRecord, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            state
                .categories
                .iter()
                .find(|c| c.name == name)
                .cloned()
                .ok_or(RepoError::NotFound)
        }

        async fn account_category_link_exists(
            &self,
            account_id: i64,
            category_id: i32,
        ) -> Result<bool, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            Ok(state.account_categories.contains(&(account_id, category_id)))
        }

        async fn insert_account_category_links(
            &self,
            account_id: i64,
            category_ids: &[i32],
        ) -> Result<u64, RepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.fail_writes {
                return Err(injected_failure());
            }
            if category_ids
                .iter()
                .any(|id| !state.categories.iter().any(|c| c.id == *id))
            {
                return Err(RepoError::Database(sqlx::Error::Protocol(
                    "foreign key violation".to_string(),
                )));
            }
            let mut inserted = 0;
            for id in category_ids {
                if state.account_categories.insert((account_id, *id)) {
                    inserted += 1;
                }
            }
            Ok(inserted)
        }

        async fn delete_account_category_links(
            &self,
            account_id: i64,
            category_ids: &[i32],
        ) -> Result<u64, RepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            let mut deleted = 0;
            for id in category_ids {
                if state.account_categories.remove(&(account_id, *id)) {
                    deleted += 1;
                }
            }
            Ok(deleted)
        }

        async fn list_account_categories(
            &self,
            account_id: i64,
        ) -> Result<Vec<CategoryRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            let mut categories: Vec<CategoryRecord> = state
                .categories
                .iter()
                .filter(|c| state.account_categories.contains(&(account_id, c.id)))
                .cloned()
                .collect();
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(categories)
        }

        async fn insert_representative(
            &self,
            rep: &RepresentativeRecord,
        ) -> Result<bool, RepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            if state
                .representatives
                .iter()
                .any(|r| r.external_id == rep.external_id || r.name == rep.name)
            {
                return Ok(false);
            }
            state.representatives.push(rep.clone());
            Ok(true)
        }

        async fn find_representative_by_name(
            &self,
            name: &str,
        ) -> Result<Option<RepresentativeRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            Ok(state.representatives.iter().find(|r| r.name == name).cloned())
        }

        async fn list_senators(&self) -> Result<Vec<RepresentativeRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            let mut reps: Vec<_> = state
                .representatives
                .iter()
                .filter(|r| r.title.starts_with("Senator"))
                .cloned()
                .collect();
            reps.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(reps)
        }

        async fn list_house_members(&self) -> Result<Vec<RepresentativeRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            let mut reps: Vec<_> = state
                .representatives
                .iter()
                .filter(|r| r.title == "Representative")
                .cloned()
                .collect();
            reps.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(reps)
        }

        async fn existing_bill_ids(
            &self,
            bill_ids: &[String],
        ) -> Result<HashSet<String>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            Ok(state
                .bills
                .iter()
                .filter(|b| bill_ids.contains(&b.bill_id))
                .map(|b| b.bill_id.clone())
                .collect())
        }

        async fn apply_bill_batch(
            &self,
            category_id: i32,
            writes: &[BillWrite],
        ) -> Result<BillBatchResult, RepoError> {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.fail_writes {
                return Err(injected_failure());
            }
            // Stage against copies so a failed batch leaves nothing behind.
            let mut bills = state.bills.clone();
            let mut links = state.bill_categories.clone();
            let mut result = BillBatchResult::default();
            for write in writes {
                if let BillWrite::Insert(bill) = write {
                    if !bills.iter().any(|b| b.bill_id == bill.bill_id) {
                        if bills.iter().any(|b| b.uri == bill.uri) {
                            return Err(RepoError::DuplicateBillUri(bill.bill_id.clone()));
                        }
                        bills.push(bill.clone());
                        result.bills_inserted += 1;
                    }
                }
                if !bills.iter().any(|b| b.bill_id == write.bill_id()) {
                    return Err(RepoError::Database(sqlx::Error::Protocol(
                        "foreign key violation".to_string(),
                    )));
                }
                if links.insert((write.bill_id().to_string(), category_id)) {
                    result.links_inserted += 1;
                }
            }
            state.bills = bills;
            state.bill_categories = links;
            Ok(result)
        }

        async fn list_bills_by_category(
            &self,
            category_id: i32,
        ) -> Result<Vec<BillRecord>, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            let mut bills: Vec<_> = state
                .bills
                .iter()
                .filter(|b| {
                    state
                        .bill_categories
                        .contains(&(b.bill_id.clone(), category_id))
                })
                .cloned()
                .collect();
            bills.sort_by(|a, b| a.bill_id.cmp(&b.bill_id));
            Ok(bills)
        }

        async fn get_bill(&self, bill_id: &str) -> Result<BillRecord, RepoError> {
            let state = self.state.lock().expect("lock poisoned");
            state
                .bills
                .iter()
                .find(|b| b.bill_id == bill_id)
                .cloned()
                .ok_or(RepoError::NotFound)
        }
    }
}
