//! Storage layer for the transfers bundle.

use async_trait::async_trait;
use sqlx::PgPool;

use tally_core::error::{StorageError, StorageResult};
use tally_core::models::AccountId;

use super::models::{Account, TransferRecord};

/// Storage port for transfer records and participant accounts.
///
/// The engine only ever writes: records are upserted by chain position and
/// accounts by address. Reads beyond the existence check belong to whatever
/// query surface the host exposes.
#[async_trait]
pub trait TransferStorage: Send + Sync {
    /// Insert a batch of transfer records. Re-inserting an already-stored
    /// chain position is a no-op.
    async fn insert_transfers(&self, transfers: &[TransferRecord]) -> StorageResult<()>;

    /// Whether an account record exists for `id`.
    async fn account_exists(&self, id: &AccountId) -> StorageResult<bool>;

    /// Create a bare account record. Duplicate-guarded: concurrent creation
    /// of the same address must not fail.
    async fn insert_account(&self, account: &Account) -> StorageResult<()>;
}

/// PostgreSQL implementation of [`TransferStorage`].
pub struct PgTransferStorage {
    pool: PgPool,
}

impl PgTransferStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferStorage for PgTransferStorage {
    async fn insert_transfers(&self, transfers: &[TransferRecord]) -> StorageResult<()> {
        if transfers.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionError(e.to_string()))?;

        for transfer in transfers {
            sqlx::query(
                r#"
                INSERT INTO transfers (
                    id, block_number, item_index, token, from_account, to_account,
                    timestamp, extrinsic_hash, amount, fees, decimals, success
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::NUMERIC, $10::NUMERIC, $11::NUMERIC, $12)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&transfer.id)
            .bind(transfer.block_number as i64)
            .bind(transfer.index as i32)
            .bind(&transfer.token)
            .bind(&transfer.from.0[..])
            .bind(&transfer.to.0[..])
            .bind(transfer.timestamp)
            .bind(transfer.extrinsic_hash.as_ref().map(|h| h.0.to_vec()))
            .bind(transfer.amount.to_string())
            .bind(transfer.fees.to_string())
            .bind(transfer.decimals.to_string())
            .bind(transfer.success)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionError(e.to_string()))?;

        Ok(())
    }

    async fn account_exists(&self, id: &AccountId) -> StorageResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                .bind(&id.0[..])
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::QueryError(e.to_string()))?;
        Ok(exists)
    }

    async fn insert_account(&self, account: &Account) -> StorageResult<()> {
        // ON CONFLICT absorbs the check-then-create race between items
        // sharing a participant.
        sqlx::query("INSERT INTO accounts (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(&account.id.0[..])
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))?;
        Ok(())
    }
}

/// SQL migrations for the transfers bundle.
/// Each migration is tracked and only executed once.
pub const MIGRATIONS: &[&str] = &[
    // Migration 0: accounts and transfers tables.
    // Accounts come first: transfer participants reference them.
    r#"
CREATE TABLE accounts (
    id BYTEA PRIMARY KEY
);

CREATE TABLE transfers (
    id TEXT PRIMARY KEY,
    block_number BIGINT NOT NULL,
    item_index INTEGER NOT NULL,
    token TEXT NOT NULL,
    from_account BYTEA NOT NULL REFERENCES accounts(id),
    to_account BYTEA NOT NULL REFERENCES accounts(id),
    timestamp TIMESTAMPTZ,
    extrinsic_hash BYTEA,
    amount NUMERIC(39, 0) NOT NULL CHECK (amount >= 0),
    fees NUMERIC(39, 0) NOT NULL CHECK (fees >= 0),
    decimals NUMERIC(39, 0) NOT NULL CHECK (decimals >= 0),
    success BOOLEAN NOT NULL DEFAULT TRUE,
    UNIQUE(block_number, item_index)
);

CREATE INDEX idx_transfers_block ON transfers(block_number);
CREATE INDEX idx_transfers_from ON transfers(from_account);
CREATE INDEX idx_transfers_to ON transfers(to_account);
CREATE INDEX idx_transfers_token ON transfers(token);
"#,
];
