use sea_orm::DatabaseConnection;

use crate::{StockPolicy, locks::BranchLocks};

mod entries;
mod readings;
mod roster;
mod settlement;
mod stock;

pub use readings::BulkReadingsOutcome;
pub use settlement::Settlement;
pub use stock::{StockCommit, TankLevel};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    stock_policy: StockPolicy,
    branch_locks: BranchLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    stock_policy: StockPolicy,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Decide whether a projected negative tank level blocks a commit.
    pub fn stock_policy(mut self, policy: StockPolicy) -> EngineBuilder {
        self.stock_policy = policy;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            stock_policy: self.stock_policy,
            branch_locks: BranchLocks::default(),
        })
    }
}
