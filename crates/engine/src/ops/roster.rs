//! Branch roster: branches, fuel products, tanks, machines and nozzles.

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Branch, EngineError, FuelProduct, Money, Nozzle, ResultEngine, TankStock, Volume, branches,
    fuel_products, machines, nozzles, tanks,
    util::{normalize_fuel_type, normalize_required_name, require_positive_amount},
};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn require_branch(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
    ) -> ResultEngine<branches::Model> {
        branches::Entity::find_by_id(branch_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("branch not exists".to_string()))
    }

    /// Resolve a fuel type against the branch roster.
    pub(super) async fn require_fuel_product(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        fuel_type: &str,
    ) -> ResultEngine<fuel_products::Model> {
        fuel_products::Entity::find()
            .filter(fuel_products::Column::BranchId.eq(branch_id.to_string()))
            .filter(fuel_products::Column::FuelType.eq(fuel_type))
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("fuel type '{fuel_type}' not sold by branch"))
            })
    }

    pub(super) async fn require_nozzle_in_branch(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        nozzle_id: Uuid,
    ) -> ResultEngine<Nozzle> {
        let model = nozzles::Entity::find_by_id(nozzle_id.to_string())
            .filter(nozzles::Column::BranchId.eq(branch_id.to_string()))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("nozzle {nozzle_id} not exists")))?;
        Nozzle::try_from(model)
    }

    /// Create a new branch. Names are unique, case-insensitively.
    pub async fn new_branch(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "branch")?;
        with_tx!(self, |db_tx| {
            let exists = branches::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let branch = Branch::new(name);
            branches::ActiveModel::from(&branch).insert(&db_tx).await?;
            tracing::info!(branch_id = %branch.id, name = %branch.name, "branch created");
            Ok(branch.id)
        })
    }

    pub async fn branch(&self, branch_id: Uuid) -> ResultEngine<Branch> {
        with_tx!(self, |db_tx| {
            let model = self.require_branch(&db_tx, branch_id).await?;
            Branch::try_from(model)
        })
    }

    pub async fn branches(&self) -> ResultEngine<Vec<Branch>> {
        with_tx!(self, |db_tx| {
            branches::Entity::find()
                .order_by_asc(branches::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Branch::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Add a fuel type to the branch roster, or change its selling price.
    pub async fn upsert_fuel_product(
        &self,
        branch_id: Uuid,
        fuel_type: &str,
        selling_price: Money,
    ) -> ResultEngine<FuelProduct> {
        let fuel_type = normalize_fuel_type(fuel_type)?;
        require_positive_amount(selling_price, "selling price")?;
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;

            let existing = fuel_products::Entity::find()
                .filter(fuel_products::Column::BranchId.eq(branch_id.to_string()))
                .filter(fuel_products::Column::FuelType.eq(fuel_type.as_str()))
                .one(&db_tx)
                .await?;

            let product = match existing {
                Some(model) => {
                    let mut product = FuelProduct::try_from(model)?;
                    product.selling_price = selling_price;
                    let active = fuel_products::ActiveModel {
                        id: ActiveValue::Set(product.id.to_string()),
                        selling_price_minor: ActiveValue::Set(selling_price.minor()),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                    product
                }
                None => {
                    let product = FuelProduct {
                        id: Uuid::new_v4(),
                        branch_id,
                        fuel_type,
                        selling_price,
                    };
                    fuel_products::ActiveModel::from(&product)
                        .insert(&db_tx)
                        .await?;
                    product
                }
            };
            Ok(product)
        })
    }

    /// The branch's fuel roster, ordered by fuel type.
    pub async fn fuel_products(&self, branch_id: Uuid) -> ResultEngine<Vec<FuelProduct>> {
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            fuel_products::Entity::find()
                .filter(fuel_products::Column::BranchId.eq(branch_id.to_string()))
                .order_by_asc(fuel_products::Column::FuelType)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(FuelProduct::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Register the tank holding `fuel_type` at a branch.
    ///
    /// A branch keeps one stock record per fuel type.
    pub async fn new_tank(
        &self,
        branch_id: Uuid,
        fuel_type: &str,
        tank_name: &str,
        opening_level: Volume,
    ) -> ResultEngine<TankStock> {
        let fuel_type = normalize_fuel_type(fuel_type)?;
        let tank_name = normalize_required_name(tank_name, "tank")?;
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            self.require_fuel_product(&db_tx, branch_id, &fuel_type)
                .await?;

            let exists = tanks::Entity::find()
                .filter(tanks::Column::BranchId.eq(branch_id.to_string()))
                .filter(tanks::Column::FuelType.eq(fuel_type.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(format!("{fuel_type} tank")));
            }

            let tank = TankStock {
                id: Uuid::new_v4(),
                branch_id,
                fuel_type,
                tank_name,
                current_level: opening_level,
            };
            tanks::ActiveModel::from(&tank).insert(&db_tx).await?;
            Ok(tank)
        })
    }

    pub async fn new_machine(&self, branch_id: Uuid, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "machine")?;
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            let id = Uuid::new_v4();
            machines::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                branch_id: ActiveValue::Set(branch_id.to_string()),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(id)
        })
    }

    /// Attach a nozzle to a machine.
    ///
    /// `initial_reading` seeds the cumulative counter the first reading batch
    /// will open from. The branch must already stock `fuel_type` in a tank,
    /// since every reading moves that tank.
    pub async fn new_nozzle(
        &self,
        machine_id: Uuid,
        fuel_type: &str,
        initial_reading: Volume,
    ) -> ResultEngine<Nozzle> {
        let fuel_type = normalize_fuel_type(fuel_type)?;
        if initial_reading.is_negative() {
            return Err(EngineError::Validation(
                "initial reading must not be negative".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let machine = machines::Entity::find_by_id(machine_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("machine not exists".to_string()))?;
            let branch_id = crate::util::parse_uuid(&machine.branch_id, "branch")?;
            self.require_fuel_product(&db_tx, branch_id, &fuel_type)
                .await?;
            self.require_tank(&db_tx, branch_id, &fuel_type).await?;

            let nozzle = Nozzle::new(machine_id, branch_id, fuel_type, initial_reading);
            nozzles::ActiveModel::from(&nozzle).insert(&db_tx).await?;
            Ok(nozzle)
        })
    }

    /// Return a nozzle snapshot from DB.
    pub async fn nozzle(&self, nozzle_id: Uuid) -> ResultEngine<Nozzle> {
        with_tx!(self, |db_tx| {
            let model = nozzles::Entity::find_by_id(nozzle_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("nozzle not exists".to_string()))?;
            Nozzle::try_from(model)
        })
    }
}
