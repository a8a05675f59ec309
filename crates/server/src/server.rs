use axum::{
    Router,
    routing::{get, post},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{entries, readings, reports, roster, tanks};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/branches", post(roster::branch_new).get(roster::branches))
        .route(
            "/branches/{branch_id}/fuel-products",
            get(roster::fuel_products).put(roster::fuel_product_upsert),
        )
        .route("/branches/{branch_id}/machines", post(roster::machine_new))
        .route("/machines/{machine_id}/nozzles", post(roster::nozzle_new))
        .route("/nozzles/{nozzle_id}", get(roster::nozzle))
        .route(
            "/branches/{branch_id}/tanks",
            get(tanks::levels).post(tanks::tank_new),
        )
        .route(
            "/branches/{branch_id}/readings",
            get(readings::list).post(readings::bulk_submit),
        )
        .route("/branches/{branch_id}/expenses", post(entries::expense_new))
        .route("/branches/{branch_id}/credits", post(entries::credit_new))
        .route(
            "/branches/{branch_id}/customer-payments",
            post(entries::customer_payment_new),
        )
        .route(
            "/branches/{branch_id}/bank-deposits",
            post(entries::bank_deposit_new),
        )
        .route("/branches/{branch_id}/oil-sales", post(entries::oil_sale_new))
        .route("/branches/{branch_id}/purchases", post(entries::purchase_new))
        .route(
            "/branches/{branch_id}/sales",
            axum::routing::put(entries::sale_upsert),
        )
        .route("/branches/{branch_id}/report", get(reports::daily))
        .route("/branches/{branch_id}/settle", post(reports::settle))
        .route(
            "/branches/{branch_id}/balance-receipt",
            get(reports::balance_receipt),
        )
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
