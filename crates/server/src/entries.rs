//! Daily transaction stream endpoints.

use api_types::{
    Created,
    entry::{
        BankDepositNew, CreditNew, CustomerPaymentNew, ExpenseNew, OilSaleNew, PurchaseNew,
        SaleNew, SaleView,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{
    BankDepositCmd, CreditCmd, CustomerPaymentCmd, ExpenseCmd, Money, OilSaleCmd, PurchaseCmd,
    SaleCmd,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

type CreatedResponse = Result<(StatusCode, Json<Created>), ServerError>;

fn created(id: Uuid) -> CreatedResponse {
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn expense_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> CreatedResponse {
    let mut cmd = ExpenseCmd::new(
        branch_id,
        payload.date,
        payload.category,
        Money::new(payload.amount_minor),
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let expense = state.engine.record_expense(cmd).await?;
    created(expense.id)
}

pub async fn credit_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CreditNew>,
) -> CreatedResponse {
    let mut cmd = CreditCmd::new(
        branch_id,
        payload.date,
        payload.customer_name,
        Money::new(payload.amount_minor),
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    let credit = state.engine.record_credit(cmd).await?;
    created(credit.id)
}

pub async fn customer_payment_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CustomerPaymentNew>,
) -> CreatedResponse {
    let mut cmd = CustomerPaymentCmd::new(
        branch_id,
        payload.date,
        payload.customer_name,
        Money::new(payload.amount_minor),
    );
    if let Some(method) = payload.method {
        cmd = cmd.method(method);
    }
    let payment = state.engine.record_customer_payment(cmd).await?;
    created(payment.id)
}

pub async fn bank_deposit_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<BankDepositNew>,
) -> CreatedResponse {
    let mut cmd = BankDepositCmd::new(
        branch_id,
        payload.date,
        payload.bank_name,
        Money::new(payload.amount_minor),
    );
    if let Some(reference) = payload.reference {
        cmd = cmd.reference(reference);
    }
    let deposit = state.engine.record_bank_deposit(cmd).await?;
    created(deposit.id)
}

pub async fn oil_sale_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<OilSaleNew>,
) -> CreatedResponse {
    let quantity = views::parse_volume(&payload.quantity)?;
    let oil_sale = state
        .engine
        .record_oil_sale(OilSaleCmd::new(
            branch_id,
            payload.date,
            payload.product_name,
            quantity,
            Money::new(payload.unit_price_minor),
        ))
        .await?;
    created(oil_sale.id)
}

pub async fn purchase_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<PurchaseNew>,
) -> CreatedResponse {
    let quantity = views::parse_volume(&payload.quantity)?;
    let mut cmd = PurchaseCmd::new(
        branch_id,
        payload.date,
        payload.fuel_type,
        quantity,
        Money::new(payload.purchase_price_minor),
    );
    if let Some(invoice) = payload.invoice {
        cmd = cmd.invoice(invoice);
    }
    let purchase = state.engine.record_purchase(cmd).await?;
    created(purchase.id)
}

/// Record the payment-method split; the total is computed from the day's
/// revenue.
pub async fn sale_upsert(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<SaleNew>,
) -> Result<Json<SaleView>, ServerError> {
    let sale = state
        .engine
        .record_sale(
            SaleCmd::new(branch_id, payload.date)
                .atm(Money::new(payload.atm_minor))
                .paytm(Money::new(payload.paytm_minor))
                .fleet(Money::new(payload.fleet_minor)),
        )
        .await?;
    Ok(Json(views::sale(sale)))
}
