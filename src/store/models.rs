//! Database row types for Diesel.
//!
//! Insertable structs omit autoincrement ids; queryable structs carry
//! them. Timestamps are RFC 3339 text, written by the repos.

use diesel::prelude::*;

use super::schema::{
    bucket_markets, config_snapshots, daily_pnl, edge_results, forecast_snapshots, market_events,
    operator_commands, order_intents, order_results, positions, risk_checks, runs, system_state,
};

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = market_events)]
pub struct NewMarketEventRow {
    pub event_id: String,
    pub slug: String,
    pub city_slug: String,
    pub target_date: String,
    pub title: String,
    pub raw_json: String,
    pub fetched_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bucket_markets)]
pub struct NewBucketMarketRow {
    pub event_row_id: i32,
    pub market_id: String,
    pub condition_id: String,
    pub clob_token_id_yes: String,
    pub clob_token_id_no: String,
    pub outcome_price_yes: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    pub last_trade_price: f64,
    pub liquidity: f64,
    pub volume_24hr: f64,
    pub maker_base_fee: f64,
    pub taker_base_fee: f64,
    pub order_min_size: f64,
    pub accepting_orders: bool,
    pub end_date: String,
    pub group_item_title: String,
    pub group_item_threshold: String,
    pub bucket_kind: String,
    pub bucket_low: i32,
    pub bucket_high: i32,
    pub bucket_unit: String,
    pub fetched_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = forecast_snapshots)]
pub struct NewForecastRow {
    pub city_slug: String,
    pub target_date: String,
    pub high_temp_f: i32,
    pub source_generated_at: String,
    pub fetched_at: String,
    pub raw_json: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = edge_results)]
pub struct NewEdgeResultRow {
    pub run_id: String,
    pub event_id: String,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub bucket_probability: f64,
    pub market_price_yes: f64,
    pub gross_edge: f64,
    pub fee_estimate: f64,
    pub slippage_estimate: f64,
    pub net_edge: f64,
    pub reason_code: String,
    pub sigma_used: f64,
    pub created_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = edge_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EdgeResultRow {
    pub id: i32,
    pub run_id: String,
    pub event_id: String,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub bucket_probability: f64,
    pub market_price_yes: f64,
    pub gross_edge: f64,
    pub fee_estimate: f64,
    pub slippage_estimate: f64,
    pub net_edge: f64,
    pub reason_code: String,
    pub sigma_used: f64,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = risk_checks)]
pub struct NewRiskCheckRow {
    pub run_id: String,
    pub idempotency_key: String,
    pub check_name: String,
    pub passed: bool,
    pub block_reason: Option<String>,
    pub detail: String,
    pub created_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = risk_checks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RiskCheckRow {
    pub id: i32,
    pub run_id: String,
    pub idempotency_key: String,
    pub check_name: String,
    pub passed: bool,
    pub block_reason: Option<String>,
    pub detail: String,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = order_intents)]
pub struct NewOrderIntentRow {
    pub run_id: String,
    pub idempotency_key: String,
    pub market_id: String,
    pub clob_token_id: String,
    pub side: String,
    pub price: f64,
    pub size_usd: f64,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub net_edge: f64,
    pub created_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = order_intents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderIntentRow {
    pub id: i32,
    pub run_id: String,
    pub idempotency_key: String,
    pub market_id: String,
    pub clob_token_id: String,
    pub side: String,
    pub price: f64,
    pub size_usd: f64,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub net_edge: f64,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = order_results)]
pub struct NewOrderResultRow {
    pub idempotency_key: String,
    pub status: String,
    pub fill_price: Option<f64>,
    pub fill_size: Option<f64>,
    pub error_message: String,
    pub executed_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = order_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderResultRow {
    pub id: i32,
    pub idempotency_key: String,
    pub status: String,
    pub fill_price: Option<f64>,
    pub fill_size: Option<f64>,
    pub error_message: String,
    pub executed_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = positions)]
pub struct NewPositionRow {
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub entry_price: f64,
    pub current_price: f64,
    pub size_usd: f64,
    pub unrealized_pnl: f64,
    pub status: String,
    pub opened_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionRow {
    pub id: i32,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub entry_price: f64,
    pub current_price: f64,
    pub size_usd: f64,
    pub unrealized_pnl: f64,
    pub status: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = daily_pnl)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyPnlRow {
    pub id: i32,
    pub date: String,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = config_snapshots)]
pub struct NewConfigSnapshotRow {
    pub config_hash: String,
    pub config_json: String,
    pub created_at: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = system_state)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SystemStateRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = operator_commands)]
pub struct NewOperatorCommandRow {
    pub command: String,
    pub args: String,
    pub result: String,
    pub executed_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = runs)]
pub struct NewRunRow {
    pub run_id: String,
    pub mode: String,
    pub config_hash: Option<String>,
    pub started_at: String,
    pub status: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RunRow {
    pub id: i32,
    pub run_id: String,
    pub mode: String,
    pub config_hash: Option<String>,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub status: String,
    pub cities_scanned: i32,
    pub events_found: i32,
    pub opportunities_found: i32,
    pub orders_attempted: i32,
    pub orders_succeeded: i32,
    pub best_edge: Option<f64>,
    pub summary_json: Option<String>,
    pub error_message: Option<String>,
}
