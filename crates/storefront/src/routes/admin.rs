//! Back-office routes, gated on the admin role.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{
    ClientOrderCount, ClientRepository, CommentSplit, DailyLogins, OrderRepository, PeriodCount,
    StatsPeriod,
};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ClientIdentity;
use crate::state::AppState;

/// Query string for the stats dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Bucket size for the order counts; defaults to daily.
    #[serde(default)]
    pub period: StatsPeriod,
}

/// Everything the dashboard renders in one round trip.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub period: StatsPeriod,
    pub orders_by_period: Vec<PeriodCount>,
    pub top_clients: Vec<ClientOrderCount>,
    pub comments: CommentSplit,
    pub daily_logins: Vec<DailyLogins>,
}

/// Aggregated order and login statistics.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    let orders = OrderRepository::new(state.pool());

    let orders_by_period = orders.counts_by_period(query.period).await?;
    let top_clients = orders.top_clients().await?;
    let comments = orders.comment_split().await?;
    let daily_logins = orders.daily_logins().await?;

    Ok(Json(StatsResponse {
        period: query.period,
        orders_by_period,
        top_clients,
        comments,
        daily_logins,
    }))
}

/// Full client directory, most recently active first.
#[instrument(skip(state, _admin))]
pub async fn clients(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<ClientIdentity>>> {
    let list = ClientRepository::new(state.pool()).list().await?;
    Ok(Json(list))
}
