//! In-process stub of the loan-calculation service.
//!
//! Behaves the way an `EnvironmentContract` says the deployment behaves,
//! optionally with a fault injected.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use loancheck_domain::environment::InvalidRouteContract;
use loancheck_domain::EnvironmentContract;
use serde_json::{Map, Value, json};
use tokio::task::JoinHandle;

/// Deviation from the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    /// Behave as contracted.
    #[default]
    None,
    /// Accept negative amounts with a normal calculation.
    AcceptNegativeAmount,
    /// Return a different monthly payment on every call.
    Drift,
    /// Answer after the given delay.
    Slow(Duration),
}

#[derive(Clone)]
struct StubState {
    contract: Arc<EnvironmentContract>,
    fault: Fault,
    calls: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Handle for a running stub; the server stops when it is dropped.
pub struct LoanStubHandle {
    base_url: String,
    join: JoinHandle<()>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl LoanStubHandle {
    /// Base URL of the stub.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// JSON bodies received on the calculation route.
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for LoanStubHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Spawns a stub for `contract` on an ephemeral local port.
pub async fn spawn_loan_stub(
    contract: EnvironmentContract,
    fault: Fault,
) -> Result<LoanStubHandle, String> {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let path = contract.calculate_path.clone();
    let state = StubState {
        contract: Arc::new(contract),
        fault,
        calls: Arc::new(AtomicU64::new(0)),
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route(&path, post(calculate))
        .fallback(unknown_route)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .map_err(|err| format!("loan stub bind failed: {err}"))?;
    let base_url = format!(
        "http://{}",
        listener.local_addr().map_err(|err| err.to_string())?
    );
    let join = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(LoanStubHandle {
        base_url,
        join,
        requests,
    })
}

/// Returns an address nothing listens on.
pub async fn closed_port_url() -> Result<String, String> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn calculate(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(body.clone());
    }
    let call = state.calls.fetch_add(1, Ordering::SeqCst);
    if let Fault::Slow(delay) = state.fault {
        tokio::time::sleep(delay).await;
    }

    let contract = &state.contract;
    let amount = body.get(&contract.request_fields.amount).and_then(Value::as_f64);
    let period = body.get(&contract.request_fields.period).and_then(Value::as_f64);
    let (Some(amount), Some(period)) = (amount, period) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing loan terms"})))
            .into_response();
    };

    if amount <= 0.0 && state.fault != Fault::AcceptNegativeAmount {
        let status = StatusCode::from_u16(contract.invalid_amount.status)
            .unwrap_or(StatusCode::BAD_REQUEST);
        let message = contract
            .invalid_amount
            .error_message
            .clone()
            .unwrap_or_else(|| "Internal Server Error".to_string());
        return (status, Json(json!({"error": message}))).into_response();
    }

    let (mut monthly, total, apr) = figures(contract, amount.abs(), period);
    if state.fault == Fault::Drift {
        #[allow(clippy::cast_precision_loss)]
        let drift = call as f64 / 100.0;
        monthly += drift;
    }

    let fields = &contract.response_fields;
    let mut response = Map::new();
    response.insert(fields.monthly_payment.clone(), json!(monthly));
    if let Some(name) = &fields.total_cost {
        response.insert(name.clone(), json!(total));
    }
    if let Some(name) = &fields.apr {
        response.insert(name.clone(), json!(apr));
    }
    Json(Value::Object(response)).into_response()
}

fn figures(contract: &EnvironmentContract, amount: f64, period: f64) -> (f64, f64, f64) {
    if let Some(reference) = &contract.reference
        && reference.terms.amount.as_f64() == Some(amount)
        && f64::from(reference.terms.period) == period
    {
        return (reference.monthly_payment, reference.total_cost, reference.apr);
    }

    let monthly = round2(amount * 1.1 / period.max(1.0));
    (monthly, round2(monthly * period), 12.5)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn unknown_route(State(state): State<StubState>) -> Response {
    match &state.contract.invalid_route {
        InvalidRouteContract::Status { status } => {
            StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::NOT_FOUND)
                .into_response()
        }
        InvalidRouteContract::Fallback { status, contains } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::OK),
            Html(format!(
                "<!DOCTYPE html><html><body><noscript><strong>{contains}. \
                 Please enable it to continue.</strong></noscript><div id=\"app\"></div></body></html>"
            )),
        )
            .into_response(),
    }
}
