//! Loancheck - contract-test runner entry point
//!
//! Selects an environment contract, runs the loan-calculation scenarios
//! against it and exits with 0 when every case passed, 1 when a case failed
//! or errored, and 2 when the run could not be configured.

mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use loancheck_application::loan::scenarios;
use loancheck_application::{
    ApplicationError, ApplicationResult, ConfigurationError, EnvironmentSlot,
    ExecuteRequestError,
};
use loancheck_domain::{CaseOutcome, RunReport};
use loancheck_infrastructure::{
    AssertionEvaluator, ContractCatalog, ReqwestHttpClient, SuiteRunner, TracingReporter,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting loancheck v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(report) => {
            print_summary(&report);
            if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(error) => {
            tracing::error!("{error}");
            match error {
                ApplicationError::Configuration(_) | ApplicationError::Run(_) => ExitCode::from(2),
                ApplicationError::Execute(_) => ExitCode::from(1),
            }
        }
    }
}

async fn run() -> ApplicationResult<RunReport> {
    let settings = Settings::from_env().map_err(ConfigurationError::from)?;

    let catalog = ContractCatalog::load(settings.config_path.as_deref())
        .await
        .map_err(ConfigurationError::from)?;
    let contract = catalog
        .get(&settings.environment)
        .map_err(ConfigurationError::from)?;

    let mut environment = contract
        .environment(settings.base_uri.as_deref())
        .map_err(ConfigurationError::from)?;
    if let Some(timeout) = settings.timeout {
        environment = environment.with_timeout(timeout);
    }

    let slot = EnvironmentSlot::new();
    slot.set(environment)?;

    let client = ReqwestHttpClient::new().map_err(ExecuteRequestError::from)?;
    let mut runner = SuiteRunner::new(Arc::new(client))
        .with_reporter(Arc::new(TracingReporter::new()))
        .with_evaluator(AssertionEvaluator::new().with_tolerance(settings.tolerance))
        .with_max_concurrency(settings.concurrency);
    runner.register_all(scenarios(contract));

    Ok(runner.run(&slot).await?)
}

fn print_summary(report: &RunReport) {
    println!("\n{} ({})", report.environment, report.run_id);
    for case in &report.cases {
        match &case.outcome {
            CaseOutcome::Passed => println!("  PASS  {}", case.name),
            CaseOutcome::Failed => {
                println!("  FAIL  {}", case.name);
                for failure in case.failures() {
                    println!(
                        "          {}: {}",
                        failure.assertion.description(),
                        failure.message.as_deref().unwrap_or("failed")
                    );
                }
            }
            CaseOutcome::Errored { error } => println!("  ERROR {}: {error}", case.name),
        }
    }
    println!(
        "\n{} passed, {} failed, {} errored, {} total in {}ms",
        report.passed, report.failed, report.errored, report.total, report.duration_ms
    );
}
