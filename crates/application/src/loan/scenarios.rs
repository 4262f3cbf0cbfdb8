//! Loan-calculation scenarios, parameterised by deployment contract.

use loancheck_domain::environment::{EnvironmentContract, InvalidRouteContract, LoanTerms};
use loancheck_domain::testing::{Assertion, StatusExpectation, TestCase};
use serde_json::Value;

/// Path no deployment serves.
pub const INVALID_ROUTE: &str = "/invalid-endpoint";

/// Case names, shared with reports and tests.
pub mod names {
    /// Plain valid calculation with positive figures.
    pub const VALID_CALCULATION: &str = "valid loan calculation";
    /// Calculated fields are present.
    pub const FIELDS_PRESENT: &str = "calculated fields present";
    /// Prefix of the boundary-value cases.
    pub const BOUNDARY_PREFIX: &str = "boundary values";
    /// Negative amount is rejected.
    pub const INVALID_AMOUNT: &str = "invalid loan amount";
    /// Unknown route is answered per contract.
    pub const INVALID_ROUTE: &str = "api error handling";
    /// Known request returns known figures.
    pub const REFERENCE_CALCULATION: &str = "reference calculation";
    /// Same request twice gives the same figures.
    pub const DETERMINISTIC: &str = "deterministic calculation";
}

/// Builds the full scenario set for one deployment.
///
/// Every deployment gets the same intents; the contract decides field
/// names, expected statuses and which figures exist.
#[must_use]
pub fn scenarios(contract: &EnvironmentContract) -> Vec<TestCase> {
    let mut cases = vec![valid_calculation(contract), fields_present(contract)];
    cases.extend(boundary_values(contract));
    cases.push(invalid_amount(contract));
    cases.push(invalid_route(contract));
    cases.extend(reference_calculation(contract));
    cases.push(deterministic(contract));
    cases
}

fn calculation(contract: &EnvironmentContract, name: impl Into<String>, body: Value) -> TestCase {
    TestCase::post(name, contract.calculate_path.clone())
        .json(body)
        .expect_status(200)
}

fn valid_calculation(contract: &EnvironmentContract) -> TestCase {
    let fields = &contract.response_fields;
    let mut case = calculation(
        contract,
        names::VALID_CALCULATION,
        contract.loan_body(&contract.valid_terms),
    )
    .greater_than(fields.monthly_payment.clone(), 0.0);

    if let Some(total) = &fields.total_cost {
        case = case.greater_than(total.clone(), 0.0);
    }
    case
}

fn fields_present(contract: &EnvironmentContract) -> TestCase {
    let fields = &contract.response_fields;
    let mut case = calculation(
        contract,
        names::FIELDS_PRESENT,
        contract.loan_body(&contract.valid_terms),
    )
    .exists(fields.monthly_payment.clone());

    for field in [&fields.total_cost, &fields.apr].into_iter().flatten() {
        case = case.exists(field.clone());
    }
    case
}

fn boundary_values(contract: &EnvironmentContract) -> Vec<TestCase> {
    let boundary = &contract.boundary;
    let fields = &contract.response_fields;

    boundary
        .terms
        .iter()
        .map(|terms| {
            let mut body = contract.loan_body(terms);
            if let Value::Object(map) = &mut body {
                for (key, value) in &boundary.extra_fields {
                    map.insert(key.clone(), value.clone());
                }
            }

            let name = format!(
                "{} ({} x {})",
                names::BOUNDARY_PREFIX,
                terms.amount,
                terms.period
            );
            let mut case = calculation(contract, name, body);
            if boundary.check_figures {
                case = case.greater_than(fields.monthly_payment.clone(), 0);
                if let Some(apr) = &fields.apr {
                    case = case.greater_than(apr.clone(), 0.0);
                }
            }
            case
        })
        .collect()
}

fn invalid_amount(contract: &EnvironmentContract) -> TestCase {
    let invalid = &contract.invalid_amount;
    let body = contract.loan_body(&LoanTerms::new(invalid.amount, invalid.period));

    let mut case = TestCase::post(names::INVALID_AMOUNT, contract.calculate_path.clone())
        .json(body)
        .expect_status(invalid.status);
    if let Some(message) = &invalid.error_message {
        case = case.equals("error", message.as_str());
    }
    case
}

fn invalid_route(contract: &EnvironmentContract) -> TestCase {
    let body = contract.loan_body(&LoanTerms::new(5000, 60));
    let case = TestCase::post(names::INVALID_ROUTE, INVALID_ROUTE)
        .json(body)
        .expect_status_in(StatusExpectation::exact(contract.invalid_route.status()));

    match &contract.invalid_route {
        InvalidRouteContract::Status { .. } => case,
        InvalidRouteContract::Fallback { contains, .. } => case.body_contains(contains.clone()),
    }
}

fn reference_calculation(contract: &EnvironmentContract) -> Option<TestCase> {
    let reference = contract.reference.as_ref()?;
    let fields = &contract.response_fields;

    let mut case = calculation(
        contract,
        names::REFERENCE_CALCULATION,
        contract.loan_body(&reference.terms),
    )
    .equals(fields.monthly_payment.clone(), reference.monthly_payment);
    if let Some(total) = &fields.total_cost {
        case = case.equals(total.clone(), reference.total_cost);
    }
    if let Some(apr) = &fields.apr {
        case = case.equals(apr.clone(), reference.apr);
    }
    Some(case)
}

fn deterministic(contract: &EnvironmentContract) -> TestCase {
    let fields = &contract.response_fields;
    let mut case = calculation(
        contract,
        names::DETERMINISTIC,
        contract.loan_body(&contract.valid_terms),
    )
    .assert(Assertion::IsJson)
    .stable(fields.monthly_payment.clone());
    if let Some(apr) = &fields.apr {
        case = case.stable(apr.clone());
    }
    case
}
