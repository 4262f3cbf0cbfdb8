//! Per-deployment contract of the loan-calculation service.
//!
//! The deployments agree on intent but not on details: field names, the
//! calculation path, the status returned for an invalid amount and the way
//! unknown routes are answered all differ. An [`EnvironmentContract`]
//! captures those details so a single scenario set can run everywhere.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use super::Environment;
use crate::error::{DomainError, DomainResult};
use crate::request::Headers;

/// Marker text of the single-page-app shell served for unknown routes.
pub const JS_DISABLED_FALLBACK: &str =
    "We're sorry but application doesn't work properly without JavaScript enabled";

/// Names of the request fields carrying the loan terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    /// Principal field (`loanAmount` or `amount`).
    pub amount: String,
    /// Period in months (`loanPeriod` or `maturity`).
    pub period: String,
}

/// Names of the calculated fields in a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFields {
    /// Monthly installment.
    pub monthly_payment: String,
    /// Total cost or total repayable amount, when the deployment returns one.
    #[serde(default)]
    pub total_cost: Option<String>,
    /// Annual percentage rate of charge, when the deployment returns one.
    #[serde(default)]
    pub apr: Option<String>,
}

/// Amount and period of one loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Principal; may be negative to probe validation.
    pub amount: Number,
    /// Period in months.
    pub period: u32,
}

impl LoanTerms {
    /// Creates loan terms from whole-unit amounts.
    #[must_use]
    pub fn new(amount: i64, period: u32) -> Self {
        Self {
            amount: Number::from(amount),
            period,
        }
    }
}

/// How a deployment rejects a negative amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidAmountContract {
    /// Amount sent (negative).
    pub amount: i64,
    /// Period sent alongside it.
    pub period: u32,
    /// Status the deployment answers with.
    pub status: u16,
    /// Error message expected in the `error` field, if the deployment sends one.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// How a deployment answers a request to a route it does not serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidRouteContract {
    /// Plain error status.
    Status {
        /// Expected status (usually 404).
        status: u16,
    },
    /// A fallback page with a success status.
    Fallback {
        /// Expected status (usually 200).
        status: u16,
        /// Text the fallback page always contains.
        contains: String,
    },
}

impl InvalidRouteContract {
    /// Status expected for an unknown route.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Status { status } | Self::Fallback { status, .. } => *status,
        }
    }
}

/// A request whose calculated figures are known exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCalculation {
    /// Loan terms of the request; merged with the contract's base fields.
    pub terms: LoanTerms,
    /// Expected monthly payment.
    pub monthly_payment: f64,
    /// Expected total cost / total repayable amount.
    pub total_cost: f64,
    /// Expected APR.
    pub apr: f64,
}

/// Boundary-value requests of a deployment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryContract {
    /// Loan terms to probe.
    #[serde(default)]
    pub terms: Vec<LoanTerms>,
    /// Extra fields sent only with boundary requests.
    #[serde(default)]
    pub extra_fields: Map<String, Value>,
    /// Whether the calculated figures must be positive, or only the status checked.
    #[serde(default)]
    pub check_figures: bool,
}

/// Everything that differs between deployments of the calculation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentContract {
    /// Environment name.
    pub name: String,
    /// Base URI; `None` when it must come from configuration.
    #[serde(default)]
    pub base_uri: Option<String>,
    /// Headers sent with every request.
    #[serde(default)]
    pub default_headers: Headers,
    /// Path of the calculation endpoint.
    pub calculate_path: String,
    /// Request field names.
    pub request_fields: RequestFields,
    /// Response field names.
    pub response_fields: ResponseFields,
    /// Fields sent with every loan request besides amount and period.
    #[serde(default)]
    pub base_fields: Map<String, Value>,
    /// Terms of the plain valid-calculation request.
    pub valid_terms: LoanTerms,
    /// Boundary-value requests.
    #[serde(default)]
    pub boundary: BoundaryContract,
    /// Negative-amount behaviour.
    pub invalid_amount: InvalidAmountContract,
    /// Unknown-route behaviour.
    pub invalid_route: InvalidRouteContract,
    /// Exact figures for a known request, if any.
    #[serde(default)]
    pub reference: Option<ReferenceCalculation>,
}

impl EnvironmentContract {
    /// Lithuanian staging deployment of the loan application.
    #[must_use]
    pub fn lt_staging() -> Self {
        let mut extra_fields = Map::new();
        extra_fields.insert("maturity".into(), json!(60));
        extra_fields.insert("productType".into(), json!("consumerLoan"));
        extra_fields.insert("amount".into(), json!(1000));
        extra_fields.insert("monthlyPaymentDay".into(), json!(10));
        extra_fields.insert("interestRate".into(), json!(5.0));
        extra_fields.insert("conclusionFee".into(), json!(100));
        extra_fields.insert("administrationFee".into(), json!(50));

        Self {
            name: "lt-staging".into(),
            base_uri: Some("https://web-loan-application-staging.bigbank.lt".into()),
            default_headers: Headers::new(),
            calculate_path: "/api/v1/loan/calculate".into(),
            request_fields: RequestFields {
                amount: "loanAmount".into(),
                period: "loanPeriod".into(),
            },
            response_fields: ResponseFields {
                monthly_payment: "monthlyPayment".into(),
                total_cost: Some("totalCost".into()),
                apr: None,
            },
            base_fields: Map::new(),
            valid_terms: LoanTerms::new(1000, 6),
            boundary: BoundaryContract {
                terms: vec![LoanTerms::new(1000, 6)],
                extra_fields,
                check_figures: false,
            },
            invalid_amount: InvalidAmountContract {
                amount: -5000,
                period: 60,
                status: 400,
                error_message: None,
            },
            invalid_route: InvalidRouteContract::Status { status: 404 },
            reference: None,
        }
    }

    /// Estonian small-loan calculator.
    ///
    /// Its host is not fixed; supply it through configuration.
    #[must_use]
    pub fn ee_calculator() -> Self {
        let mut base_fields = Map::new();
        base_fields.insert("currency".into(), json!("EUR"));
        base_fields.insert("productType".into(), json!("SMALL_LOAN_EE01"));
        base_fields.insert("administrationFee".into(), json!(3.49));
        base_fields.insert("conclusionFee".into(), json!(100));
        base_fields.insert("interestRate".into(), json!(16.8));
        base_fields.insert("monthlyPaymentDay".into(), json!(15));

        Self {
            name: "ee-calculator".into(),
            base_uri: None,
            default_headers: Headers::new(),
            calculate_path: "/calculate".into(),
            request_fields: RequestFields {
                amount: "amount".into(),
                period: "maturity".into(),
            },
            response_fields: ResponseFields {
                monthly_payment: "monthlyPayment".into(),
                total_cost: Some("totalRepayableAmount".into()),
                apr: Some("apr".into()),
            },
            base_fields,
            valid_terms: LoanTerms::new(5000, 54),
            boundary: BoundaryContract::default(),
            invalid_amount: InvalidAmountContract {
                amount: -5000,
                period: 54,
                status: 500,
                error_message: None,
            },
            invalid_route: InvalidRouteContract::Fallback {
                status: 200,
                contains: JS_DISABLED_FALLBACK.into(),
            },
            reference: Some(ReferenceCalculation {
                terms: LoanTerms::new(5000, 54),
                monthly_payment: 136.79,
                total_cost: 7386.17,
                apr: 21.19,
            }),
        }
    }

    /// Public API deployment.
    #[must_use]
    pub fn api() -> Self {
        Self {
            name: "api".into(),
            base_uri: Some("https://api.bigbank.com".into()),
            default_headers: Headers::new(),
            calculate_path: "/calculate".into(),
            request_fields: RequestFields {
                amount: "loanAmount".into(),
                period: "loanPeriod".into(),
            },
            response_fields: ResponseFields {
                monthly_payment: "monthlyPayment".into(),
                total_cost: None,
                apr: Some("APRC".into()),
            },
            base_fields: Map::new(),
            valid_terms: LoanTerms::new(5000, 60),
            boundary: BoundaryContract {
                terms: vec![LoanTerms::new(1000, 6), LoanTerms::new(30000, 120)],
                extra_fields: Map::new(),
                check_figures: true,
            },
            invalid_amount: InvalidAmountContract {
                amount: -1000,
                period: 60,
                status: 400,
                error_message: Some("Invalid loan amount".into()),
            },
            invalid_route: InvalidRouteContract::Status { status: 404 },
            reference: None,
        }
    }

    /// All built-in contracts.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::lt_staging(), Self::ee_calculator(), Self::api()]
    }

    /// Looks up a built-in contract by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEnvironment` if no contract has this name.
    pub fn builtin_named(name: &str) -> DomainResult<Self> {
        Self::builtin()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DomainError::UnknownEnvironment(name.to_string()))
    }

    /// Builds the JSON body of a loan request for the given terms.
    ///
    /// Base fields come first; amount and period always win over a base
    /// field of the same name.
    #[must_use]
    pub fn loan_body(&self, terms: &LoanTerms) -> Value {
        let mut body = self.base_fields.clone();
        body.insert(
            self.request_fields.amount.clone(),
            Value::Number(terms.amount.clone()),
        );
        body.insert(self.request_fields.period.clone(), json!(terms.period));
        Value::Object(body)
    }

    /// Builds the environment to run against.
    ///
    /// `base_uri_override` replaces the contract's own base URI.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingBaseUri` if neither is set and
    /// `DomainError::InvalidUrl` if the chosen one is malformed.
    pub fn environment(&self, base_uri_override: Option<&str>) -> DomainResult<Environment> {
        let base_uri = base_uri_override
            .or(self.base_uri.as_deref())
            .ok_or_else(|| DomainError::MissingBaseUri(self.name.clone()))?;

        let mut environment = Environment::new(self.name.clone(), base_uri)?;
        environment.default_headers = self.default_headers.clone();
        Ok(environment)
    }
}
