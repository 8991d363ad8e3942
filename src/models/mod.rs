// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ─── Departments & Positions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Position {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Body for creating a department or a position
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCatalogItemRequest {
    #[serde(default)]
    pub name: String,
}

// ─── Pay Segments (renglones) ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PaySegment {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// Number of active employees classified under this segment
    pub assigned_employees: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaySegmentRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SegmentEmployee {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub position: String,
    pub department: String,
    pub base_salary: Decimal,
    pub status: EmployeeStatus,
}

// ─── Employees ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "employee_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "activo" => Some(EmployeeStatus::Active),
            "inactive" | "inactivo" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub employee_code: String,
    pub first_names: String,
    pub last_names: String,
    /// National ID number
    pub dpi: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pay_segment_id: Uuid,
    pub department_id: Uuid,
    pub position_id: Uuid,
    pub status: EmployeeStatus,
    pub hire_date: Option<NaiveDate>,
    pub base_salary: Decimal,
    pub photo_path: Option<String>,
    pub dpi_scan_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An employee record plus public links to its uploaded files
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub photo_url: Option<String>,
    pub dpi_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EmployeeListItem {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub position: String,
    pub department: String,
    pub pay_segment_code: String,
    pub status: EmployeeStatus,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub base_salary: Decimal,
    #[serde(skip_serializing)]
    pub photo_path: Option<String>,
    #[serde(skip_serializing)]
    pub dpi_scan_path: Option<String>,
    #[sqlx(skip)]
    pub photo_url: Option<String>,
    #[sqlx(skip)]
    pub dpi_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EmployeeSearchResult {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub pay_segment_code: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring of the DPI, employee code or full name
    pub q: Option<String>,
}

/// Multipart form accepted by employee create/update.
/// Dates use `YYYY-MM-DD`; ids are UUIDs.
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub struct EmployeeForm {
    pub employee_code: String,
    pub first_names: String,
    pub last_names: String,
    pub dpi: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pay_segment_id: String,
    pub department_id: String,
    pub position_id: String,
    /// `active` or `inactive`
    pub status: Option<String>,
    pub hire_date: Option<String>,
    pub base_salary: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub dpi_scan: Option<Vec<u8>>,
}

// ─── Bonuses & Discounts ──────────────────────────────────────────────────────

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq, Hash)]
#[sqlx(type_name = "rule_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Bonus,
    Discount,
}

impl RuleKind {
    pub fn label(self) -> &'static str {
        match self {
            RuleKind::Bonus => "Bonus",
            RuleKind::Discount => "Discount",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "amount_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    /// Fixed quantity added or withheld
    Flat,
    /// Percentage of the employee's base salary
    Percentage,
}

/// Who a rule is aimed at, as shown to users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    All,
    PaySegment,
    Individual,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayRule {
    pub id: Uuid,
    pub kind: RuleKind,
    pub name: String,
    pub amount_type: AmountType,
    pub value: Decimal,
    pub description: Option<String>,
    pub applies_to_all: bool,
    pub applies_by_segment: bool,
    pub applies_individually: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayRule {
    /// Flags are independent columns; when several are set the first of
    /// all > pay segment > individual wins for display.
    pub fn target(&self) -> RuleTarget {
        if self.applies_to_all {
            RuleTarget::All
        } else if self.applies_by_segment {
            RuleTarget::PaySegment
        } else if self.applies_individually {
            RuleTarget::Individual
        } else {
            RuleTarget::None
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayRuleResponse {
    #[serde(flatten)]
    pub rule: PayRule,
    pub target: RuleTarget,
}

impl From<PayRule> for PayRuleResponse {
    fn from(rule: PayRule) -> Self {
        let target = rule.target();
        PayRuleResponse { rule, target }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayRuleRequest {
    #[serde(default)]
    pub name: String,
    pub amount_type: Option<AmountType>,
    pub value: Option<Decimal>,
    pub description: Option<String>,
    pub target: Option<RuleTarget>,
    /// Only honoured on update; new rules start active
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignSegmentsRequest {
    #[serde(default)]
    pub pay_segment_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignEmployeesRequest {
    #[serde(default)]
    pub employee_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignedEmployee {
    pub employee_id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub pay_segment_code: String,
}

// ─── Leave & Vacation Requests ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub dpi: String,
    pub employee_name: String,
    pub department: Option<String>,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub requested_on: NaiveDate,
    pub status: RequestStatus,
    pub signed_document: Option<String>,
    #[sqlx(skip)]
    pub signed_document_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    #[serde(default)]
    pub dpi: String,
    #[serde(default)]
    pub leave_type: String,
    pub start_date: Option<NaiveDate>,
    /// Defaults to `start_date`
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignedDocumentResponse {
    pub id: Uuid,
    pub signed_document: String,
    pub url: String,
}

/// Multipart form for the signed leave document
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub struct SignedDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct VacationRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub dpi: String,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub requested_on: NaiveDate,
    pub status: RequestStatus,
    #[serde(skip_serializing)]
    pub photo_path: Option<String>,
    #[sqlx(skip)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVacationRequest {
    #[serde(default)]
    pub dpi: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableDaysQuery {
    /// Calendar year, defaults to the current one
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AvailableVacationDays {
    pub employee_id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub days_taken: i64,
    #[sqlx(skip)]
    pub available_days: i64,
    #[serde(skip_serializing)]
    pub photo_path: Option<String>,
    #[sqlx(skip)]
    pub photo_url: Option<String>,
}

// ─── Payroll Runs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePayrollRequest {
    pub month: i32,
    pub year: i32,
    /// Restrict the run to one pay segment; omit for every active employee
    pub pay_segment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayrollRun {
    pub id: Uuid,
    pub month: i32,
    pub year: i32,
    pub pay_segment_id: Option<Uuid>,
    pub pay_segment_code: Option<String>,
    pub description: String,
    pub employee_count: i32,
    /// Sum of every line's net salary
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayrollLineItem {
    #[serde(skip)]
    pub payroll_line_id: Uuid,
    #[serde(skip_serializing)]
    pub kind: RuleKind,
    pub rule_id: Option<Uuid>,
    pub rule_name: String,
    pub amount_type: AmountType,
    pub rule_value: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayrollLine {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_code: String,
    pub employee_name: String,
    pub dpi: String,
    pub pay_segment_code: String,
    pub base_salary: Decimal,
    pub total_bonuses: Decimal,
    pub total_discounts: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    #[sqlx(skip)]
    pub bonuses: Vec<PayrollLineItem>,
    #[sqlx(skip)]
    pub discounts: Vec<PayrollLineItem>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollRunDetail {
    #[serde(flatten)]
    pub run: PayrollRun,
    pub lines: Vec<PayrollLine>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(all: bool, segment: bool, individual: bool) -> PayRule {
        PayRule {
            id: Uuid::new_v4(),
            kind: RuleKind::Bonus,
            name: "Bono 14".to_string(),
            amount_type: AmountType::Flat,
            value: dec!(250),
            description: None,
            applies_to_all: all,
            applies_by_segment: segment,
            applies_individually: individual,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn target_precedence_all_over_segment_over_individual() {
        assert_eq!(rule(true, true, true).target(), RuleTarget::All);
        assert_eq!(rule(false, true, true).target(), RuleTarget::PaySegment);
        assert_eq!(rule(false, false, true).target(), RuleTarget::Individual);
        assert_eq!(rule(false, false, false).target(), RuleTarget::None);
    }

    #[test]
    fn rule_response_flattens_rule_and_adds_target() {
        let response = PayRuleResponse::from(rule(false, true, false));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["target"], "pay_segment");
        assert_eq!(json["kind"], "bonus");
        assert_eq!(json["amount_type"], "flat");
        assert_eq!(json["name"], "Bono 14");
    }

    #[test]
    fn employee_status_accepts_both_spellings() {
        assert_eq!(EmployeeStatus::parse("ACTIVO"), Some(EmployeeStatus::Active));
        assert_eq!(EmployeeStatus::parse("inactive"), Some(EmployeeStatus::Inactive));
        assert_eq!(EmployeeStatus::parse("retired"), None);
    }
}
