// src/openapi.rs

use crate::models::{
    AmountType, AssignEmployeesRequest, AssignSegmentsRequest, AssignedEmployee,
    AvailableVacationDays, CreateCatalogItemRequest, CreateLeaveRequest, CreateVacationRequest,
    Department, Employee, EmployeeDetail, EmployeeForm, EmployeeListItem, EmployeeSearchResult,
    EmployeeStatus, GeneratePayrollRequest, LeaveRequest, PayRule, PayRuleRequest,
    PayRuleResponse, PaySegment, PaySegmentRequest, PayrollLine, PayrollLineItem, PayrollRun,
    PayrollRunDetail, Position, RequestStatus, RuleKind, RuleTarget, SegmentEmployee,
    SetActiveRequest, SignedDocumentForm, SignedDocumentResponse, UpdateRequestStatus,
    VacationRequest,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Municipal HR API",
        version = "1.0.0",
        description = "Human resources back office for a municipality. Manages employees \
            and their documents, pay segments, bonuses and discounts with their targeting, \
            leave and vacation requests, and monthly payroll runs with a per-employee \
            breakdown of every applied rule.",
        license(name = "MIT")
    ),
    paths(
        // Catalogs
        crate::handlers::catalog::list_departments,
        crate::handlers::catalog::create_department,
        crate::handlers::catalog::list_positions,
        crate::handlers::catalog::create_position,
        // Pay segments
        crate::handlers::pay_segment::list_pay_segments,
        crate::handlers::pay_segment::create_pay_segment,
        crate::handlers::pay_segment::update_pay_segment,
        crate::handlers::pay_segment::delete_pay_segment,
        crate::handlers::pay_segment::list_segment_employees,
        // Employees
        crate::handlers::employee::list_employees,
        crate::handlers::employee::search_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::create_employee,
        crate::handlers::employee::update_employee,
        crate::handlers::employee::deactivate_employee,
        // Bonuses
        crate::handlers::bonus::list_bonuses,
        crate::handlers::bonus::create_bonus,
        crate::handlers::bonus::update_bonus,
        crate::handlers::bonus::set_bonus_active,
        crate::handlers::bonus::delete_bonus,
        crate::handlers::bonus::bonus_pay_segments,
        crate::handlers::bonus::assign_bonus_pay_segments,
        crate::handlers::bonus::bonus_employees,
        crate::handlers::bonus::assign_bonus_employees,
        // Discounts
        crate::handlers::discount::list_discounts,
        crate::handlers::discount::create_discount,
        crate::handlers::discount::update_discount,
        crate::handlers::discount::set_discount_active,
        crate::handlers::discount::delete_discount,
        crate::handlers::discount::discount_pay_segments,
        crate::handlers::discount::assign_discount_pay_segments,
        crate::handlers::discount::discount_employees,
        crate::handlers::discount::assign_discount_employees,
        // Leave
        crate::handlers::leave::list_leave_requests,
        crate::handlers::leave::create_leave_request,
        crate::handlers::leave::update_leave_status,
        crate::handlers::leave::upload_signed_document,
        // Vacations
        crate::handlers::vacation::list_vacation_requests,
        crate::handlers::vacation::create_vacation_request,
        crate::handlers::vacation::update_vacation_status,
        crate::handlers::vacation::available_days,
        // Payroll
        crate::handlers::payroll::generate_payroll_run,
        crate::handlers::payroll::list_payroll_runs,
        crate::handlers::payroll::get_payroll_run,
    ),
    components(
        schemas(
            Department, Position, CreateCatalogItemRequest,
            PaySegment, PaySegmentRequest, SegmentEmployee,
            Employee, EmployeeStatus, EmployeeDetail, EmployeeListItem, EmployeeSearchResult,
            EmployeeForm,
            RuleKind, AmountType, RuleTarget, PayRule, PayRuleResponse, PayRuleRequest,
            SetActiveRequest, AssignSegmentsRequest, AssignEmployeesRequest, AssignedEmployee,
            RequestStatus, UpdateRequestStatus,
            LeaveRequest, CreateLeaveRequest, SignedDocumentResponse, SignedDocumentForm,
            VacationRequest, CreateVacationRequest, AvailableVacationDays,
            GeneratePayrollRequest, PayrollRun, PayrollLine, PayrollLineItem, PayrollRunDetail,
        )
    ),
    tags(
        (name = "Catalogs", description = "Departments and job positions"),
        (name = "Pay Segments", description = "Budget groupings employees are paid under"),
        (name = "Employees", description = "Employee records, photos and DPI scans"),
        (name = "Bonuses", description = "Recurring bonuses and who receives them"),
        (name = "Discounts", description = "Recurring discounts and who they apply to"),
        (name = "Leave Requests", description = "Leave requests and signed documents"),
        (name = "Vacation Requests", description = "Vacation requests and remaining days"),
        (name = "Payroll", description = "Generate and review monthly payroll runs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/departments",
            "/api/v1/pay-segments/{segment_id}/employees",
            "/api/v1/employees/search",
            "/api/v1/bonuses/{rule_id}/active",
            "/api/v1/discounts/{rule_id}/pay-segments",
            "/api/v1/leave-requests/{leave_id}/signed-document",
            "/api/v1/vacation-requests/available-days",
            "/api/v1/payroll-runs/{run_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
