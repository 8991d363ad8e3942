pub mod bonus;
pub mod catalog;
pub mod discount;
pub mod employee;
pub mod general;
pub mod leave;
pub mod pay_rule;
pub mod pay_segment;
pub mod payroll;
pub mod vacation;
