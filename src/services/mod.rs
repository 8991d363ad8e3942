pub mod payroll;
pub mod uploads;
