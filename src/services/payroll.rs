// src/services/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        AmountType, GeneratePayrollRequest, PayrollLine, PayrollLineItem, PayrollRun,
        PayrollRunDetail, RuleKind,
    },
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

pub struct PayrollService;

/// Active rule together with the segments and employees it is assigned to.
#[derive(Debug, Clone)]
pub struct AssignedRule {
    pub id: Uuid,
    pub name: String,
    pub amount_type: AmountType,
    pub value: Decimal,
    pub applies_to_all: bool,
    pub active: bool,
    pub pay_segment_ids: HashSet<Uuid>,
    pub employee_ids: HashSet<Uuid>,
}

impl AssignedRule {
    /// Any of the three targeting paths is enough; the display flags for
    /// segment/individual are not consulted, only the assignment tables.
    pub fn matches(&self, employee_id: Uuid, pay_segment_id: Uuid) -> bool {
        self.active
            && (self.applies_to_all
                || self.pay_segment_ids.contains(&pay_segment_id)
                || self.employee_ids.contains(&employee_id))
    }
}

/// Employee row as seen by a payroll run
#[derive(Debug, Clone, FromRow)]
pub struct PayrollEmployee {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub dpi: String,
    pub pay_segment_id: Uuid,
    pub pay_segment_code: String,
    pub base_salary: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRule {
    pub rule_id: Uuid,
    pub name: String,
    pub amount_type: AmountType,
    pub value: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct RuleTotals {
    pub applied: Vec<AppliedRule>,
    pub total: Decimal,
}

pub struct CalculatedLine {
    pub employee: PayrollEmployee,
    pub total_bonuses: Decimal,
    pub total_discounts: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    pub bonuses: Vec<AppliedRule>,
    pub discounts: Vec<AppliedRule>,
}

pub struct CalculatedRun {
    pub lines: Vec<CalculatedLine>,
    pub total_amount: Decimal,
}

/// Two decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest value a `NUMERIC(12, 2)` column holds
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

/// Stored amounts keep exactly two decimals; finer or larger input is refused
/// instead of being rounded or overflowing in the database.
pub fn validate_amount(value: Decimal, field: &str) -> AppResult<()> {
    if value.normalize().scale() > 2 {
        return Err(AppError::Validation(format!(
            "{} must have at most 2 decimal places",
            field
        )));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "{} cannot exceed {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(())
}

impl PayrollService {
    /// Amount a single rule contributes for the given base salary
    pub fn contribution(amount_type: AmountType, value: Decimal, base_salary: Decimal) -> Decimal {
        match amount_type {
            AmountType::Flat => round2(value),
            AmountType::Percentage => round2(base_salary * value / dec!(100)),
        }
    }

    /// Resolve every matching rule for one employee. Each rule is visited
    /// once, so a rule reachable through several paths still counts once.
    pub fn resolve(
        rules: &[AssignedRule],
        employee_id: Uuid,
        pay_segment_id: Uuid,
        base_salary: Decimal,
    ) -> RuleTotals {
        let mut seen = HashSet::new();
        let mut totals = RuleTotals::default();

        for rule in rules {
            if !rule.matches(employee_id, pay_segment_id) || !seen.insert(rule.id) {
                continue;
            }
            let amount = Self::contribution(rule.amount_type, rule.value, base_salary);
            totals.total += amount;
            totals.applied.push(AppliedRule {
                rule_id: rule.id,
                name: rule.name.clone(),
                amount_type: rule.amount_type,
                value: rule.value,
                amount,
            });
        }

        totals.total = round2(totals.total);
        totals
    }

    /// Calculate one payroll line from the active bonus and discount rules
    pub fn calculate(
        employee: &PayrollEmployee,
        bonuses: &[AssignedRule],
        discounts: &[AssignedRule],
    ) -> CalculatedLine {
        let bonus_totals =
            Self::resolve(bonuses, employee.id, employee.pay_segment_id, employee.base_salary);
        let discount_totals =
            Self::resolve(discounts, employee.id, employee.pay_segment_id, employee.base_salary);

        let gross_salary = round2(employee.base_salary + bonus_totals.total);
        let net_salary = round2(gross_salary - discount_totals.total);

        CalculatedLine {
            employee: employee.clone(),
            total_bonuses: bonus_totals.total,
            total_discounts: discount_totals.total,
            gross_salary,
            net_salary,
            bonuses: bonus_totals.applied,
            discounts: discount_totals.applied,
        }
    }

    /// Calculate a whole run. An empty employee list is a caller error.
    pub fn calculate_run(
        employees: &[PayrollEmployee],
        bonuses: &[AssignedRule],
        discounts: &[AssignedRule],
    ) -> AppResult<CalculatedRun> {
        if employees.is_empty() {
            return Err(AppError::Validation(
                "There are no employees to generate the payroll run".to_string(),
            ));
        }

        let lines: Vec<CalculatedLine> = employees
            .iter()
            .map(|e| Self::calculate(e, bonuses, discounts))
            .collect();
        let total_amount = round2(lines.iter().map(|l| l.net_salary).sum());

        Ok(CalculatedRun {
            lines,
            total_amount,
        })
    }
}

pub fn validate_period(month: i32, year: i32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("Month must be between 1 and 12".to_string()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(AppError::Validation("Year must be between 2000 and 2100".to_string()));
    }
    Ok(())
}

pub fn run_description(month: i32, year: i32, pay_segment_code: Option<&str>) -> String {
    match pay_segment_code {
        Some(code) => format!("Payroll for pay segment {} {}/{}", code, month, year),
        None => format!("General payroll {}/{}", month, year),
    }
}

// ─── Persistence ──────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct RuleRow {
    id: Uuid,
    name: String,
    amount_type: AmountType,
    value: Decimal,
    applies_to_all: bool,
}

#[derive(FromRow)]
struct AssignmentRow {
    rule_id: Uuid,
    target_id: Uuid,
}

/// Load active rules of one kind with their assignment sets
pub async fn load_rules(conn: &mut PgConnection, kind: RuleKind) -> AppResult<Vec<AssignedRule>> {
    let rows = sqlx::query_as::<_, RuleRow>(
        r#"SELECT id, name, amount_type, value, applies_to_all
           FROM pay_rules
           WHERE kind = $1 AND active = true
           ORDER BY name"#,
    )
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;

    let segment_rows = sqlx::query_as::<_, AssignmentRow>(
        r#"SELECT rs.rule_id, rs.pay_segment_id AS target_id
           FROM pay_rule_segments rs
           JOIN pay_rules r ON r.id = rs.rule_id
           WHERE r.kind = $1 AND r.active = true"#,
    )
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;

    let employee_rows = sqlx::query_as::<_, AssignmentRow>(
        r#"SELECT re.rule_id, re.employee_id AS target_id
           FROM pay_rule_employees re
           JOIN pay_rules r ON r.id = re.rule_id
           WHERE r.kind = $1 AND r.active = true"#,
    )
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;

    let mut segments: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for row in segment_rows {
        segments.entry(row.rule_id).or_default().insert(row.target_id);
    }
    let mut employees: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for row in employee_rows {
        employees.entry(row.rule_id).or_default().insert(row.target_id);
    }

    Ok(rows
        .into_iter()
        .map(|r| AssignedRule {
            pay_segment_ids: segments.remove(&r.id).unwrap_or_default(),
            employee_ids: employees.remove(&r.id).unwrap_or_default(),
            id: r.id,
            name: r.name,
            amount_type: r.amount_type,
            value: r.value,
            applies_to_all: r.applies_to_all,
            active: true,
        })
        .collect())
}

/// Compute and persist a payroll run. The header, lines and breakdown items
/// are written in one transaction.
pub async fn generate_run(db: &PgPool, request: &GeneratePayrollRequest) -> AppResult<PayrollRunDetail> {
    validate_period(request.month, request.year)?;

    let mut tx = db.begin().await?;

    let segment_code = match request.pay_segment_id {
        Some(segment_id) => Some(
            sqlx::query_scalar::<_, String>("SELECT code FROM pay_segments WHERE id = $1")
                .bind(segment_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Pay segment {} not found", segment_id)))?,
        ),
        None => None,
    };

    let employees = sqlx::query_as::<_, PayrollEmployee>(
        r#"SELECT e.id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, e.pay_segment_id, s.code AS pay_segment_code, e.base_salary
           FROM employees e
           JOIN pay_segments s ON s.id = e.pay_segment_id
           WHERE e.status = 'active'
             AND ($1::uuid IS NULL OR e.pay_segment_id = $1)
           ORDER BY e.employee_code"#,
    )
    .bind(request.pay_segment_id)
    .fetch_all(&mut *tx)
    .await?;

    let bonuses = load_rules(&mut tx, RuleKind::Bonus).await?;
    let discounts = load_rules(&mut tx, RuleKind::Discount).await?;
    debug!(
        employees = employees.len(),
        bonuses = bonuses.len(),
        discounts = discounts.len(),
        "calculating payroll"
    );

    let calculated = PayrollService::calculate_run(&employees, &bonuses, &discounts)?;
    let description = run_description(request.month, request.year, segment_code.as_deref());

    let run = sqlx::query_as::<_, PayrollRun>(
        r#"INSERT INTO payroll_runs (
            id, month, year, pay_segment_id, pay_segment_code,
            description, employee_count, total_amount, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(request.month)
    .bind(request.year)
    .bind(request.pay_segment_id)
    .bind(segment_code.as_deref())
    .bind(&description)
    .bind(calculated.lines.len() as i32)
    .bind(calculated.total_amount)
    .fetch_one(&mut *tx)
    .await?;

    let mut lines = Vec::with_capacity(calculated.lines.len());
    for line in &calculated.lines {
        lines.push(save_line(&mut tx, run.id, line).await?);
    }

    tx.commit().await?;

    info!(
        "Payroll run {} generated: {} employees, total {}",
        run.id, run.employee_count, run.total_amount
    );

    Ok(PayrollRunDetail { run, lines })
}

async fn save_line(
    conn: &mut PgConnection,
    payroll_run_id: Uuid,
    line: &CalculatedLine,
) -> AppResult<PayrollLine> {
    let mut saved = sqlx::query_as::<_, PayrollLine>(
        r#"INSERT INTO payroll_lines (
            id, payroll_run_id, employee_id, employee_code, employee_name, dpi,
            pay_segment_code, base_salary, total_bonuses, total_discounts,
            gross_salary, net_salary
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
        RETURNING id, employee_id, employee_code, employee_name, dpi, pay_segment_code,
                  base_salary, total_bonuses, total_discounts, gross_salary, net_salary"#,
    )
    .bind(Uuid::new_v4())
    .bind(payroll_run_id)
    .bind(line.employee.id)
    .bind(&line.employee.employee_code)
    .bind(&line.employee.full_name)
    .bind(&line.employee.dpi)
    .bind(&line.employee.pay_segment_code)
    .bind(line.employee.base_salary)
    .bind(line.total_bonuses)
    .bind(line.total_discounts)
    .bind(line.gross_salary)
    .bind(line.net_salary)
    .fetch_one(&mut *conn)
    .await?;

    for (kind, applied) in [
        (RuleKind::Bonus, &line.bonuses),
        (RuleKind::Discount, &line.discounts),
    ] {
        for rule in applied {
            let item = sqlx::query_as::<_, PayrollLineItem>(
                r#"INSERT INTO payroll_line_items (
                    id, payroll_line_id, rule_id, kind, rule_name,
                    amount_type, rule_value, amount
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
                RETURNING payroll_line_id, kind, rule_id, rule_name,
                          amount_type, rule_value, amount"#,
            )
            .bind(Uuid::new_v4())
            .bind(saved.id)
            .bind(rule.rule_id)
            .bind(kind)
            .bind(&rule.name)
            .bind(rule.amount_type)
            .bind(rule.value)
            .bind(rule.amount)
            .fetch_one(&mut *conn)
            .await?;

            match kind {
                RuleKind::Bonus => saved.bonuses.push(item),
                RuleKind::Discount => saved.discounts.push(item),
            }
        }
    }

    Ok(saved)
}

/// Header, lines and breakdown of a stored run
pub async fn fetch_run_detail(db: &PgPool, run_id: Uuid) -> AppResult<PayrollRunDetail> {
    let run = sqlx::query_as::<_, PayrollRun>("SELECT * FROM payroll_runs WHERE id = $1")
        .bind(run_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll run {} not found", run_id)))?;

    let mut lines = sqlx::query_as::<_, PayrollLine>(
        r#"SELECT id, employee_id, employee_code, employee_name, dpi, pay_segment_code,
                  base_salary, total_bonuses, total_discounts, gross_salary, net_salary
           FROM payroll_lines
           WHERE payroll_run_id = $1
           ORDER BY employee_code"#,
    )
    .bind(run_id)
    .fetch_all(db)
    .await?;

    let items = sqlx::query_as::<_, PayrollLineItem>(
        r#"SELECT i.payroll_line_id, i.kind, i.rule_id, i.rule_name,
                  i.amount_type, i.rule_value, i.amount
           FROM payroll_line_items i
           JOIN payroll_lines l ON l.id = i.payroll_line_id
           WHERE l.payroll_run_id = $1
           ORDER BY i.rule_name"#,
    )
    .bind(run_id)
    .fetch_all(db)
    .await?;

    attach_items(&mut lines, items);

    Ok(PayrollRunDetail { run, lines })
}

fn attach_items(lines: &mut [PayrollLine], items: Vec<PayrollLineItem>) {
    let index: HashMap<Uuid, usize> = lines.iter().enumerate().map(|(i, l)| (l.id, i)).collect();
    for item in items {
        let Some(&pos) = index.get(&item.payroll_line_id) else {
            continue;
        };
        match item.kind {
            RuleKind::Bonus => lines[pos].bonuses.push(item),
            RuleKind::Discount => lines[pos].discounts.push(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(base_salary: Decimal, pay_segment_id: Uuid) -> PayrollEmployee {
        PayrollEmployee {
            id: Uuid::new_v4(),
            employee_code: "EMP-001".to_string(),
            full_name: "Ana López".to_string(),
            dpi: "2456789010101".to_string(),
            pay_segment_id,
            pay_segment_code: "011".to_string(),
            base_salary,
        }
    }

    fn rule(name: &str, amount_type: AmountType, value: Decimal) -> AssignedRule {
        AssignedRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            amount_type,
            value,
            applies_to_all: false,
            active: true,
            pay_segment_ids: HashSet::new(),
            employee_ids: HashSet::new(),
        }
    }

    fn for_all(mut r: AssignedRule) -> AssignedRule {
        r.applies_to_all = true;
        r
    }

    #[test]
    fn amounts_must_fit_the_stored_precision() {
        assert!(validate_amount(dec!(4.83), "Value").is_ok());
        assert!(validate_amount(dec!(4.500), "Value").is_ok());
        assert!(validate_amount(MAX_AMOUNT, "Value").is_ok());
        assert!(matches!(
            validate_amount(dec!(4.835), "Value"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_amount(dec!(100000000000), "Value"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn flat_contribution_is_rounded_value() {
        let amount = PayrollService::contribution(AmountType::Flat, dec!(250.005), dec!(3000));
        assert_eq!(amount, dec!(250.01));
    }

    #[test]
    fn percentage_contribution_uses_base_salary() {
        // 3333.33 * 4.83 / 100 = 160.999839
        let amount =
            PayrollService::contribution(AmountType::Percentage, dec!(4.83), dec!(3333.33));
        assert_eq!(amount, dec!(161.00));

        let amount = PayrollService::contribution(AmountType::Percentage, dec!(10), dec!(4500));
        assert_eq!(amount, dec!(450.00));
    }

    #[test]
    fn every_contribution_rounded_before_summing() {
        let segment = Uuid::new_v4();
        let emp = employee(dec!(1000.50), segment);
        // each 0.5% of 1000.50 = 5.0025 -> 5.00; summed unrounded would give 10.01
        let rules = vec![
            for_all(rule("A", AmountType::Percentage, dec!(0.5))),
            for_all(rule("B", AmountType::Percentage, dec!(0.5))),
        ];
        let totals = PayrollService::resolve(&rules, emp.id, segment, emp.base_salary);
        assert_eq!(totals.total, dec!(10.00));
        assert!(totals.applied.iter().all(|a| a.amount == dec!(5.00)));
    }

    #[test]
    fn applies_to_all_rule_reaches_every_employee_once() {
        let segment_a = Uuid::new_v4();
        let segment_b = Uuid::new_v4();
        let bono = for_all(rule("Bono incentivo", AmountType::Flat, dec!(250)));
        let bonuses = vec![bono.clone()];

        for emp in [employee(dec!(3000), segment_a), employee(dec!(5200), segment_b)] {
            let line = PayrollService::calculate(&emp, &bonuses, &[]);
            let hits = line.bonuses.iter().filter(|b| b.rule_id == bono.id).count();
            assert_eq!(hits, 1);
            assert_eq!(line.total_bonuses, dec!(250));
        }
    }

    #[test]
    fn rule_matched_on_several_paths_counts_once() {
        let segment = Uuid::new_v4();
        let emp = employee(dec!(4000), segment);
        let mut r = rule("Riesgo", AmountType::Flat, dec!(100));
        r.pay_segment_ids.insert(segment);
        r.employee_ids.insert(emp.id);
        r.applies_to_all = true;

        // the same rule listed twice, as a join producing duplicate rows would
        let rules = vec![r.clone(), r];
        let totals = PayrollService::resolve(&rules, emp.id, segment, emp.base_salary);
        assert_eq!(totals.applied.len(), 1);
        assert_eq!(totals.total, dec!(100));
    }

    #[test]
    fn segment_and_individual_assignments_match() {
        let segment = Uuid::new_v4();
        let emp = employee(dec!(2000), segment);
        let other = employee(dec!(2000), Uuid::new_v4());

        let mut by_segment = rule("Segmento", AmountType::Flat, dec!(50));
        by_segment.pay_segment_ids.insert(segment);
        let mut individual = rule("Individual", AmountType::Flat, dec!(75));
        individual.employee_ids.insert(emp.id);
        let rules = vec![by_segment, individual];

        let mine = PayrollService::resolve(&rules, emp.id, segment, emp.base_salary);
        assert_eq!(mine.total, dec!(125));

        let theirs =
            PayrollService::resolve(&rules, other.id, other.pay_segment_id, other.base_salary);
        assert_eq!(theirs.total, Decimal::ZERO);
        assert!(theirs.applied.is_empty());
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let segment = Uuid::new_v4();
        let emp = employee(dec!(2000), segment);
        let mut r = for_all(rule("Suspendido", AmountType::Flat, dec!(500)));
        r.active = false;

        let totals = PayrollService::resolve(&[r], emp.id, segment, emp.base_salary);
        assert!(totals.applied.is_empty());
    }

    #[test]
    fn gross_and_net_follow_totals() {
        let segment = Uuid::new_v4();
        let emp = employee(dec!(3500.00), segment);
        let bonuses = vec![
            for_all(rule("Bono 14", AmountType::Flat, dec!(250))),
            for_all(rule("Antigüedad", AmountType::Percentage, dec!(5))),
        ];
        let discounts = vec![
            for_all(rule("IGSS", AmountType::Percentage, dec!(4.83))),
            for_all(rule("Sindicato", AmountType::Flat, dec!(25))),
        ];

        let line = PayrollService::calculate(&emp, &bonuses, &discounts);
        assert_eq!(line.total_bonuses, dec!(425.00));
        assert_eq!(line.gross_salary, dec!(3925.00));
        // 3500 * 4.83% = 169.05
        assert_eq!(line.total_discounts, dec!(194.05));
        assert_eq!(line.net_salary, dec!(3730.95));
        assert_eq!(line.gross_salary, line.employee.base_salary + line.total_bonuses);
        assert_eq!(line.net_salary, line.gross_salary - line.total_discounts);
    }

    #[test]
    fn employee_without_rules_gets_zero_totals() {
        let emp = employee(dec!(2800), Uuid::new_v4());
        let line = PayrollService::calculate(&emp, &[], &[]);
        assert_eq!(line.total_bonuses, Decimal::ZERO);
        assert_eq!(line.total_discounts, Decimal::ZERO);
        assert_eq!(line.gross_salary, dec!(2800));
        assert_eq!(line.net_salary, dec!(2800));
    }

    #[test]
    fn empty_run_is_rejected() {
        let result = PayrollService::calculate_run(&[], &[], &[]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn run_total_is_sum_of_net_salaries() {
        let segment = Uuid::new_v4();
        let employees = vec![employee(dec!(3000), segment), employee(dec!(4100.55), segment)];
        let discounts = vec![for_all(rule("IGSS", AmountType::Percentage, dec!(4.83)))];

        let run = PayrollService::calculate_run(&employees, &[], &discounts).unwrap();
        // 3000 - 144.90 + 4100.55 - 198.06
        assert_eq!(run.total_amount, dec!(6757.59));
        assert_eq!(run.lines.len(), 2);
    }

    #[test]
    fn period_validation() {
        assert!(validate_period(1, 2025).is_ok());
        assert!(validate_period(12, 2100).is_ok());
        assert!(matches!(validate_period(0, 2025), Err(AppError::Validation(_))));
        assert!(matches!(validate_period(13, 2025), Err(AppError::Validation(_))));
        assert!(matches!(validate_period(6, 1999), Err(AppError::Validation(_))));
    }

    #[test]
    fn description_names_segment_when_present() {
        assert_eq!(run_description(3, 2026, None), "General payroll 3/2026");
        assert_eq!(
            run_description(11, 2025, Some("029")),
            "Payroll for pay segment 029 11/2025"
        );
    }

    #[test]
    fn breakdown_items_attach_to_their_line() {
        let line = |id: Uuid| PayrollLine {
            id,
            employee_id: Uuid::new_v4(),
            employee_code: "E1".to_string(),
            employee_name: "Luis Pérez".to_string(),
            dpi: "1".to_string(),
            pay_segment_code: "011".to_string(),
            base_salary: dec!(1000),
            total_bonuses: dec!(0),
            total_discounts: dec!(0),
            gross_salary: dec!(1000),
            net_salary: dec!(1000),
            bonuses: vec![],
            discounts: vec![],
        };
        let item = |line_id: Uuid, kind: RuleKind| PayrollLineItem {
            payroll_line_id: line_id,
            kind,
            rule_id: None,
            rule_name: "x".to_string(),
            amount_type: AmountType::Flat,
            rule_value: dec!(1),
            amount: dec!(1),
        };

        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut lines = vec![line(a), line(b)];
        attach_items(
            &mut lines,
            vec![
                item(a, RuleKind::Bonus),
                item(b, RuleKind::Discount),
                item(b, RuleKind::Bonus),
                item(Uuid::new_v4(), RuleKind::Bonus),
            ],
        );

        assert_eq!(lines[0].bonuses.len(), 1);
        assert!(lines[0].discounts.is_empty());
        assert_eq!(lines[1].bonuses.len(), 1);
        assert_eq!(lines[1].discounts.len(), 1);
        assert_eq!(lines[1].discounts[0].kind, RuleKind::Discount);
    }
}
