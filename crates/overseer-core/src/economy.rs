//! Money, research and incident reports.
//!
//! Income is earned every tick. Reports accrue only while the model is
//! serving (no reload or retrain running) and each report costs money.
//! Money never drops below zero through report penalties.

use crate::config::{EconomyConfig, ReportConfig};
use crate::error::Rejection;

/// Income earned during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Income {
    /// Money earned.
    pub money: f64,
    /// Research points earned.
    pub research: f64,
}

/// Reports filed during one tick and what they cost.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportAccrual {
    /// Reports per second used for this tick.
    pub rate: f64,
    /// Reports added.
    pub filed: f64,
    /// Money actually removed (limited by the money available).
    pub money_lost: f64,
}

/// Resource counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    money: f64,
    research: f64,
    reports: f64,
    income: EconomyConfig,
    report: ReportConfig,
}

impl Economy {
    /// Start with the configured balances.
    pub fn new(income: &EconomyConfig, report: &ReportConfig) -> Self {
        Self {
            money: income.initial_money,
            research: income.initial_research,
            reports: report.initial,
            income: income.clone(),
            report: report.clone(),
        }
    }

    /// Earn income for `time_delta` seconds.
    ///
    /// `money_multiplier` is the user-base fraction while serving, or the
    /// shutdown multiplier while shut down. Research always accrues at the
    /// full rate.
    pub fn accrue_income(&mut self, time_delta: f64, money_multiplier: f64) -> Income {
        let income = Income {
            money: self.income.money_per_second * time_delta * money_multiplier,
            research: self.income.research_per_second * time_delta,
        };
        self.money += income.money;
        self.research += income.research;
        income
    }

    /// Reports per second for the given AI risk and alignment.
    pub fn report_rate(&self, risk: f64, alignment: f64) -> f64 {
        (self.report.base_rate * (1.0 + 10.0 * risk) * (1.0 + 5.0 * (1.0 - alignment)))
            .min(self.report.max_rate)
    }

    /// File reports for `time_delta` seconds and charge the penalty.
    pub fn accrue_reports(&mut self, time_delta: f64, risk: f64, alignment: f64) -> ReportAccrual {
        let rate = self.report_rate(risk, alignment);
        let filed = rate * time_delta;
        let before = self.money;
        self.reports += filed;
        self.money = (self.money - filed * self.report.money_loss_per_report).max(0.0);
        ReportAccrual {
            rate,
            filed,
            money_lost: before - self.money,
        }
    }

    /// Deduct both costs, or neither if either balance falls short.
    pub fn charge(&mut self, money: f64, research: f64) -> Result<(), Rejection> {
        if self.money < money {
            return Err(Rejection::InsufficientFunds {
                required: money,
                available: self.money,
            });
        }
        if self.research < research {
            return Err(Rejection::InsufficientResearch {
                required: research,
                available: self.research,
            });
        }
        self.money -= money;
        self.research -= research;
        Ok(())
    }

    /// Available money.
    pub const fn money(&self) -> f64 {
        self.money
    }

    /// Available research points.
    pub const fn research(&self) -> f64 {
        self.research
    }

    /// Accumulated reports.
    pub const fn reports(&self) -> f64 {
        self.reports
    }

    /// Report volume dashboards treat as critical.
    pub const fn report_threshold(&self) -> f64 {
        self.report.threshold
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn economy() -> Economy {
        Economy::new(&EconomyConfig::default(), &ReportConfig::default())
    }

    #[test]
    fn income_scales_money_but_not_research() {
        let mut economy = economy();
        let income = economy.accrue_income(2.0, 0.5);
        assert_eq!(income.money, 20.0);
        assert_eq!(income.research, 4.0);
        assert_eq!(economy.money(), 1020.0);
        assert_eq!(economy.research(), 4.0);
    }

    #[test]
    fn shutdown_multiplier_stops_money() {
        let mut economy = economy();
        let income = economy.accrue_income(10.0, 0.0);
        assert_eq!(income.money, 0.0);
        assert_eq!(economy.research(), 20.0);
    }

    #[test]
    fn report_rate_grows_with_risk_and_misalignment() {
        let economy = economy();
        // 0.5 * (1 + 3) * (1 + 0)
        assert!((economy.report_rate(0.3, 1.0) - 2.0).abs() < EPS);
        // 0.5 * (1 + 5) * (1 + 2.5)
        assert!((economy.report_rate(0.5, 0.5) - 10.5).abs() < EPS);
        assert_eq!(economy.report_rate(5.0, 0.0), 20.0);
    }

    #[test]
    fn reports_cost_money() {
        let mut economy = economy();
        let accrual = economy.accrue_reports(1.0, 0.3, 1.0);
        assert!((accrual.filed - 2.0).abs() < EPS);
        assert!((accrual.money_lost - 10.0).abs() < EPS);
        assert!((economy.money() - 990.0).abs() < EPS);
        assert!((economy.reports() - 2.0).abs() < EPS);
    }

    #[test]
    fn report_penalty_floors_money_at_zero() {
        let mut economy = economy();
        let accrual = economy.accrue_reports(100.0, 1.0, 0.0);
        assert_eq!(economy.money(), 0.0);
        assert_eq!(accrual.money_lost, 1000.0);
    }

    #[test]
    fn charge_is_all_or_nothing() {
        let mut economy = economy();
        let result = economy.charge(100.0, 1.0);
        assert!(matches!(result, Err(Rejection::InsufficientResearch { .. })));
        assert_eq!(economy.money(), 1000.0);

        let result = economy.charge(5000.0, 0.0);
        assert!(matches!(result, Err(Rejection::InsufficientFunds { .. })));

        assert!(economy.charge(400.0, 0.0).is_ok());
        assert_eq!(economy.money(), 600.0);
    }
}
