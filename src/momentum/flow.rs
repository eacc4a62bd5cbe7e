//! Intraday volume pressure
//!
//! Open-to-close variants of net volume flow: `volume * (close - open) / open`
//! per day, summed over a window or bucketed by calendar month. A
//! non-positive open counts as a flat day.

use crate::market::{DailyBar, Lookback, Series};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Open-to-close return; zero when `open <= 0`
pub fn intraday_return(open: Decimal, close: Decimal) -> Decimal {
    if open <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (close - open) / open
}

/// Net shares of buying (positive) or selling (negative) pressure for a day
pub fn daily_net_volume(bar: &DailyBar) -> Decimal {
    bar.volume * intraday_return(bar.open, bar.close)
}

/// Net volume summed over bars
pub fn net_volume(bars: &[DailyBar]) -> Decimal {
    bars.iter().map(daily_net_volume).sum()
}

/// Net volume for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyNetVolume {
    pub year: i32,
    pub month: u32,
    pub net_volume: Decimal,
}

impl MonthlyNetVolume {
    /// e.g. "January 2025"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

/// Net volume per calendar month, in chronological order
pub fn monthly_net_volume(bars: &[DailyBar]) -> Vec<MonthlyNetVolume> {
    let mut months: Vec<MonthlyNetVolume> = Vec::new();
    for bar in bars {
        let (year, month) = (bar.date.year(), bar.date.month());
        let flow = daily_net_volume(bar);
        match months.last_mut() {
            Some(last) if last.year == year && last.month == month => last.net_volume += flow,
            _ => months.push(MonthlyNetVolume {
                year,
                month,
                net_volume: flow,
            }),
        }
    }
    months
}

/// Window a volume-pressure report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PressurePeriod {
    /// Latest session only
    #[default]
    Today,
    /// Last 7 calendar days
    Week,
    /// Last year, broken down by month
    Year,
    /// Today, last 7 days and the monthly breakdown together
    All,
}

impl PressurePeriod {
    pub fn lookback(&self) -> Lookback {
        match self {
            PressurePeriod::Today => Lookback::Days(1),
            PressurePeriod::Week => Lookback::Days(7),
            PressurePeriod::Year | PressurePeriod::All => Lookback::ONE_YEAR,
        }
    }
}

/// Render a volume-pressure report for a series
pub fn render_pressure(series: &Series, period: PressurePeriod) -> String {
    let symbol = series.symbol();
    let bars = series.bars();

    match period {
        PressurePeriod::Today | PressurePeriod::Week => {
            // A 1d fetch can still carry several sessions; keep the latest
            let window = match period {
                PressurePeriod::Today => &bars[bars.len().saturating_sub(1)..],
                _ => bars,
            };
            let net = net_volume(window);
            let direction = if net >= Decimal::ZERO {
                "buying pressure"
            } else {
                "selling pressure"
            };
            let label = match period {
                PressurePeriod::Today => "Today's net volume",
                _ => "Last 7 days net volume",
            };
            format!(
                "{} for {}: {} shares ({})",
                label,
                symbol,
                format_shares(net),
                direction
            )
        }
        PressurePeriod::Year => {
            let mut out = format!("Monthly net volume for {} (last year):", symbol);
            write_months(&mut out, bars);
            out
        }
        PressurePeriod::All => {
            let week = series.trailing(Lookback::Days(7));
            let today = net_volume(&bars[bars.len().saturating_sub(1)..]);
            let week = net_volume(week.bars());

            let mut out = format!("Net volume summary for {}:", symbol);
            let _ = write!(
                out,
                "\n\nTODAY: {} shares {}",
                format_shares(today),
                arrow(today)
            );
            let _ = write!(
                out,
                "\n\nLAST 7 DAYS: {} shares {}",
                format_shares(week),
                arrow(week)
            );
            out.push_str("\n\nMONTHLY (last year):");
            write_months(&mut out, bars);
            out
        }
    }
}

fn arrow(net: Decimal) -> &'static str {
    if net >= Decimal::ZERO {
        "↑"
    } else {
        "↓"
    }
}

fn write_months(out: &mut String, bars: &[DailyBar]) {
    for month in monthly_net_volume(bars) {
        let _ = write!(
            out,
            "\n- {}: {} shares {}",
            month.label(),
            format_shares(month.net_volume),
            arrow(month.net_volume)
        );
    }
}

/// Whole shares with an explicit sign and thousands separators
pub fn format_shares(value: Decimal) -> String {
    let rounded = value.round();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        '-'
    } else {
        '+'
    };
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(y: i32, m: u32, d: u32, open: Decimal, close: Decimal, volume: Decimal) -> DailyBar {
        DailyBar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), open, close, volume)
    }

    #[test]
    fn test_intraday_return_guards_open() {
        assert_eq!(intraday_return(dec!(100), dec!(102)), dec!(0.02));
        assert_eq!(intraday_return(dec!(0), dec!(102)), Decimal::ZERO);
        assert_eq!(intraday_return(dec!(-1), dec!(102)), Decimal::ZERO);
    }

    #[test]
    fn test_daily_net_volume_sign() {
        let up = bar(2024, 1, 2, dec!(100), dec!(102), dec!(1000000));
        let down = bar(2024, 1, 3, dec!(100), dec!(99), dec!(1000000));
        assert_eq!(daily_net_volume(&up), dec!(20000));
        assert_eq!(daily_net_volume(&down), dec!(-10000));
        assert_eq!(net_volume(&[up, down]), dec!(10000));
    }

    #[test]
    fn test_monthly_buckets() {
        let bars = vec![
            bar(2024, 1, 30, dec!(10), dec!(11), dec!(100)),
            bar(2024, 1, 31, dec!(10), dec!(9), dec!(50)),
            bar(2024, 2, 1, dec!(10), dec!(12), dec!(10)),
        ];
        let months = monthly_net_volume(&bars);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].net_volume, dec!(5));
        assert_eq!(months[0].label(), "January 2024");
        assert_eq!(months[1].net_volume, dec!(2));
        assert_eq!(months[1].month, 2);
    }

    #[test]
    fn test_format_shares() {
        assert_eq!(format_shares(dec!(1234567.4)), "+1,234,567");
        assert_eq!(format_shares(dec!(-5678)), "-5,678");
        assert_eq!(format_shares(dec!(999)), "+999");
        assert_eq!(format_shares(dec!(-0.2)), "+0");
    }

    #[test]
    fn test_render_week() {
        let series = Series::new(
            "AAPL",
            vec![
                bar(2024, 1, 2, dec!(100), dec!(102), dec!(1000000)),
                bar(2024, 1, 3, dec!(100), dec!(99), dec!(1000000)),
            ],
        );
        assert_eq!(
            render_pressure(&series, PressurePeriod::Week),
            "Last 7 days net volume for AAPL: +10,000 shares (buying pressure)"
        );
        assert_eq!(
            render_pressure(&series, PressurePeriod::Today),
            "Today's net volume for AAPL: -10,000 shares (selling pressure)"
        );
    }

    #[test]
    fn test_render_year() {
        let series = Series::new(
            "MSFT",
            vec![
                bar(2024, 1, 2, dec!(10), dec!(9), dec!(1000)),
                bar(2024, 2, 1, dec!(10), dec!(11), dec!(5000)),
            ],
        );
        assert_eq!(
            render_pressure(&series, PressurePeriod::Year),
            "Monthly net volume for MSFT (last year):\n\
             - January 2024: -100 shares ↓\n\
             - February 2024: +500 shares ↑"
        );
    }

    #[test]
    fn test_render_all() {
        let series = Series::new(
            "TSLA",
            vec![
                bar(2024, 1, 2, dec!(10), dec!(9), dec!(1000)),
                bar(2024, 2, 1, dec!(10), dec!(11), dec!(5000)),
                bar(2024, 2, 5, dec!(10), dec!(10.5), dec!(200)),
            ],
        );
        assert_eq!(
            render_pressure(&series, PressurePeriod::All),
            "Net volume summary for TSLA:\n\n\
             TODAY: +10 shares ↑\n\n\
             LAST 7 DAYS: +510 shares ↑\n\n\
             MONTHLY (last year):\n\
             - January 2024: -100 shares ↓\n\
             - February 2024: +510 shares ↑"
        );
    }

    #[test]
    fn test_period_lookback() {
        assert_eq!(PressurePeriod::Week.lookback(), Lookback::Days(7));
        assert_eq!(PressurePeriod::Year.lookback(), Lookback::Years(1));
        assert_eq!(PressurePeriod::All.lookback(), Lookback::Years(1));
    }
}
