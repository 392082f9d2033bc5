//! Sales analytics aggregation.
//!
//! Recomputes the whole series from scratch on every request. Fine at the
//! data volumes this service sees; incremental aggregation is out of scope.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// One sold ticket, as read from the tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketSale {
    pub purchase_date: DateTime<Utc>,
    pub price: Decimal,
    pub service_fee: Decimal,
}

/// One day in the sales series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub day: NaiveDate,
    pub tickets_sold: u64,
    /// Revenue (price + service fee) of tickets sold on this day.
    pub revenue: Decimal,
    /// Running revenue total up to and including this day.
    pub cumulative_revenue: Decimal,
}

/// Bucket sales by calendar day (UTC) and accumulate revenue, days ascending.
pub fn aggregate_daily_sales(sales: &[TicketSale]) -> Vec<DailySales> {
    let mut buckets: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();
    for sale in sales {
        let day = sale.purchase_date.date_naive();
        let entry = buckets.entry(day).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += sale.price + sale.service_fee;
    }

    let mut cumulative = Decimal::ZERO;
    buckets
        .into_iter()
        .map(|(day, (tickets_sold, revenue))| {
            cumulative += revenue;
            DailySales {
                day,
                tickets_sold,
                revenue,
                cumulative_revenue: cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sale(date: &str, price: Decimal, fee: Decimal) -> TicketSale {
        let day: NaiveDate = date.parse().unwrap();
        TicketSale {
            purchase_date: Utc
                .from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap()),
            price,
            service_fee: fee,
        }
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(aggregate_daily_sales(&[]).is_empty());
    }

    #[test]
    fn two_day_series_matches_hand_computed_totals() {
        // 3 tickets on day 1 at 100 + 20 each, 2 on day 2 at 50 + 10 each.
        let sales = vec![
            sale("2024-03-01", dec!(100), dec!(20)),
            sale("2024-03-01", dec!(100), dec!(20)),
            sale("2024-03-01", dec!(100), dec!(20)),
            sale("2024-03-02", dec!(50), dec!(10)),
            sale("2024-03-02", dec!(50), dec!(10)),
        ];

        let series = aggregate_daily_sales(&sales);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].day, "2024-03-01".parse::<NaiveDate>().unwrap());
        assert_eq!(series[0].tickets_sold, 3);
        assert_eq!(series[0].revenue, dec!(360));
        assert_eq!(series[0].cumulative_revenue, dec!(360));

        assert_eq!(series[1].day, "2024-03-02".parse::<NaiveDate>().unwrap());
        assert_eq!(series[1].tickets_sold, 2);
        assert_eq!(series[1].revenue, dec!(120));
        assert_eq!(series[1].cumulative_revenue, dec!(480));
    }

    #[test]
    fn days_come_out_ascending_regardless_of_input_order() {
        let sales = vec![
            sale("2024-03-05", dec!(10), dec!(0)),
            sale("2024-03-01", dec!(10), dec!(0)),
            sale("2024-03-03", dec!(10), dec!(0)),
        ];
        let series = aggregate_daily_sales(&sales);
        let days: Vec<NaiveDate> = series.iter().map(|d| d.day).collect();
        let mut sorted = days.clone();
        sorted.sort();
        assert_eq!(days, sorted);
    }

    #[test]
    fn same_day_purchases_at_different_times_share_a_bucket() {
        let day: NaiveDate = "2024-03-01".parse().unwrap();
        let early = TicketSale {
            purchase_date: Utc.from_utc_datetime(&day.and_hms_opt(0, 5, 0).unwrap()),
            price: dec!(25),
            service_fee: dec!(5),
        };
        let late = TicketSale {
            purchase_date: Utc.from_utc_datetime(&day.and_hms_opt(23, 55, 0).unwrap()),
            price: dec!(25),
            service_fee: dec!(5),
        };
        let series = aggregate_daily_sales(&[early, late]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].tickets_sold, 2);
        assert_eq!(series[0].revenue, dec!(60));
    }
}
