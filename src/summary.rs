use std::collections::HashMap;
use std::fmt;

use chrono::{Local, NaiveDate};
use fixed::types::U51F13;

use crate::sale::Sale;

/// How many best sellers the ranked list is capped at
pub const TOP_SELLER_COUNT: usize = 3;

const RULE_WIDTH: usize = 50;

/// The recomputed aggregate view over all sales of one calendar date
///
/// A summary is derived on demand and never stored; its `Display`
/// implementation renders the daily report text.
#[derive(Clone, Debug)]
pub struct DailySummary {
    date: NaiveDate,
    transaction_count: usize,
    total_revenue: U51F13,
    /// Item totals ranked by quantity descending, ties broken by name
    /// ascending so the report is deterministic
    ranked: Vec<(String, u32)>,
}

impl DailySummary {
    /// Folds the specified sales into one aggregate
    pub fn from_sales(date: NaiveDate, sales: &[Sale]) -> Self {
        let mut total_revenue = U51F13::from_num(0);
        let mut item_totals: HashMap<String, u32> = HashMap::new();

        for sale in sales {
            total_revenue += sale.total();
            for (name, quantity) in sale.items() {
                *item_totals.entry(name.clone()).or_insert(0) += quantity;
            }
        }

        let mut ranked: Vec<_> = item_totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            date,
            transaction_count: sales.len(),
            total_revenue,
            ranked,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn total_revenue(&self) -> U51F13 {
        self.total_revenue
    }

    /// The average transaction value, only defined when there are sales
    pub fn average_per_transaction(&self) -> Option<U51F13> {
        (self.transaction_count > 0)
            .then(|| self.total_revenue / U51F13::from_num(self.transaction_count))
    }

    /// All sold items ranked by quantity descending
    pub fn item_totals(&self) -> &[(String, u32)] {
        &self.ranked
    }

    /// The first `min(3, distinct items)` entries of the ranking
    pub fn top_sellers(&self) -> &[(String, u32)] {
        &self.ranked[..self.ranked.len().min(TOP_SELLER_COUNT)]
    }

    /// The total quantity sold across all items
    pub fn total_quantity(&self) -> u32 {
        self.ranked.iter().map(|(_, quantity)| quantity).sum()
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Daily Sales Summary")?;
        writeln!(f, "Date: {}", self.date.format("%Y-%m-%d"))?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f)?;

        writeln!(f, "Sales Overview:")?;
        writeln!(f, "  Transactions: {}", self.transaction_count)?;
        writeln!(f, "  Total revenue: ฿{:.2}", self.total_revenue)?;
        if let Some(average) = self.average_per_transaction() {
            writeln!(f, "  Average per transaction: ฿{average:.2}")?;
        }
        writeln!(f)?;

        writeln!(f, "Items Sold:")?;
        writeln!(f, "{}", "-".repeat(40))?;
        if self.ranked.is_empty() {
            writeln!(f, "  No items sold.")?;
        } else {
            for (name, quantity) in &self.ranked {
                writeln!(f, "  {name:<25} {quantity:>3}")?;
            }
            writeln!(f, "{}", "-".repeat(40))?;
            writeln!(f, "  {:<25} {:>3}", "Total items:", self.total_quantity())?;
        }
        writeln!(f)?;

        writeln!(f, "Top {TOP_SELLER_COUNT} Best Sellers:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        for (name, quantity) in self.top_sellers() {
            writeln!(f, "  {name} ({quantity})")?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "Generated: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(())
    }
}

/// The placeholder report written for dates without any recorded sales
pub fn no_sales_report(date: NaiveDate) -> String {
    let mut report = String::new();
    report.push_str("Daily Sales Summary\n");
    report.push_str(&format!("Date: {}\n", date.format("%Y-%m-%d")));
    report.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
    report.push_str("No sales recorded for this date.\n");
    report.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::Product;

    fn sale(items: &[(&str, u32, u32)], received: u32) -> Sale {
        let mut cart = Cart::new();
        for (index, &(name, price, quantity)) in items.iter().enumerate() {
            let product = Product::new((index as u32 + 1).into(), name, U51F13::from_num(price));
            for _ in 0..quantity {
                cart.add(&product);
            }
        }

        let total = cart.subtotal();
        let received = U51F13::from_num(received);
        Sale::new(&cart, total, received, received - total)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn aggregates_revenue_count_and_item_totals() {
        let sales = [
            sale(&[("Espresso", 50, 2), ("Latte", 65, 1)], 200),
            sale(&[("Espresso", 50, 1)], 50),
            sale(&[("Latte", 65, 2)], 150),
        ];

        let summary = DailySummary::from_sales(today(), &sales);

        assert_eq!(summary.transaction_count(), 3);
        assert_eq!(summary.total_revenue(), U51F13::from_num(165 + 50 + 130));
        assert_eq!(
            summary.item_totals(),
            [("Espresso".to_owned(), 3), ("Latte".to_owned(), 3)]
        );
        assert_eq!(summary.total_quantity(), 6);
    }

    #[test]
    fn average_is_only_defined_for_nonzero_transaction_counts() {
        let empty = DailySummary::from_sales(today(), &[]);
        assert_eq!(empty.average_per_transaction(), None);

        let sales = [sale(&[("Espresso", 50, 1)], 50), sale(&[("Latte", 65, 2)], 130)];
        let summary = DailySummary::from_sales(today(), &sales);
        assert_eq!(
            summary.average_per_transaction(),
            Some(U51F13::from_num(90))
        );
    }

    #[test]
    fn top_sellers_are_capped_at_three_and_sorted_descending() {
        let sales = [sale(
            &[
                ("Espresso", 50, 4),
                ("Latte", 65, 2),
                ("Mocha", 80, 7),
                ("Donut", 35, 1),
            ],
            1000,
        )];

        let summary = DailySummary::from_sales(today(), &sales);

        let top: Vec<_> = summary
            .top_sellers()
            .iter()
            .map(|(name, quantity)| (name.as_str(), *quantity))
            .collect();
        assert_eq!(top, [("Mocha", 7), ("Espresso", 4), ("Latte", 2)]);
    }

    #[test]
    fn top_sellers_are_not_padded_below_three_distinct_items() {
        let sales = [sale(&[("Espresso", 50, 2), ("Latte", 65, 1)], 200)];
        let summary = DailySummary::from_sales(today(), &sales);

        assert_eq!(summary.top_sellers().len(), 2);
    }

    #[test]
    fn quantity_ties_break_by_name_ascending() {
        let sales = [sale(
            &[("Mocha", 80, 2), ("Espresso", 50, 2), ("Latte", 65, 2)],
            1000,
        )];

        let summary = DailySummary::from_sales(today(), &sales);

        let names: Vec<_> = summary
            .item_totals()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["Espresso", "Latte", "Mocha"]);
    }

    #[test]
    fn report_contains_the_overview_and_ranking() {
        let sales = [
            sale(&[("Espresso", 50, 2), ("Latte", 65, 1)], 200),
            sale(&[("Espresso", 50, 1)], 50),
        ];

        let report = DailySummary::from_sales(today(), &sales).to_string();

        assert!(report.contains("Daily Sales Summary"));
        assert!(report.contains("  Transactions: 2"));
        assert!(report.contains("  Total revenue: ฿215.00"));
        assert!(report.contains("  Average per transaction: ฿107.50"));
        assert!(report.contains(&format!("  {:<25} {:>3}", "Espresso", 3)));
        assert!(report.contains(&format!("  {:<25} {:>3}", "Total items:", 4)));
        assert!(report.contains("Top 3 Best Sellers:"));
        assert!(report.contains("  Espresso (3)"));
        assert!(report.contains("Generated: "));
    }

    #[test]
    fn no_sales_report_is_a_minimal_placeholder() {
        let report = no_sales_report(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert!(report.contains("Date: 2024-03-01"));
        assert!(report.contains("No sales recorded for this date."));
        assert!(!report.contains("Transactions:"));
    }
}
