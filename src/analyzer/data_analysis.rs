use crate::analyzer::distribution::{mode, tally};
use crate::model::{
    CategoryCount, DailyOrders, DailySpend, OrderRecord, ReviewSummary, ScoreCount, StateCount,
    StateSummary, StatusCount, StatusSummary,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Trait defining the derived views computed over a filtered order table.
///
/// Every view is empty when the table is empty; nothing here fails.
pub trait Analyzer {
    /// Orders and revenue per approval day, ascending by date.
    fn daily_orders(&self) -> Vec<DailyOrders>;
    /// Total spend per approval day, ascending by date.
    fn spend_summary(&self) -> Vec<DailySpend>;
    /// Items sold per product category, descending by count.
    fn item_summary(&self) -> Vec<CategoryCount>;
    fn review_summary(&self) -> ReviewSummary;
    /// Distinct customers per state, descending by count.
    fn state_summary(&self) -> StateSummary;
    fn status_summary(&self) -> StatusSummary;
}

/// Analyzer over an order table already restricted to the selected window.
pub struct DataAnalyzer<'a> {
    orders: &'a [OrderRecord],
}

impl<'a> DataAnalyzer<'a> {
    pub fn new(orders: &'a [OrderRecord]) -> Self {
        Self { orders }
    }

    fn by_day(&self) -> BTreeMap<NaiveDate, (usize, f64)> {
        let mut days: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
        for order in self.orders {
            if let Some(date) = order.approval_date() {
                let entry = days.entry(date).or_default();
                entry.0 += 1;
                entry.1 += order.spend();
            }
        }
        days
    }
}

impl Analyzer for DataAnalyzer<'_> {
    fn daily_orders(&self) -> Vec<DailyOrders> {
        self.by_day()
            .into_iter()
            .map(|(date, (order_count, revenue))| DailyOrders {
                date,
                order_count,
                revenue,
            })
            .collect()
    }

    fn spend_summary(&self) -> Vec<DailySpend> {
        self.by_day()
            .into_iter()
            .map(|(date, (_, total_spend))| DailySpend { date, total_spend })
            .collect()
    }

    fn item_summary(&self) -> Vec<CategoryCount> {
        let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
        for category in self.orders.iter().filter_map(|o| o.product_category.as_deref()) {
            *groups.entry(category).or_default() += 1;
        }

        let mut items: Vec<CategoryCount> = groups
            .into_iter()
            .map(|(category, product_count)| CategoryCount {
                category: category.to_string(),
                product_count,
            })
            .collect();
        // stable: equal counts stay in ascending category order
        items.sort_by(|a, b| b.product_count.cmp(&a.product_count));
        items
    }

    fn review_summary(&self) -> ReviewSummary {
        let counts = tally(self.orders.iter().filter_map(|o| o.review_score));
        let mode = mode(&counts);

        let mut distribution: Vec<ScoreCount> = counts
            .into_iter()
            .map(|(score, count)| ScoreCount { score, count })
            .collect();
        distribution.sort_by_key(|s| s.score);

        ReviewSummary { distribution, mode }
    }

    fn state_summary(&self) -> StateSummary {
        let mut seen = HashSet::new();
        let customers = self
            .orders
            .iter()
            .filter(|o| seen.insert((o.customer_state.as_str(), o.customer_id.as_str())))
            .map(|o| o.customer_state.as_str());
        let counts = tally(customers);

        let mut distribution: Vec<StateCount> = counts
            .into_iter()
            .map(|(state, customer_count)| StateCount {
                state: state.to_string(),
                customer_count,
            })
            .collect();
        // stable, so ties stay in first-seen order and the mode leads
        distribution.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
        let mode = distribution.first().map(|s| s.state.clone());

        StateSummary { distribution, mode }
    }

    fn status_summary(&self) -> StatusSummary {
        let counts = tally(self.orders.iter().filter_map(|o| o.order_status.as_deref()));

        let mut distribution: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count));
        let mode = distribution.first().map(|s| s.status.clone());

        StatusSummary { distribution, mode }
    }
}

/// Every derived view for one date window.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub daily_orders: Vec<DailyOrders>,
    pub spend: Vec<DailySpend>,
    pub items: Vec<CategoryCount>,
    pub reviews: ReviewSummary,
    pub states: StateSummary,
    pub statuses: StatusSummary,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.daily_orders.is_empty()
    }
}

impl DataAnalyzer<'_> {
    /// Computes all views in one pass over the public queries.
    pub fn analyze_all(&self) -> AnalysisResult {
        AnalysisResult {
            daily_orders: self.daily_orders(),
            spend: self.spend_summary(),
            items: self.item_summary(),
            reviews: self.review_summary(),
            states: self.state_summary(),
            statuses: self.status_summary(),
        }
    }
}
