// Headline figures over derived views. An empty view has no total, mean or mode.
use crate::model::{
    AnalysisError, CategoryCount, DailyOrders, DailySpend, ReviewSummary, StateSummary,
    StatusSummary,
};

fn non_empty<T>(rows: &[T]) -> Result<&[T], AnalysisError> {
    if rows.is_empty() {
        Err(AnalysisError::EmptyInput)
    } else {
        Ok(rows)
    }
}

pub fn total_orders(daily: &[DailyOrders]) -> Result<usize, AnalysisError> {
    Ok(non_empty(daily)?.iter().map(|d| d.order_count).sum())
}

pub fn total_revenue(daily: &[DailyOrders]) -> Result<f64, AnalysisError> {
    Ok(non_empty(daily)?.iter().map(|d| d.revenue).sum())
}

pub fn total_spend(spend: &[DailySpend]) -> Result<f64, AnalysisError> {
    Ok(non_empty(spend)?.iter().map(|d| d.total_spend).sum())
}

/// Mean spend per active day.
pub fn average_spend(spend: &[DailySpend]) -> Result<f64, AnalysisError> {
    Ok(total_spend(spend)? / spend.len() as f64)
}

pub fn total_items(items: &[CategoryCount]) -> Result<usize, AnalysisError> {
    Ok(non_empty(items)?.iter().map(|i| i.product_count).sum())
}

/// Mean items per category.
pub fn average_items(items: &[CategoryCount]) -> Result<f64, AnalysisError> {
    Ok(total_items(items)? as f64 / items.len() as f64)
}

/// The `n` best selling categories, best first.
pub fn top_categories(items: &[CategoryCount], n: usize) -> &[CategoryCount] {
    &items[..n.min(items.len())]
}

/// The `n` worst selling categories, worst first.
pub fn bottom_categories(items: &[CategoryCount], n: usize) -> Vec<CategoryCount> {
    let mut bottom = items.to_vec();
    bottom.sort_by_key(|i| i.product_count);
    bottom.truncate(n);
    bottom
}

impl ReviewSummary {
    /// Mean of the individual review scores.
    pub fn average_score(&self) -> Result<f64, AnalysisError> {
        let reviews: usize = non_empty(&self.distribution)?.iter().map(|s| s.count).sum();
        let weighted: usize = self
            .distribution
            .iter()
            .map(|s| s.score as usize * s.count)
            .sum();
        Ok(weighted as f64 / reviews as f64)
    }

    pub fn most_common(&self) -> Result<u8, AnalysisError> {
        self.mode.ok_or(AnalysisError::EmptyInput)
    }
}

impl StateSummary {
    pub fn most_common(&self) -> Result<&str, AnalysisError> {
        self.mode.as_deref().ok_or(AnalysisError::EmptyInput)
    }
}

impl StatusSummary {
    pub fn most_common(&self) -> Result<&str, AnalysisError> {
        self.mode.as_deref().ok_or(AnalysisError::EmptyInput)
    }
}
