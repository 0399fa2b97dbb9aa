// HTML dashboard page
use crate::analyzer::AnalysisResult;
use crate::analyzer::summary::{
    average_items, average_spend, bottom_categories, top_categories, total_items, total_orders,
    total_revenue, total_spend,
};
use crate::config::AppConfig;
use crate::filter::DateRange;
use crate::model::{AnalysisError, CategoryCount, RenderError};
use crate::render::charts::{Bar, bar_chart, horizontal_bar_chart, line_chart};
use crate::utils::{escape_html, humanize};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PAGE_FILE: &str = "index.html";
const TOP_N: usize = 5;

const STATE_EXPLANATION: &str = "Based on the generated graph, a higher concentration of customers is located in the southeast and southern regions. Additionally, a significant number of customers are found in major capital cities such as São Paulo, Rio de Janeiro, Porto Alegre, and others.";
const MAP_EXPLANATION: &str = "According to the map provided, the geographical area with the highest number of customers appears to be concentrated in the southeastern region of Brazil. This area typically includes major cities such as São Paulo, Rio de Janeiro, Porto Alegre, and others, which are known for their significant populations and urban activity.";

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 1000px; margin: 0 auto; padding: 1rem; background: #fafafa; color: #212121; }
h2 { border-bottom: 1px solid #ddd; padding-bottom: .3rem; }
.metrics { display: flex; gap: 2rem; }
.charts { display: flex; flex-wrap: wrap; gap: 1rem; }
.charts svg, .map img { max-width: 100%; height: auto; }
.notice { padding: .8rem; background: #fff3e0; border-left: 4px solid #fb8c00; }
.error { padding: .8rem; background: #ffebee; border-left: 4px solid #e53935; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: .4rem 1rem; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #1e88e5; font-weight: bold; }
.tab { display: none; padding-top: 1rem; }
#tab-state:checked ~ #panel-state, #tab-geo:checked ~ #panel-geo { display: block; }
footer { margin-top: 2rem; color: #757575; font-size: .85rem; }
"#;

/// Everything one render of the dashboard shows.
pub struct DashboardPage<'a> {
    pub config: &'a AppConfig,
    /// Selected window, or `None` when the table has no approved orders.
    pub range: Option<DateRange>,
    pub analysis: &'a AnalysisResult,
    /// PNG of the customer map, or why it could not be drawn.
    pub map: Result<Vec<u8>, RenderError>,
}

impl DashboardPage<'_> {
    fn period(&self) -> String {
        match self.range {
            Some(range) => range.to_string(),
            None => "no approved orders".to_string(),
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.config.title)));
        html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.config.title)));
        html.push_str("<p><strong>This is a dashboard for analyzing E-Commerce public data.</strong></p>\n");
        html.push_str(&format!(
            "<p><strong>By {}.</strong></p>\n<p>Period: {}</p>\n",
            escape_html(&self.config.author),
            self.period()
        ));

        html.push_str(&self.daily_orders_section());
        html.push_str(&self.spend_section());
        html.push_str(&self.items_section());
        html.push_str(&self.review_section());
        html.push_str(&self.demographic_section());

        html.push_str(&format!(
            "<footer>Copyright (C) {}</footer>\n</body>\n</html>\n",
            escape_html(&self.config.author)
        ));
        html
    }

    fn daily_orders_section(&self) -> String {
        let daily = &self.analysis.daily_orders;
        let body = match (total_orders(daily), total_revenue(daily)) {
            (Ok(orders), Ok(revenue)) => {
                let status = self
                    .analysis
                    .statuses
                    .most_common()
                    .map(escape_html)
                    .unwrap_or_else(|_| "n/a".to_string());
                let points: Vec<_> = daily.iter().map(|d| (d.date, d.order_count as f64)).collect();
                format!(
                    "{}{}",
                    metrics(&[
                        ("Total Order", orders.to_string()),
                        ("Total Revenue", format!("{revenue:.2}")),
                        ("Most Common Status", status),
                    ]),
                    chart_block(line_chart("Daily Orders", "Orders", &points))
                )
            }
            (Err(e), _) | (_, Err(e)) => no_data(e),
        };
        section("Daily Orders Delivered", &body)
    }

    fn spend_section(&self) -> String {
        let spend = &self.analysis.spend;
        let body = match (total_spend(spend), average_spend(spend)) {
            (Ok(total), Ok(avg)) => {
                let points: Vec<_> = spend.iter().map(|d| (d.date, d.total_spend)).collect();
                format!(
                    "{}{}",
                    metrics(&[
                        ("Total Spend", format!("{total:.2}")),
                        ("Average Spend", format!("{avg:.2}")),
                    ]),
                    chart_block(line_chart("Customer Spend", "Spend", &points))
                )
            }
            (Err(e), _) | (_, Err(e)) => no_data(e),
        };
        section("Customer Spend Money", &body)
    }

    fn items_section(&self) -> String {
        let items = &self.analysis.items;
        let body = match (total_items(items), average_items(items)) {
            (Ok(total), Ok(avg)) => {
                let most = category_bars(top_categories(items, TOP_N));
                let fewest = category_bars(&bottom_categories(items, TOP_N));
                format!(
                    "{}<div class=\"charts\">{}{}</div>\n",
                    metrics(&[
                        ("Total Items", total.to_string()),
                        ("Average Items", format!("{avg:.2}")),
                    ]),
                    chart_block(horizontal_bar_chart("Most Sold Products", "Number of Sales", &most)),
                    chart_block(horizontal_bar_chart("Fewest Products Sold", "Number of Sales", &fewest)),
                )
            }
            (Err(e), _) | (_, Err(e)) => no_data(e),
        };
        section("Order Items", &body)
    }

    fn review_section(&self) -> String {
        let reviews = &self.analysis.reviews;
        let body = match (reviews.average_score(), reviews.most_common()) {
            (Ok(avg), Ok(score)) => {
                let bars: Vec<Bar> = reviews
                    .distribution
                    .iter()
                    .map(|s| Bar::new(s.score.to_string(), s.count as f64))
                    .collect();
                format!(
                    "{}{}",
                    metrics(&[
                        ("Average Review Score", format!("{avg:.2}")),
                        ("Most Common Review Score", score.to_string()),
                    ]),
                    chart_block(bar_chart(
                        "Customer Review Scores for Service",
                        "Rating",
                        "Count",
                        &bars,
                        true
                    ))
                )
            }
            (Err(e), _) | (_, Err(e)) => no_data(e),
        };
        section("Review Score", &body)
    }

    fn demographic_section(&self) -> String {
        let states = &self.analysis.states;
        let state_panel = match states.most_common() {
            Ok(state) => {
                let bars: Vec<Bar> = states
                    .distribution
                    .iter()
                    .map(|s| Bar::new(s.state.clone(), s.customer_count as f64))
                    .collect();
                format!(
                    "{}{}",
                    metrics(&[("Most Common State", escape_html(state))]),
                    chart_block(bar_chart(
                        "Number of Customers from Each State",
                        "State",
                        "Number of Customers",
                        &bars,
                        false
                    ))
                )
            }
            Err(e) => no_data(e),
        };

        let map_panel = match &self.map {
            Ok(png) => format!(
                "<div class=\"map\"><img alt=\"Customer locations\" src=\"data:image/png;base64,{}\"></div>\n",
                STANDARD.encode(png)
            ),
            Err(e) => format!(
                "<p class=\"error\">Customer map unavailable: {}</p>\n",
                escape_html(&e.to_string())
            ),
        };

        let body = format!(
            "<div class=\"tabs\">\n\
             <input type=\"radio\" name=\"demographic\" id=\"tab-state\" checked><label for=\"tab-state\">State</label>\n\
             <input type=\"radio\" name=\"demographic\" id=\"tab-geo\"><label for=\"tab-geo\">Geolocation</label>\n\
             <div class=\"tab\" id=\"panel-state\">\n{}{}</div>\n\
             <div class=\"tab\" id=\"panel-geo\">\n{}{}</div>\n\
             </div>\n",
            state_panel,
            explanation(STATE_EXPLANATION),
            map_panel,
            explanation(MAP_EXPLANATION),
        );
        section("Customer Demographic", &body)
    }
}

fn section(heading: &str, body: &str) -> String {
    format!("<section>\n<h2>{heading}</h2>\n{body}</section>\n")
}

fn metrics(entries: &[(&str, String)]) -> String {
    let cells: String = entries
        .iter()
        .map(|(label, value)| format!("<div>{label}: <strong>{value}</strong></div>"))
        .collect();
    format!("<div class=\"metrics\">{cells}</div>\n")
}

fn chart_block(chart: Result<String, RenderError>) -> String {
    match chart {
        Ok(svg) => format!("<div class=\"chart\">{svg}</div>\n"),
        Err(e) => {
            warn!("Chart skipped: {}", e);
            format!(
                "<p class=\"error\">Chart unavailable: {}</p>\n",
                escape_html(&e.to_string())
            )
        }
    }
}

fn no_data(e: AnalysisError) -> String {
    format!(
        "<p class=\"notice\">No data: {}. Select a wider date range.</p>\n",
        escape_html(&e.to_string())
    )
}

fn explanation(text: &str) -> String {
    format!(
        "<details><summary>See Explanation</summary><p>{}</p></details>\n",
        escape_html(text)
    )
}

fn category_bars(items: &[CategoryCount]) -> Vec<Bar> {
    items
        .iter()
        .map(|i| Bar::new(humanize(&i.category), i.product_count as f64))
        .collect()
}

/// Writes the page into `dir`, creating it when needed.
pub fn write_page(dir: &Path, html: &str) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(PAGE_FILE);
    fs::write(&path, html).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Dashboard written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DataAnalyzer;
    use crate::model::{OrderRecord, SourceError};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    fn order(id: &str, d: u32, spend: f64, category: &str, score: u8, state: &str) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            customer_id: format!("c-{id}"),
            order_status: Some("delivered".to_string()),
            approved_at: Some(day(d).and_hms_opt(9, 0, 0).unwrap()),
            delivered_carrier_at: None,
            delivered_customer_at: None,
            estimated_delivery_at: None,
            purchased_at: None,
            shipping_limit_at: None,
            payment_value: Some(spend),
            product_category: Some(category.to_string()),
            review_score: Some(score),
            customer_state: state.to_string(),
        }
    }

    fn sample() -> AnalysisResult {
        let orders = vec![
            order("o1", 1, 100.0, "health_beauty", 5, "SP"),
            order("o2", 2, 50.0, "toys", 4, "RJ"),
            order("o3", 2, 50.0, "toys", 5, "SP"),
        ];
        DataAnalyzer::new(&orders).analyze_all()
    }

    fn page<'a>(
        config: &'a AppConfig,
        analysis: &'a AnalysisResult,
        map: Result<Vec<u8>, RenderError>,
    ) -> DashboardPage<'a> {
        DashboardPage {
            config,
            range: Some(DateRange::new(day(1), day(2)).unwrap()),
            analysis,
            map,
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let config = AppConfig::default();
        let analysis = sample();
        let html = page(&config, &analysis, Ok(vec![1, 2, 3])).render();

        let headings = [
            "Daily Orders Delivered",
            "Customer Spend Money",
            "Order Items",
            "Review Score",
            "Customer Demographic",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| html.find(&format!("<h2>{h}</h2>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("Period: 2018-01-01 to 2018-01-02"));
    }

    #[test]
    fn metrics_reflect_the_views() {
        let config = AppConfig::default();
        let analysis = sample();
        let html = page(&config, &analysis, Ok(vec![1, 2, 3])).render();

        assert!(html.contains("Total Order: <strong>3</strong>"));
        assert!(html.contains("Total Revenue: <strong>200.00</strong>"));
        assert!(html.contains("Average Spend: <strong>100.00</strong>"));
        assert!(html.contains("Total Items: <strong>3</strong>"));
        assert!(html.contains("Average Review Score: <strong>4.67</strong>"));
        assert!(html.contains("Most Common Review Score: <strong>5</strong>"));
        assert!(html.contains("Most Common State: <strong>SP</strong>"));
        assert!(html.contains("Most Common Status: <strong>delivered</strong>"));
        assert!(html.contains("data:image/png;base64,AQID"));
    }

    #[test]
    fn empty_range_renders_no_data_notices() {
        let config = AppConfig::default();
        let analysis = AnalysisResult::default();
        let html = page(&config, &analysis, Ok(vec![1, 2, 3])).render();

        assert!(!html.contains("Total Order:"));
        assert!(!html.contains("Average Review Score:"));
        assert_eq!(html.matches("class=\"notice\"").count(), 5);
        assert!(html.contains("data:image/png;base64"));
    }

    #[test]
    fn table_without_approved_orders_renders_empty_page() {
        let config = AppConfig::default();
        let analysis = AnalysisResult::default();
        let mut page = page(&config, &analysis, Ok(vec![1, 2, 3]));
        page.range = None;
        let html = page.render();

        assert!(html.contains("Period: no approved orders"));
        assert_eq!(html.matches("class=\"notice\"").count(), 5);
        assert!(html.contains("<h2>Customer Demographic</h2>"));
    }

    #[test]
    fn map_failure_only_affects_its_tab() {
        let config = AppConfig::default();
        let analysis = sample();
        let map = Err(RenderError::ImageFetch(SourceError::Timeout(
            "https://example.invalid/map.jpg".to_string(),
        )));
        let html = page(&config, &analysis, map).render();

        assert!(html.contains("Customer map unavailable"));
        assert!(html.contains("Most Common State: <strong>SP</strong>"));
        assert!(html.contains("Total Order: <strong>3</strong>"));
    }

    #[test]
    fn writes_index_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/report");

        let path = write_page(&out, "<html></html>").unwrap();
        assert_eq!(path, out.join("index.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
