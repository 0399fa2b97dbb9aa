// CSV parsing for the orders and geolocation tables
use crate::model::{GeoRecord, OrderRecord, ParserError};
use crate::utils::parse_datetime;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

pub trait TableParser {
    type Record;

    fn parse(&self, data: &[u8]) -> Result<Vec<Self::Record>, ParserError>;
}

const ORDER_COLUMNS: [&str; 12] = [
    "order_id",
    "customer_id",
    "order_approved_at",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
    "order_purchase_timestamp",
    "shipping_limit_date",
    "payment_value",
    "product_category_name_english",
    "review_score",
    "customer_state",
];

const GEO_COLUMNS: [&str; 3] = ["customer_unique_id", "geolocation_lat", "geolocation_lng"];

#[derive(Debug, Deserialize)]
struct RawOrderRow {
    order_id: String,
    customer_id: String,
    #[serde(default)]
    order_status: Option<String>,
    order_approved_at: Option<String>,
    order_delivered_carrier_date: Option<String>,
    order_delivered_customer_date: Option<String>,
    order_estimated_delivery_date: Option<String>,
    order_purchase_timestamp: Option<String>,
    shipping_limit_date: Option<String>,
    payment_value: Option<String>,
    product_category_name_english: Option<String>,
    review_score: Option<String>,
    customer_state: String,
}

#[derive(Debug, Deserialize)]
struct RawGeoRow {
    customer_unique_id: String,
    geolocation_lat: String,
    geolocation_lng: String,
}

fn check_columns(headers: &StringRecord, required: &[&'static str]) -> Result<(), ParserError> {
    for &column in required {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(ParserError::MissingColumn(column));
        }
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
}

fn timestamp(
    value: Option<String>,
    line: u64,
    column: &'static str,
) -> Result<Option<NaiveDateTime>, ParserError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => parse_datetime(&v)
            .map(Some)
            .ok_or(ParserError::InvalidTimestamp {
                line,
                column,
                value: v,
            }),
    }
}

fn number(value: &str, line: u64, column: &'static str) -> Result<f64, ParserError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParserError::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        })
}

fn review_score(value: Option<String>, line: u64) -> Result<Option<u8>, ParserError> {
    let Some(v) = non_empty(value) else {
        return Ok(None);
    };
    let score = number(&v, line, "review_score")?;
    if score.fract() != 0.0 || !(1.0..=5.0).contains(&score) {
        return Err(ParserError::InvalidNumber {
            line,
            column: "review_score",
            value: v,
        });
    }
    Ok(Some(score as u8))
}

/// Parses the order/transaction table.
pub struct OrdersParser;

impl OrdersParser {
    pub fn new() -> Self {
        Self
    }

    fn convert(raw: RawOrderRow, line: u64) -> Result<OrderRecord, ParserError> {
        let payment_value = match non_empty(raw.payment_value) {
            Some(v) => Some(number(&v, line, "payment_value")?),
            None => None,
        };

        Ok(OrderRecord {
            order_id: raw.order_id,
            customer_id: raw.customer_id,
            order_status: non_empty(raw.order_status),
            approved_at: timestamp(raw.order_approved_at, line, "order_approved_at")?,
            delivered_carrier_at: timestamp(
                raw.order_delivered_carrier_date,
                line,
                "order_delivered_carrier_date",
            )?,
            delivered_customer_at: timestamp(
                raw.order_delivered_customer_date,
                line,
                "order_delivered_customer_date",
            )?,
            estimated_delivery_at: timestamp(
                raw.order_estimated_delivery_date,
                line,
                "order_estimated_delivery_date",
            )?,
            purchased_at: timestamp(raw.order_purchase_timestamp, line, "order_purchase_timestamp")?,
            shipping_limit_at: timestamp(raw.shipping_limit_date, line, "shipping_limit_date")?,
            payment_value,
            product_category: non_empty(raw.product_category_name_english),
            review_score: review_score(raw.review_score, line)?,
            customer_state: raw.customer_state.trim().to_string(),
        })
    }
}

impl TableParser for OrdersParser {
    type Record = OrderRecord;

    fn parse(&self, data: &[u8]) -> Result<Vec<OrderRecord>, ParserError> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(data);
        let headers = reader.headers()?.clone();
        check_columns(&headers, &ORDER_COLUMNS)?;

        let mut orders = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawOrderRow = record.deserialize(Some(&headers))?;
            orders.push(Self::convert(raw, line)?);
        }

        Ok(orders)
    }
}

/// Parses the customer geolocation table.
pub struct GeolocationParser;

impl GeolocationParser {
    pub fn new() -> Self {
        Self
    }
}

impl TableParser for GeolocationParser {
    type Record = GeoRecord;

    fn parse(&self, data: &[u8]) -> Result<Vec<GeoRecord>, ParserError> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(data);
        let headers = reader.headers()?.clone();
        check_columns(&headers, &GEO_COLUMNS)?;

        let mut locations = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawGeoRow = record.deserialize(Some(&headers))?;
            locations.push(GeoRecord {
                customer_unique_id: raw.customer_unique_id,
                latitude: number(&raw.geolocation_lat, line, "geolocation_lat")?,
                longitude: number(&raw.geolocation_lng, line, "geolocation_lng")?,
            });
        }

        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = ",order_id,customer_id,order_status,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,order_purchase_timestamp,shipping_limit_date,payment_value,product_category_name_english,review_score,customer_state";

    fn orders_csv(rows: &[&str]) -> Vec<u8> {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.into_bytes()
    }

    #[test]
    fn parses_order_rows() {
        let data = orders_csv(&[
            "0,o1,c1,delivered,2018-01-01 10:00:00,2018-01-02 08:00:00,2018-01-05 12:00:00,2018-01-10 00:00:00,2017-12-31 22:00:00,2018-01-03 10:00:00,100.5,health_beauty,5.0,SP",
            "1,o2,c2,shipped,,,,2018-01-10 00:00:00,2018-01-01 09:00:00,,,,,RJ",
        ]);

        let orders = OrdersParser::new().parse(&data).unwrap();
        assert_eq!(orders.len(), 2);

        let first = &orders[0];
        assert_eq!(first.order_id, "o1");
        assert_eq!(first.order_status.as_deref(), Some("delivered"));
        assert_eq!(first.approval_date(), NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(first.payment_value, Some(100.5));
        assert_eq!(first.product_category.as_deref(), Some("health_beauty"));
        assert_eq!(first.review_score, Some(5));
        assert_eq!(first.customer_state, "SP");

        let second = &orders[1];
        assert_eq!(second.approved_at, None);
        assert_eq!(second.payment_value, None);
        assert_eq!(second.spend(), 0.0);
        assert_eq!(second.product_category, None);
        assert_eq!(second.review_score, None);
    }

    #[test]
    fn order_status_column_is_optional() {
        let data = b"order_id,customer_id,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,order_purchase_timestamp,shipping_limit_date,payment_value,product_category_name_english,review_score,customer_state\n\
o1,c1,2018-01-01 10:00:00,,,,,,10,toys,4,MG\n";

        let orders = OrdersParser::new().parse(data).unwrap();
        assert_eq!(orders[0].order_status, None);
        assert_eq!(orders[0].review_score, Some(4));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let data = b"order_id,customer_id\no1,c1\n";
        let err = OrdersParser::new().parse(data).unwrap_err();
        assert!(matches!(err, ParserError::MissingColumn("order_approved_at")));
    }

    #[test]
    fn bad_timestamp_reports_line_and_column() {
        let data = orders_csv(&[
            "0,o1,c1,delivered,2018-01-01 10:00:00,,,,,,1,toys,5,SP",
            "1,o2,c2,delivered,not-a-date,,,,,,1,toys,5,SP",
        ]);

        let err = OrdersParser::new().parse(&data).unwrap_err();
        match err {
            ParserError::InvalidTimestamp { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "order_approved_at");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_review_score_is_rejected() {
        let data = orders_csv(&["0,o1,c1,delivered,2018-01-01 10:00:00,,,,,,1,toys,7,SP"]);
        let err = OrdersParser::new().parse(&data).unwrap_err();
        assert!(matches!(
            err,
            ParserError::InvalidNumber { column: "review_score", .. }
        ));
    }

    #[test]
    fn parses_geolocation_rows() {
        let data = b"customer_unique_id,geolocation_lat,geolocation_lng,customer_state\n\
u1,-23.5,-46.6,SP\n\
u2,-22.9,-43.2,RJ\n";

        let locations = GeolocationParser::new().parse(data).unwrap();
        assert_eq!(
            locations,
            vec![
                GeoRecord {
                    customer_unique_id: "u1".into(),
                    latitude: -23.5,
                    longitude: -46.6,
                },
                GeoRecord {
                    customer_unique_id: "u2".into(),
                    latitude: -22.9,
                    longitude: -43.2,
                },
            ]
        );
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let data = b"customer_unique_id,geolocation_lat,geolocation_lng\nu1,north,-46.6\n";
        let err = GeolocationParser::new().parse(data).unwrap_err();
        assert!(matches!(
            err,
            ParserError::InvalidNumber { line: 2, column: "geolocation_lat", .. }
        ));
    }
}
