// Parser module: typed loading of the source tables.

pub mod csv_parser;

pub use csv_parser::{GeolocationParser, OrdersParser, TableParser};
