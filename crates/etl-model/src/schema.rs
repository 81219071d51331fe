//! Column and table names shared by every pipeline stage.
//!
//! The pipeline handles exactly two sources (customers, sales) and one derived
//! aggregate (the per-product sales summary). The names below are the contract
//! between the source files, the transformation stages and the target tables.

/// Column names used across sources, derived fields and outputs.
pub mod columns {
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const SIGNUP_DATE: &str = "signup_date";
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const EMAIL: &str = "email";
    pub const CUSTOMER_TENURE: &str = "customer_tenure";

    pub const ORDER_ID: &str = "order_id";
    pub const ORDER_DATE: &str = "order_date";
    pub const QUANTITY: &str = "quantity";
    pub const PRICE: &str = "price";
    pub const PRODUCT: &str = "product";
    pub const TOTAL_VALUE: &str = "total_value";
    pub const ORDER_TYPE: &str = "order_type";

    pub const TOTAL_SALES: &str = "total_sales";
    pub const ORDER_COUNT: &str = "order_count";
}

/// Target table names in the relational store.
pub mod tables {
    pub const CUSTOMER_DATA: &str = "customer_data";
    pub const SALES_DATA: &str = "sales_data";
    pub const SALES_SUMMARY: &str = "sales_summary";
}

/// Total value above which an order is classified as high value.
pub const HIGH_VALUE_THRESHOLD: f64 = 1000.0;

/// The two tabular sources the pipeline ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Customers,
    Sales,
}

impl SourceKind {
    /// Configuration key of this source.
    pub fn config_key(self) -> &'static str {
        match self {
            SourceKind::Customers => "customer_data",
            SourceKind::Sales => "sales_data",
        }
    }

    /// Columns every file of this kind must carry, whatever the configuration says.
    pub fn minimum_columns(self) -> &'static [&'static str] {
        match self {
            SourceKind::Customers => &[
                columns::CUSTOMER_ID,
                columns::SIGNUP_DATE,
                columns::CUSTOMER_NAME,
                columns::EMAIL,
            ],
            SourceKind::Sales => &[
                columns::CUSTOMER_ID,
                columns::ORDER_ID,
                columns::ORDER_DATE,
                columns::QUANTITY,
                columns::PRICE,
                columns::PRODUCT,
            ],
        }
    }

    /// Columns parsed into date/time values during standardization.
    pub fn date_columns(self) -> &'static [&'static str] {
        match self {
            SourceKind::Customers => &[columns::SIGNUP_DATE],
            SourceKind::Sales => &[columns::ORDER_DATE],
        }
    }

    /// Columns parsed into integer identifiers during standardization.
    pub fn identifier_columns(self) -> &'static [&'static str] {
        match self {
            SourceKind::Customers => &[columns::CUSTOMER_ID],
            SourceKind::Sales => &[columns::CUSTOMER_ID, columns::ORDER_ID],
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Classification of a sales record by its total value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    HighValue,
    Regular,
}

impl OrderType {
    /// Classifies a total value; a missing total is never high value.
    ///
    /// # Examples
    ///
    /// ```
    /// use etl_model::OrderType;
    ///
    /// assert_eq!(OrderType::classify(Some(1000.01)), OrderType::HighValue);
    /// assert_eq!(OrderType::classify(Some(1000.0)), OrderType::Regular);
    /// assert_eq!(OrderType::classify(None), OrderType::Regular);
    /// ```
    pub fn classify(total_value: Option<f64>) -> Self {
        match total_value {
            Some(value) if value > HIGH_VALUE_THRESHOLD => OrderType::HighValue,
            _ => OrderType::Regular,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderType::HighValue => "High-Value Order",
            OrderType::Regular => "Regular Order",
        }
    }
}

/// Where and how a frame is written in the relational store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    /// Target table name.
    pub table: String,
    /// Key column for delta loads; `None` means full replace.
    pub key_column: Option<String>,
}

impl LoadTarget {
    pub fn keyed(table: impl Into<String>, key_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: Some(key_column.into()),
        }
    }

    pub fn replace(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: None,
        }
    }

    pub fn customers() -> Self {
        Self::keyed(tables::CUSTOMER_DATA, columns::CUSTOMER_ID)
    }

    pub fn sales() -> Self {
        Self::keyed(tables::SALES_DATA, columns::ORDER_ID)
    }

    pub fn summary() -> Self {
        Self::replace(tables::SALES_SUMMARY)
    }
}
