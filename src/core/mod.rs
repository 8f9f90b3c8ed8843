pub mod availability;
pub mod cart;

pub use crate::domain::model::{
    Availability, AvailabilityCheck, AvailabilityReport, CartSnapshot, Domain, PurchaseReceipt,
    Rejection, RemovalSummary, Suffix,
};
pub use crate::domain::ports::{AvailabilityOracle, Clipboard, ConfigProvider};
pub use crate::utils::error::Result;
