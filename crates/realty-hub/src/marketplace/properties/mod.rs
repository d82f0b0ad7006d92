//! Property registry: listings, their status lifecycle and the purchase flow.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    NewProperty, Property, PropertyAttributes, PropertyCriteria, PropertyId, PropertyStatus,
    PropertyType,
};
pub use service::PropertyRegistry;
