pub mod catalog;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ids;

pub use catalog::ProductCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::field::{Field, TypedField};
pub use domain::product::{Addon, ConfigChoice, ConfigKind, ConfigOption, Product, ProductId};
pub use domain::quote::{ContactDetails, Quote, QuoteId, QuoteItem};
pub use domain::record::{from_payload, merge_patch, Collection, Patch, Record};
pub use domain::rules::{ConfigRule, ConfigRuleId, WorkflowRule, WorkflowRuleId};
pub use domain::user::{User, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use ids::{IdGenerator, IdScheme, SequentialIdGenerator, UuidIdGenerator};
