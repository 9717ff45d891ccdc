//! teamsync core library: domain types, normalization, access calculation,
//! artifact persistence.
//!
//! - [`types`]: newtypes, [`Directory`], [`AccessModel`]
//! - [`records`]: raw field bags and the normalizer
//! - [`access`]: the access calculator
//! - [`store`]: `data.json` / `access.json` load and save
//! - [`error`]: [`StoreError`]

pub mod access;
pub mod error;
pub mod records;
pub mod store;
pub mod types;

pub use access::{calculate_access, AccessConfig, EVERYONE_GROUP};
pub use error::StoreError;
pub use records::{normalize, FieldBag, RawRecords, RawTable};
pub use store::WriteResult;
pub use types::{
    AccessModel, Directory, ExternalLinks, OrgAccess, Person, PersonId, Role, RoleId, Team,
    TeamId,
};
