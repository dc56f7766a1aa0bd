pub mod context;
pub mod database;
pub mod element;
pub mod field;
pub mod group;
pub mod record;
pub mod user;

pub use context::{ApiContext, SchemaContext, SchemaSpec};
pub use database::{Database, DatabaseSpec};
pub use element::{Element, ElementHandle, ElementKind, ElementSet};
pub use field::{Field, FieldSpec};
pub use group::{Group, GroupSpec};
pub use record::Record;
pub use user::{Team, TeamSpec, User, UserSpec};
