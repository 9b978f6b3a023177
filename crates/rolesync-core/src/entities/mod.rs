//! Domain entities - core business objects

mod member;
mod page;
mod record;
mod role;

pub use member::GuildMember;
pub use page::{
    DatabasePage, PageBatch, PropertyItem, PropertyValue, RelationRef, RichText, SelectOption,
};
pub use record::{MembershipRecord, RecordSchema};
pub use role::Role;
