//! # placard-ads
//!
//! The advertisement backend secured two ways:
//! - [`AdvertisementService`]: per-object ACLs with bulletin-board inheritance
//! - [`AttributeAdvertisementService`]: ownership and confidentiality
//!   clearances from token attributes ([`AttributeRules`])
//!
//! Both work over an [`AdvertisementRepository`] and take the caller's
//! [`SecurityContext`](placard_auth::SecurityContext) on every call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod advertisement;
mod attribute_service;
mod confidentiality;
mod page;
mod predicate;
mod repository;
mod rules;
mod service;

pub use advertisement::{
    ADVERTISEMENT_TYPE, Advertisement, AdvertisementUpdate, BULLETINBOARD_TYPE, EntityMetadata,
    NewAdvertisement, advertisement_identity, bulletinboard_identity,
};
pub use attribute_service::AttributeAdvertisementService;
pub use confidentiality::ConfidentialityLevel;
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use predicate::AdvertisementSpec;
pub use repository::{AdvertisementRepository, InMemoryAdvertisementRepository};
pub use rules::AttributeRules;
pub use service::AdvertisementService;
