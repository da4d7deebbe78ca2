mod location;
mod store;
mod user;

pub use location::UserLocation;
pub use store::{NearbySearchRequest, Store, StoreSearchPage, StoreSearchQuery, StoreWithDistance};
pub use user::User;
