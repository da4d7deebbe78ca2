mod location_service;
mod store_search_service;
mod user_service;

pub use location_service::LocationService;
pub use store_search_service::StoreSearchService;
pub use user_service::UserService;
