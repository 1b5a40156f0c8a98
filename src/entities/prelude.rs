pub use super::faqs::Entity as Faqs;
pub use super::listings::Entity as Listings;
pub use super::users::Entity as Users;
pub use super::visits::Entity as Visits;
