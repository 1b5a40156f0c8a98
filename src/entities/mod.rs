pub mod prelude;

pub mod faqs;
pub mod listings;
pub mod users;
pub mod visits;
