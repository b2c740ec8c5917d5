pub mod user;

pub use user::UserAdminService;
