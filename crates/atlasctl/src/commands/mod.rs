pub mod cluster;
pub mod db_user;
pub mod org;
pub mod process;
pub mod profile;
pub mod project;
pub mod user;
pub mod utils;
