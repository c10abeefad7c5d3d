pub mod add;
pub mod delete_db;
pub mod list;
pub mod remove;
pub mod sqlite;
pub mod update;
