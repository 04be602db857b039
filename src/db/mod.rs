pub mod db;
pub mod userdb;
pub mod complaintdb;
pub mod reportdb;
