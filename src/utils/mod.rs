pub mod flash;
pub mod password;
pub mod ticket;
pub mod token;
