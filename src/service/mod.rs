pub mod error;
pub mod policy;
pub mod lifecycle;
pub mod identity_service;
pub mod complaint_service;
pub mod report_service;
