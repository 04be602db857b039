pub mod userdtos;
pub mod complaintdtos;
