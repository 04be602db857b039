pub mod usermodel;
pub mod complaintmodel;
pub mod reportmodel;
