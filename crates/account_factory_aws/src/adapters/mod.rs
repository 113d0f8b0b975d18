pub mod governance;
pub mod notify;
pub mod organizations;
