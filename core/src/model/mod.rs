pub mod grade;
pub mod record;
pub mod results;
pub mod subject;
