/// All database primary keys are PostgreSQL SERIAL (INT4).
pub type DbId = i32;
