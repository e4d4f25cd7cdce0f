pub mod attendance_record;
pub mod class;
pub mod student;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use class::Entity as Class;
pub use student::Entity as Student;
pub use user::Entity as User;
