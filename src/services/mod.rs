pub mod assessment_service;
pub mod eligibility;
pub mod questions;
pub mod student_service;
pub mod user_service;

pub use assessment_service::AssessmentService;
pub use eligibility::{EligibilityPolicy, UnlimitedAttempts};
pub use questions::{PlaceholderQuestions, QuestionProvider};
pub use student_service::StudentService;
pub use user_service::{LoginRequest, LoginResponse, RegisterRequest, UserService};
