pub mod assessment;
pub mod education;
pub mod student;
pub mod user;

pub use assessment::{
    default_catalog, AssessmentDefinition, AssessmentHistoryEntry, AssessmentReport,
    AssessmentStart, AssessmentStatus, AssessmentSubmission, SubmissionReceipt, SubmitAnswers,
};
pub use education::{EducationEntry, EducationPatch, NewEducation};
pub use student::{NewStudent, ParentLiveStatus, ProfileProgress, Student, StudentPatch};
pub use user::{NewUser, User, UserRole};
