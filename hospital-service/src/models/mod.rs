pub mod hospital;
pub mod identity;
pub mod patient;
pub mod record;
pub mod staff;

pub use hospital::{Hospital, HospitalStatus};
pub use identity::{
    Identity, PasswordHistoryEntry, PendingReset, PASSWORD_HISTORY_DEPTH, PASSWORD_REUSE_DEPTH,
    RESET_TOKEN_TTL_SECONDS,
};
pub use patient::Patient;
pub use record::{MedicalRecord, RecordOrigin, RecordType};
pub use staff::{StaffMember, StaffRole, StaffStatus};
