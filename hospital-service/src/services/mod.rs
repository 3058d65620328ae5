pub mod auth;
pub mod credentials;
pub mod email;
pub mod error;
pub mod hospital;
pub mod national_index;
pub mod patients;
pub mod policy;
pub mod records;
pub mod store;
pub mod tenant;
pub mod tokens;

pub use auth::{AuthService, AuthenticatedStaff, LoginOutcome, RegisterStaff};
pub use credentials::CredentialService;
pub use email::{EmailProvider, MockEmailService, SmtpEmailService};
pub use error::ServiceError;
pub use hospital::{CreateStaff, HospitalService, RegisterHospital};
pub use national_index::NationalRecordIndex;
pub use patients::{CreatePatient, PatientService};
pub use policy::{PasswordPolicy, PolicyRule};
pub use records::{CreateRecord, RecordLinker};
pub use store::{CredentialStore, MembershipStore, PatientStore};
pub use tenant::{TenantContext, TenantResolver};
pub use tokens::{SessionClaims, SessionTokenService};
