pub mod directory;
pub mod find_doctors;

pub use directory::DoctorDirectory;
pub use find_doctors::FindDoctorsPage;
